//! Turns provider payloads into a [`WeatherView`].
//!
//! Normalization never fails: every missing or malformed field degrades to
//! its placeholder.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::model::{
    Backdrop, ForecastDay, IconSymbol, PLACEHOLDER, RawCondition, RawCurrentConditions,
    RawForecastEntry, Reading, Tenths, UnitSystem, WeatherView,
};

/// Icon code used when the provider sends none or an image fails to load.
pub const DEFAULT_ICON_CODE: &str = "02d";

/// Provider icon code to symbolic icon. Unknown codes become [`IconSymbol::CloudSun`].
pub fn icon_symbol(code: &str) -> IconSymbol {
    match code {
        "01d" => IconSymbol::Sun,
        "01n" => IconSymbol::Moon,
        "02d" => IconSymbol::CloudSun,
        "02n" => IconSymbol::CloudMoon,
        "03d" | "03n" | "04d" | "04n" => IconSymbol::Cloud,
        "09d" | "09n" => IconSymbol::CloudRain,
        "10d" => IconSymbol::CloudSunRain,
        "10n" => IconSymbol::CloudMoonRain,
        "11d" | "11n" => IconSymbol::Bolt,
        "13d" | "13n" => IconSymbol::Snowflake,
        "50d" | "50n" => IconSymbol::Smog,
        _ => IconSymbol::CloudSun,
    }
}

/// `<base>/<code>@2x.png`, falling back to the default code for a blank one.
pub fn icon_url(base: &str, code: &str) -> String {
    let code = if code.trim().is_empty() {
        DEFAULT_ICON_CODE
    } else {
        code
    };
    format!("{}/{}@2x.png", base.trim_end_matches('/'), code)
}

pub fn backdrop(condition_main: &str) -> Backdrop {
    let condition = condition_main.to_lowercase();
    let has = |word: &str| condition.contains(word);

    if has("clear") {
        Backdrop::ClearSky
    } else if has("cloud") {
        Backdrop::FewClouds
    } else if has("drizzle") || has("rain") {
        Backdrop::Rain
    } else if has("thunder") {
        Backdrop::Thunderstorm
    } else if has("snow") {
        Backdrop::Snow
    } else if ["mist", "smoke", "haze", "fog", "dust", "sand"]
        .iter()
        .any(|w| has(w))
    {
        Backdrop::Mist
    } else {
        Backdrop::ClearSky
    }
}

/// Merge current conditions and the daily forecast samples into one view.
pub fn normalize(
    current: &RawCurrentConditions,
    forecast: &[RawForecastEntry],
    units: UnitSystem,
) -> WeatherView {
    let offset = current.timezone.unwrap_or(0);
    let main = current.main.as_ref();
    let condition = current.primary_condition();

    let icon_code = condition
        .and_then(|c| non_blank(c.icon.as_deref()))
        .unwrap_or(DEFAULT_ICON_CODE)
        .to_string();

    let condition_main = condition.and_then(|c| non_blank(c.main.as_deref()));

    let sys = current.sys.as_ref();

    WeatherView {
        location_name: non_blank(current.name.as_deref())
            .unwrap_or("Unknown")
            .to_string(),
        country_code: current.country().unwrap_or_default().to_string(),
        temperature: whole(main.and_then(|m| m.temp)),
        feels_like: whole(main.and_then(|m| m.feels_like)),
        description: describe(condition),
        humidity_percent: whole(main.and_then(|m| m.humidity)),
        wind_speed: tenths(current.wind.as_ref().and_then(|w| w.speed)),
        visibility_km: tenths(current.visibility.map(|metres| metres / 1000.0)),
        sunrise: local_time(sys.and_then(|s| s.sunrise), offset),
        sunset: local_time(sys.and_then(|s| s.sunset), offset),
        icon: icon_symbol(&icon_code),
        icon_code,
        condition_main: condition_main.unwrap_or(PLACEHOLDER).to_string(),
        backdrop: condition_main.map(backdrop),
        units,
        forecast_days: forecast_days(forecast, offset),
    }
}

fn forecast_days(entries: &[RawForecastEntry], offset: i64) -> Vec<ForecastDay> {
    entries
        .iter()
        .take(5)
        .enumerate()
        .filter_map(|(index, entry)| {
            let when = local_time(entry.dt, offset)?;
            let main = entry.main.as_ref();
            let condition = entry.weather.first();

            Some(ForecastDay {
                day_label: day_label(index, when),
                temp_max: whole(main.and_then(|m| m.temp_max)),
                temp_min: whole(main.and_then(|m| m.temp_min)),
                icon_code: condition
                    .and_then(|c| non_blank(c.icon.as_deref()))
                    .unwrap_or(DEFAULT_ICON_CODE)
                    .to_string(),
                description: describe(condition),
            })
        })
        .collect()
}

fn day_label(index: usize, when: NaiveDateTime) -> String {
    if index == 0 {
        "Tomorrow".to_string()
    } else {
        when.format("%A").to_string()
    }
}

fn describe(condition: Option<&RawCondition>) -> String {
    condition
        .and_then(|c| non_blank(c.description.as_deref()))
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

/// Epoch seconds shifted by the location's UTC offset. Zero counts as absent.
fn local_time(epoch: Option<i64>, offset: i64) -> Option<NaiveDateTime> {
    let epoch = epoch.filter(|&ts| ts != 0)?;
    DateTime::<Utc>::from_timestamp(epoch.checked_add(offset)?, 0).map(|dt| dt.naive_utc())
}

/// Nearest integer, halves rounded up (-2.5 becomes -2).
fn whole(value: Option<f64>) -> Reading<i64> {
    match value {
        // The `as` cast turns -0.0 into 0.
        Some(v) if v.is_finite() => Reading::Value((v + 0.5).floor() as i64),
        _ => Reading::Placeholder,
    }
}

fn tenths(value: Option<f64>) -> Reading<Tenths> {
    match value {
        Some(v) if v.is_finite() => Reading::Value(Tenths::new(v)),
        _ => Reading::Placeholder,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current(value: serde_json::Value) -> RawCurrentConditions {
        serde_json::from_value(value).unwrap()
    }

    fn entries(value: serde_json::Value) -> Vec<RawForecastEntry> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn icon_table() {
        assert_eq!(icon_symbol("01d"), IconSymbol::Sun);
        assert_eq!(icon_symbol("01n"), IconSymbol::Moon);
        assert_eq!(icon_symbol("04n"), IconSymbol::Cloud);
        assert_eq!(icon_symbol("09n"), IconSymbol::CloudRain);
        assert_eq!(icon_symbol("10n"), IconSymbol::CloudMoonRain);
        assert_eq!(icon_symbol("13d"), IconSymbol::Snowflake);
        assert_eq!(icon_symbol("50n"), IconSymbol::Smog);
        assert_eq!(icon_symbol("99x"), IconSymbol::CloudSun);
    }

    #[test]
    fn icon_urls() {
        let base = "https://openweathermap.org/img/wn/";
        assert_eq!(
            icon_url(base, "10d"),
            "https://openweathermap.org/img/wn/10d@2x.png"
        );
        assert_eq!(
            icon_url(base, ""),
            "https://openweathermap.org/img/wn/02d@2x.png"
        );
    }

    #[test]
    fn backdrop_classification() {
        assert_eq!(backdrop("Clear"), Backdrop::ClearSky);
        assert_eq!(backdrop("Clouds"), Backdrop::FewClouds);
        assert_eq!(backdrop("Drizzle"), Backdrop::Rain);
        assert_eq!(backdrop("Thunderstorm"), Backdrop::Thunderstorm);
        assert_eq!(backdrop("Snow"), Backdrop::Snow);
        assert_eq!(backdrop("Haze"), Backdrop::Mist);
        assert_eq!(backdrop("Tornado"), Backdrop::ClearSky);
    }

    #[test]
    fn empty_payload_is_all_placeholders() {
        let view = normalize(&RawCurrentConditions::default(), &[], UnitSystem::Metric);

        assert_eq!(view.location_name, "Unknown");
        assert_eq!(view.country_code, "");
        assert!(view.temperature.is_placeholder());
        assert!(view.feels_like.is_placeholder());
        assert!(view.humidity_percent.is_placeholder());
        assert!(view.wind_speed.is_placeholder());
        assert!(view.visibility_km.is_placeholder());
        assert_eq!(view.description, "--");
        assert_eq!(view.condition_main, "--");
        assert_eq!(view.icon_code, "02d");
        assert_eq!(view.icon, IconSymbol::CloudSun);
        assert_eq!(view.backdrop, None);
        assert_eq!(view.sunrise, None);
        assert_eq!(view.sunset, None);
        assert!(view.forecast_days.is_empty());
        assert_eq!(view.temperature.to_string(), "--");
    }

    #[test]
    fn partial_subfields_degrade_individually() {
        let raw = current(json!({
            "name": "Oslo",
            "main": { "temp": -3.6 },
            "weather": [{ "main": "Snow" }],
            "sys": { "country": "NO" }
        }));
        let view = normalize(&raw, &[], UnitSystem::Metric);

        assert_eq!(view.temperature, Reading::Value(-4));
        assert!(view.feels_like.is_placeholder());
        assert!(view.humidity_percent.is_placeholder());
        assert_eq!(view.description, "--");
        assert_eq!(view.condition_main, "Snow");
        assert_eq!(view.backdrop, Some(Backdrop::Snow));
        assert_eq!(view.location_label(), "Oslo, NO");
    }

    #[test]
    fn rounds_and_converts_units() {
        let raw = current(json!({
            "name": "London",
            "main": { "temp": 15.4, "feels_like": 14.5, "humidity": 72 },
            "wind": { "speed": 4.26 },
            "visibility": 10000,
            "weather": [{ "main": "Clouds", "description": "broken clouds", "icon": "04d" }]
        }));
        let view = normalize(&raw, &[], UnitSystem::Metric);

        assert_eq!(view.temperature, Reading::Value(15));
        assert_eq!(view.feels_like, Reading::Value(15));
        assert_eq!(view.humidity_percent, Reading::Value(72));
        assert_eq!(view.wind_speed.to_string(), "4.3");
        assert_eq!(view.visibility_km.to_string(), "10.0");
        assert_eq!(view.icon, IconSymbol::Cloud);
        assert_eq!(view.description, "broken clouds");
    }

    #[test]
    fn halves_round_toward_positive_infinity() {
        let raw = current(json!({
            "main": { "temp": -2.5, "feels_like": -0.5, "humidity": 40.5 },
            "wind": { "speed": 1.45 }
        }));
        let view = normalize(&raw, &[], UnitSystem::Metric);

        assert_eq!(view.temperature, Reading::Value(-2));
        assert_eq!(view.feels_like, Reading::Value(0));
        assert_eq!(view.feels_like.to_string(), "0");
        assert_eq!(view.humidity_percent, Reading::Value(41));
        assert_eq!(view.wind_speed.to_string(), "1.4");

        let forecast = entries(json!([
            { "dt": 1_717_243_200, "main": { "temp_max": 2.5, "temp_min": -7.5 } }
        ]));
        let days = normalize(&raw, &forecast, UnitSystem::Metric).forecast_days;
        assert_eq!(days[0].temp_max, Reading::Value(3));
        assert_eq!(days[0].temp_min, Reading::Value(-7));
    }

    #[test]
    fn sun_times_use_location_offset() {
        // 2024-06-01T04:00:00Z with +02:00 offset.
        let raw = current(json!({
            "timezone": 7200,
            "sys": { "sunrise": 1_717_214_400, "sunset": 0 }
        }));
        let view = normalize(&raw, &[], UnitSystem::Metric);

        let sunrise = view.sunrise.unwrap();
        assert_eq!(sunrise.format("%Y-%m-%d %H:%M").to_string(), "2024-06-01 06:00");
        assert_eq!(view.sunset, None);
    }

    #[test]
    fn forecast_labels_start_with_tomorrow() {
        // Saturday 2024-06-01 12:00Z, then +1 day steps.
        let forecast = entries(json!([
            { "dt": 1_717_243_200, "main": { "temp_max": 20.6, "temp_min": 11.2 },
              "weather": [{ "icon": "01d", "description": "clear sky" }] },
            { "dt": 1_717_329_600 },
            { "dt": 1_717_416_000, "main": {} },
        ]));
        let days = normalize(&RawCurrentConditions::default(), &forecast, UnitSystem::Metric)
            .forecast_days;

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].day_label, "Tomorrow");
        assert_eq!(days[0].temp_max, Reading::Value(21));
        assert_eq!(days[0].temp_min, Reading::Value(11));
        assert_eq!(days[0].icon_code, "01d");
        assert_eq!(days[1].day_label, "Sunday");
        assert_eq!(days[1].icon_code, "02d");
        assert_eq!(days[1].description, "--");
        assert_eq!(days[2].day_label, "Monday");
        assert!(days[2].temp_max.is_placeholder());
    }

    #[test]
    fn forecast_entries_without_time_are_skipped() {
        let forecast = entries(json!([{ "main": { "temp_max": 3 } }, { "dt": 1_717_329_600 }]));
        let days = normalize(&RawCurrentConditions::default(), &forecast, UnitSystem::Metric)
            .forecast_days;

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day_label, "Sunday");
    }

    #[test]
    fn forecast_is_capped_at_five_days() {
        let forecast: Vec<RawForecastEntry> = (0..7)
            .map(|i| RawForecastEntry {
                dt: Some(1_717_243_200 + i * 86_400),
                ..Default::default()
            })
            .collect();
        let view = normalize(&RawCurrentConditions::default(), &forecast, UnitSystem::Imperial);

        assert_eq!(view.forecast_days.len(), 5);
        assert_eq!(view.units, UnitSystem::Imperial);
    }
}
