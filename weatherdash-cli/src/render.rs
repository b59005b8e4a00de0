use std::io::{IsTerminal, Write};

use chrono::NaiveDateTime;
use weatherdash_core::{FavoriteLocation, WeatherView, normalize::icon_url};

/// Shows a progress line on stderr until dropped.
pub struct Loading {
    active: bool,
}

impl Loading {
    pub fn start(label: &str) -> Self {
        let mut stderr = std::io::stderr();
        let active = stderr.is_terminal();
        if active {
            let _ = write!(stderr, "Loading weather for {label}...");
            let _ = stderr.flush();
        }
        Self { active }
    }
}

impl Drop for Loading {
    fn drop(&mut self) {
        if self.active {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\r\x1b[K");
            let _ = stderr.flush();
        }
    }
}

fn clock(time: Option<NaiveDateTime>) -> String {
    time.map(|t| t.format("%I:%M %p").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

pub fn view(view: &WeatherView, icon_base: &str) -> String {
    let units = view.units;
    let temp_unit = units.temperature_suffix();
    let mut out = String::new();

    out.push_str(&format!("{}\n", view.location_label()));
    out.push_str(&format!(
        "  [{}] {}°{}  {}\n",
        view.icon, view.temperature, temp_unit, view.description
    ));
    out.push_str(&format!(
        "  Feels like {}°{} · Humidity {}% · Wind {} {} · Visibility {} km\n",
        view.feels_like,
        temp_unit,
        view.humidity_percent,
        view.wind_speed,
        units.wind_suffix(),
        view.visibility_km,
    ));
    out.push_str(&format!(
        "  Sunrise {} · Sunset {}\n",
        clock(view.sunrise),
        clock(view.sunset)
    ));
    out.push_str(&format!("  Icon {}\n", icon_url(icon_base, &view.icon_code)));

    out.push('\n');
    if view.forecast_days.is_empty() {
        out.push_str("5-day forecast not available\n");
        return out;
    }

    out.push_str("5-day forecast\n");
    for day in &view.forecast_days {
        out.push_str(&format!(
            "  {:<10} {:>4}° / {:>4}°  {}\n",
            day.day_label, day.temp_max, day.temp_min, day.description
        ));
    }

    out
}

pub fn favorites(list: &[FavoriteLocation]) -> String {
    if list.is_empty() {
        return "No recent locations yet.\n".to_string();
    }

    list.iter()
        .enumerate()
        .map(|(i, fav)| {
            let label = if fav.country.is_empty() {
                fav.name.clone()
            } else {
                format!("{}, {}", fav.name, fav.country)
            };
            format!("{}. {} ({:.2}, {:.2})\n", i + 1, label, fav.lat, fav.lon)
        })
        .collect()
}
