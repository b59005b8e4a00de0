use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Literal shown for any field the provider did not deliver.
pub const PLACEHOLDER: &str = "--";

/// Where to look up the weather. One form per request.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl LocationQuery {
    /// Build a city query from user input; blank input yields `None`.
    pub fn city(input: &str) -> Option<Self> {
        let name = input.trim();
        if name.is_empty() {
            None
        } else {
            Some(LocationQuery::City(name.to_string()))
        }
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        LocationQuery::Coordinates {
            latitude,
            longitude,
        }
    }

    /// Location part of the provider query string.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates {
                latitude,
                longitude,
            } => vec![("lat", latitude.to_string()), ("lon", longitude.to_string())],
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name),
            LocationQuery::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{latitude:.4},{longitude:.4}"),
        }
    }
}

/// Measurement system sent to the provider and used for unit suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "C",
            UnitSystem::Imperial => "F",
        }
    }

    pub fn wind_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(format!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

// Provider payloads. Any field may be missing or carry the wrong JSON type;
// such fields deserialize to `None` instead of failing the whole payload.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCurrentConditions {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub coord: Option<RawCoord>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub main: Option<RawMain>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub weather: Vec<RawCondition>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub wind: Option<RawWind>,
    /// Metres.
    #[serde(default, deserialize_with = "lenient::number")]
    pub visibility: Option<f64>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub sys: Option<RawSys>,
    /// Offset from UTC in seconds.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub timezone: Option<i64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub dt: Option<i64>,
}

impl RawCurrentConditions {
    pub fn primary_condition(&self) -> Option<&RawCondition> {
        self.weather.first()
    }

    pub fn country(&self) -> Option<&str> {
        self.sys.as_ref().and_then(|s| s.country.as_deref())
    }

    /// Recent-locations entry for this response, if it names a place with coordinates.
    pub fn favorite_location(&self) -> Option<FavoriteLocation> {
        let name = self.name.as_deref().filter(|n| !n.trim().is_empty())?;
        let coord = self.coord.as_ref()?;

        Some(FavoriteLocation {
            name: name.to_string(),
            country: self.country().unwrap_or_default().to_string(),
            lat: coord.lat?,
            lon: coord.lon?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCoord {
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMain {
    #[serde(default, deserialize_with = "lenient::number")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub feels_like: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub temp_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub temp_max: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCondition {
    #[serde(default, deserialize_with = "lenient::text")]
    pub main: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWind {
    #[serde(default, deserialize_with = "lenient::number")]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSys {
    #[serde(default, deserialize_with = "lenient::text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub sunrise: Option<i64>,
    #[serde(default, deserialize_with = "lenient::integer")]
    pub sunset: Option<i64>,
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecastEntry {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub dt: Option<i64>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub main: Option<RawMain>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub weather: Vec<RawCondition>,
}

/// What the weather client hands to the normalizer: current conditions plus
/// at most five daily forecast samples.
#[derive(Debug, Clone, Default)]
pub struct RawWeather {
    pub current: RawCurrentConditions,
    pub forecast: Vec<RawForecastEntry>,
}

/// A number or the `--` placeholder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<T> {
    Value(T),
    Placeholder,
}

impl<T> Reading<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Reading::Placeholder)
    }
}

impl<T: fmt::Display> fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(v) => v.fmt(f),
            Reading::Placeholder => f.pad(PLACEHOLDER),
        }
    }
}

impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(v) => v.serialize(serializer),
            Reading::Placeholder => serializer.serialize_str(PLACEHOLDER),
        }
    }
}

/// A value shown with one decimal place. The raw value is kept so the
/// decimal is rounded once, from the exact binary value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tenths(f64);

impl Tenths {
    pub fn new(value: f64) -> Self {
        Tenths(value)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl Serialize for Tenths {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let shown = self.to_string();
        match shown.parse::<f64>() {
            Ok(value) => serializer.serialize_f64(value),
            Err(_) => serializer.serialize_str(&shown),
        }
    }
}

/// Symbolic icon set the provider icon codes collapse into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconSymbol {
    Sun,
    Moon,
    CloudSun,
    CloudMoon,
    Cloud,
    CloudRain,
    CloudSunRain,
    CloudMoonRain,
    Bolt,
    Snowflake,
    Smog,
}

impl IconSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconSymbol::Sun => "sun",
            IconSymbol::Moon => "moon",
            IconSymbol::CloudSun => "cloud-sun",
            IconSymbol::CloudMoon => "cloud-moon",
            IconSymbol::Cloud => "cloud",
            IconSymbol::CloudRain => "cloud-rain",
            IconSymbol::CloudSunRain => "cloud-sun-rain",
            IconSymbol::CloudMoonRain => "cloud-moon-rain",
            IconSymbol::Bolt => "bolt",
            IconSymbol::Snowflake => "snowflake",
            IconSymbol::Smog => "smog",
        }
    }
}

impl fmt::Display for IconSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Background mood derived from the main condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backdrop {
    ClearSky,
    FewClouds,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub day_label: String,
    pub temp_max: Reading<i64>,
    pub temp_min: Reading<i64>,
    pub icon_code: String,
    pub description: String,
}

/// Canonical view model handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub location_name: String,
    pub country_code: String,
    pub temperature: Reading<i64>,
    pub feels_like: Reading<i64>,
    pub description: String,
    pub humidity_percent: Reading<i64>,
    pub wind_speed: Reading<Tenths>,
    pub visibility_km: Reading<Tenths>,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
    pub icon_code: String,
    pub icon: IconSymbol,
    pub condition_main: String,
    pub backdrop: Option<Backdrop>,
    pub units: UnitSystem,
    pub forecast_days: Vec<ForecastDay>,
}

impl WeatherView {
    /// "Name, CC", or just the name when the country is unknown.
    pub fn location_label(&self) -> String {
        if self.country_code.is_empty() {
            self.location_name.clone()
        } else {
            format!("{}, {}", self.location_name, self.country_code)
        }
    }
}

/// Entry in the recent-locations list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl FavoriteLocation {
    /// Same place, compared case-insensitively on name and country.
    pub fn same_place(&self, other: &FavoriteLocation) -> bool {
        self.name.to_lowercase() == other.name.to_lowercase()
            && self.country.to_lowercase() == other.country.to_lowercase()
    }

    pub fn query(&self) -> LocationQuery {
        LocationQuery::coordinates(self.lat, self.lon)
    }
}

pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer, de::DeserializeOwned};
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.and_then(|v| v.as_f64()).filter(|n| n.is_finite()))
    }

    pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_f64().filter(|n| n.is_finite()).map(|n| n as i64))
        }))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.and_then(|v| v.as_str().map(str::to_string)))
    }

    pub fn nested<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value
            .filter(Value::is_object)
            .and_then(|v| serde_json::from_value(v).ok()))
    }

    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(d)?;
        let items = match value {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        };

        Ok(items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }
}
