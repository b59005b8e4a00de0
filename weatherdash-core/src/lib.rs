//! Core library for the `weatherdash` dashboard.
//!
//! This crate defines:
//! - Fetching current conditions and forecast from OpenWeather
//! - Normalizing provider payloads into a display-ready [`WeatherView`]
//! - The recent-locations list and theme preference, persisted through [`KeyValueStore`]
//! - The [`Dashboard`] state object tying them together
//!
//! It is used by `weatherdash-cli`, but can also back other front ends.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod favorites;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod storage;
pub mod theme;

pub use config::Config;
pub use dashboard::{Dashboard, LookupOutcome, LookupTicket, startup_query};
pub use error::{StoreError, WeatherError};
pub use favorites::Favorites;
pub use model::{
    FavoriteLocation, ForecastDay, LocationQuery, RawWeather, Reading, UnitSystem, WeatherView,
};
pub use provider::{WeatherSource, openweather::OpenWeatherClient};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use theme::Theme;
