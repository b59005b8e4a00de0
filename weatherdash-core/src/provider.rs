use crate::{
    Config,
    error::WeatherError,
    model::{LocationQuery, RawForecastEntry, RawWeather, UnitSystem},
    provider::openweather::OpenWeatherClient,
};
use anyhow::Context;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Forecast samples are 3 hours apart; one per day is every 8th.
pub const SAMPLES_PER_DAY: usize = 8;
pub const FORECAST_DAYS: usize = 5;

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Current conditions plus the daily forecast samples for `query`.
    async fn fetch(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<RawWeather, WeatherError>;
}

/// Keep indices 0, 8, 16, ... up to five entries.
pub fn downsample_daily(entries: Vec<RawForecastEntry>) -> Vec<RawForecastEntry> {
    entries
        .into_iter()
        .step_by(SAMPLES_PER_DAY)
        .take(FORECAST_DAYS)
        .collect()
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.resolved_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `weatherdash configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let client = OpenWeatherClient::new(api_key).with_base_url(&config.api_base_url);

    match config.request_timeout() {
        Some(timeout) => client
            .with_timeout(timeout)
            .context("Failed to build HTTP client"),
        None => Ok(client),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: i64) -> Vec<RawForecastEntry> {
        (0..n)
            .map(|i| RawForecastEntry {
                dt: Some(i),
                ..Default::default()
            })
            .collect()
    }

    fn picked(entries: &[RawForecastEntry]) -> Vec<i64> {
        entries.iter().filter_map(|e| e.dt).collect()
    }

    #[test]
    fn full_forecast_picks_one_per_day() {
        assert_eq!(picked(&downsample_daily(numbered(40))), [0, 8, 16, 24, 32]);
    }

    #[test]
    fn short_forecast_is_truncated() {
        assert_eq!(picked(&downsample_daily(numbered(17))), [0, 8, 16]);
        assert_eq!(picked(&downsample_daily(numbered(1))), [0]);
        assert!(downsample_daily(Vec::new()).is_empty());
    }

    #[test]
    fn long_forecast_is_capped() {
        assert_eq!(picked(&downsample_daily(numbered(60))).len(), 5);
    }

    #[test]
    fn client_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        if cfg.resolved_api_key().is_some() {
            // OPENWEATHER_API_KEY is set in this environment.
            return;
        }
        let err = client_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn client_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.request_timeout_secs = Some(3);
        assert!(client_from_config(&cfg).is_ok());
    }
}
