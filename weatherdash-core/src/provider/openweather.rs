use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    config::DEFAULT_API_BASE_URL,
    error::WeatherError,
    model::{LocationQuery, RawCurrentConditions, RawForecastEntry, RawWeather, UnitSystem},
};

use super::{WeatherSource, downsample_daily};

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at another API root, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> reqwest::Result<Self> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub async fn fetch_by_city(
        &self,
        name: &str,
        units: UnitSystem,
    ) -> Result<RawWeather, WeatherError> {
        self.fetch(&LocationQuery::City(name.to_string()), units).await
    }

    pub async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<RawWeather, WeatherError> {
        self.fetch(&LocationQuery::coordinates(latitude, longitude), units)
            .await
    }

    async fn fetch_current(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<RawCurrentConditions, WeatherError> {
        let (status, body) = self.get("weather", query, units).await?;

        if !status.is_success() {
            return Err(WeatherError::ProviderRejected {
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;
        if !value.is_object() {
            return Err(WeatherError::MalformedResponse(format!(
                "expected a JSON object, got: {}",
                truncate_body(&body)
            )));
        }

        serde_json::from_value(value).map_err(|e| WeatherError::MalformedResponse(e.to_string()))
    }

    /// Forecast samples, or `None` when the forecast could not be obtained.
    async fn fetch_forecast(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Option<Vec<RawForecastEntry>> {
        let (status, body) = match self.get("forecast", query, units).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Forecast request failed, continuing without forecast");
                return None;
            }
        };

        if !status.is_success() {
            warn!(
                %status,
                body = %truncate_body(&body),
                "Forecast request rejected, continuing without forecast"
            );
            return None;
        }

        match serde_json::from_str::<OwForecastResponse>(&body) {
            Ok(parsed) => Some(parsed.list),
            Err(e) => {
                warn!(error = %e, "Forecast response unparseable, continuing without forecast");
                None
            }
        }
    }

    async fn get(
        &self,
        endpoint: &str,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<(StatusCode, String), WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, %query, %units, "Requesting OpenWeather");

        let mut params = query.query_params();
        params.push(("units", units.as_str().to_string()));
        params.push(("appid", self.api_key.clone()));

        let res = self.http.get(&url).query(&params).send().await?;
        let status = res.status();
        let body = res.text().await?;

        debug!(%url, %status, "OpenWeather responded");
        Ok((status, body))
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default, deserialize_with = "crate::model::lenient::list")]
    list: Vec<RawForecastEntry>,
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch(
        &self,
        query: &LocationQuery,
        units: UnitSystem,
    ) -> Result<RawWeather, WeatherError> {
        let current = self.fetch_current(query, units).await?;

        let forecast = self
            .fetch_forecast(query, units)
            .await
            .map(downsample_daily)
            .unwrap_or_default();

        info!(
            %query,
            location = current.name.as_deref().unwrap_or("?"),
            forecast_days = forecast.len(),
            "Weather fetched"
        );

        Ok(RawWeather { current, forecast })
    }
}

/// Provider's `message` field if the body carries one, else the raw body.
fn rejection_message(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.trim().is_empty());

    match message {
        Some(message) => message,
        None if body.trim().is_empty() => status.canonical_reason().unwrap_or("").to_string(),
        None => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
