use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt::Debug;
use tracing::{debug, info};

use crate::{
    error::{Result, WeatherError},
    query::redacted,
};

/// Source of raw OpenWeather JSON documents.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn fetch(&self, url: &Url) -> Result<Value>;
}

/// Issues one GET per call. No timeout is set and nothing is retried.
#[derive(Debug, Clone, Default)]
pub struct HttpWeatherApi {
    http: Client,
}

impl HttpWeatherApi {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl WeatherApi for HttpWeatherApi {
    async fn fetch(&self, url: &Url) -> Result<Value> {
        info!(url = %redacted(url), "requesting weather data");

        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            // drop the URL, and with it the API key, from the error text
            .map_err(|e| WeatherError::Transport(e.without_url()))?;

        let status = res.status();
        debug!(%status, "weather service responded");
        check_status(status)?;

        let body = res.text().await.map_err(|_| WeatherError::InvalidResponse)?;
        serde_json::from_str(&body).map_err(|e| {
            debug!(error = %e, "response body is not JSON");
            WeatherError::InvalidResponse
        })
    }
}

/// Map an HTTP status to the failure the user sees.
pub fn check_status(status: StatusCode) -> Result<()> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::UNAUTHORIZED => Err(WeatherError::Unauthorized),
        StatusCode::NOT_FOUND => Err(WeatherError::CityNotFound),
        s => Err(WeatherError::Status(s.as_u16())),
    }
}
