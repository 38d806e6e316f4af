use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::{AdapterError, UpstreamCause},
    model::ProviderResponse,
};

use super::{ProviderRequest, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    fn current_url(&self) -> String {
        format!("{}/weather", self.base_url.trim_end_matches('/'))
    }

    async fn fetch_current(&self, request: &ProviderRequest<'_>) -> Result<String, UpstreamCause> {
        // reqwest errors embed the full URL, which carries the appid
        let res = self
            .http
            .get(self.current_url())
            .query(&[
                ("q", request.city),
                ("appid", request.api_key),
                ("units", UNITS),
            ])
            .send()
            .await
            .map_err(|err| UpstreamCause::Transport(err.without_url()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|err| UpstreamCause::Transport(err.without_url()))?;

        // OpenWeather mirrors failures in the body's `cod`; the adapter decides on that.
        if !status.is_success() {
            debug!(%status, body = %truncate_body(&body), "OpenWeather replied with non-success HTTP status");
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(
        &self,
        request: &ProviderRequest<'_>,
    ) -> Result<ProviderResponse, AdapterError> {
        let body = self.fetch_current(request).await?;
        let parsed = serde_json::from_str(&body).map_err(UpstreamCause::Json)?;
        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
