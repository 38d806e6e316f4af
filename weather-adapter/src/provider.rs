use crate::{
    AdapterConfig, AdapterError, ProviderResponse, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather."
            )),
        }
    }
}

/// One outbound current-weather request.
#[derive(Debug, Clone, Copy)]
pub struct ProviderRequest<'a> {
    pub city: &'a str,
    pub api_key: &'a str,
}

/// Source of raw current-weather replies.
///
/// Implementations perform exactly one round trip per call and map transport
/// or decode failures to [`AdapterError::Upstream`]. They do not interpret
/// the embedded status sentinel.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(
        &self,
        request: &ProviderRequest<'_>,
    ) -> Result<ProviderResponse, AdapterError>;
}

/// Construct a provider from adapter config and explicit ProviderId.
pub fn provider_from_config(id: ProviderId, config: &AdapterConfig) -> Box<dyn WeatherProvider> {
    match id {
        ProviderId::OpenWeather => Box::new(OpenWeatherProvider::new(config.base_url.clone())),
    }
}
