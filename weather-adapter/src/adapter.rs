use tracing::{debug, warn};

use crate::{
    config::AdapterConfig,
    error::{AdapterError, UpstreamCause},
    model::{NormalizedWeather, Query},
    provider::{ProviderId, ProviderRequest, WeatherProvider, provider_from_config},
};

/// City weather lookup over a [`WeatherProvider`].
///
/// Holds no per-request state; one instance can serve any number of
/// sequential or concurrent lookups.
#[derive(Debug)]
pub struct WeatherAdapter {
    api_key: Option<String>,
    provider: Box<dyn WeatherProvider>,
}

impl WeatherAdapter {
    /// Build an adapter backed by OpenWeather.
    pub fn from_config(config: &AdapterConfig) -> Self {
        Self::with_provider(
            config.api_key.clone(),
            provider_from_config(ProviderId::OpenWeather, config),
        )
    }

    pub fn with_provider(api_key: Option<String>, provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()),
            provider,
        }
    }

    /// Fetch and normalize current weather for `city` (default "Pune").
    ///
    /// Makes at most one provider call and none at all when no API key is
    /// configured. Any embedded provider status other than 200 is reported as
    /// [`AdapterError::NotFound`], rate limiting included.
    pub async fn lookup(&self, city: Option<&str>) -> Result<NormalizedWeather, AdapterError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            warn!("lookup rejected: no weather API key configured");
            AdapterError::Configuration
        })?;

        let query = Query::new(city);
        let city = query.resolved_city();
        debug!(city, "requesting current weather");

        let reply = self
            .provider
            .current_weather(&ProviderRequest { city, api_key })
            .await
            .inspect_err(|err| log_upstream(city, err))?;

        if !reply.is_success() {
            warn!(city, sentinel = ?reply.cod(), "weather provider did not report success");
            return Err(AdapterError::NotFound);
        }

        let weather = reply.normalize().map_err(|cause| {
            let err = AdapterError::from(cause);
            log_upstream(city, &err);
            err
        })?;

        debug!(city, temperature = weather.temperature, "current weather resolved");
        Ok(weather)
    }
}

fn log_upstream(city: &str, err: &AdapterError) {
    if let AdapterError::Upstream(cause) = err {
        match cause {
            UpstreamCause::Transport(_) => warn!(city, error = %cause, "weather provider unreachable"),
            UpstreamCause::Json(_)
            | UpstreamCause::MissingField(_)
            | UpstreamCause::OutOfRange(_) => {
                warn!(city, error = %cause, "weather provider reply unusable")
            }
        }
    }
}
