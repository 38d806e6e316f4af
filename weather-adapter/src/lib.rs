//! City weather lookup adapter.
//!
//! This crate defines:
//! - Adapter configuration (explicit API key, provider endpoint) and the CLI config file
//! - Abstraction over the weather provider (OpenWeather)
//! - The `lookup` operation and its error kinds
//! - The HTTP-style response envelope returned to callers
//!
//! It is used by `weather-lambda` and `weather-cli`.

pub mod adapter;
pub mod config;
pub mod envelope;
pub mod error;
pub mod model;
pub mod provider;

pub use adapter::WeatherAdapter;
pub use config::{AdapterConfig, Config, ProviderConfig};
pub use envelope::ResponseEnvelope;
pub use error::{AdapterError, UpstreamCause};
pub use model::{DEFAULT_CITY, NormalizedWeather, ProviderResponse, Query};
pub use provider::{ProviderId, ProviderRequest, WeatherProvider};
