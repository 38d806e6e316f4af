use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use weather_adapter::{AdapterConfig, ResponseEnvelope, WeatherAdapter};
use weather_lambda::handler::handle_weather_event;

async fn handle_request(
    adapter: &WeatherAdapter,
    event: LambdaEvent<Value>,
) -> Result<ResponseEnvelope, Error> {
    Ok(handle_weather_event(event.payload, adapter).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // CloudWatch stamps every line already.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let config = AdapterConfig::from_env();
    info!(?config, "weather function starting");
    if !config.has_api_key() {
        warn!("WEATHER_API_KEY is not set; every lookup will answer 500");
    }
    let adapter = WeatherAdapter::from_config(&config);

    lambda_runtime::run(service_fn(|event: LambdaEvent<Value>| {
        handle_request(&adapter, event)
    }))
    .await
}
