use serde_json::Value;
use tracing::info;
use weather_adapter::{AdapterError, ResponseEnvelope, WeatherAdapter};

/// Optional `city` query parameter of an API Gateway proxy event.
///
/// `queryStringParameters` is `null` when the request carries no query
/// string; any other unexpected shape is treated the same way.
pub fn city_from_event(event: &Value) -> Option<&str> {
    event
        .get("queryStringParameters")
        .and_then(|params| params.get("city"))
        .and_then(Value::as_str)
}

/// Run one lookup for an inbound event. Domain failures are reported in the
/// envelope, never as a handler error.
pub async fn handle_weather_event(event: Value, adapter: &WeatherAdapter) -> ResponseEnvelope {
    let city = city_from_event(&event);
    let result = adapter.lookup(city).await;
    let envelope = ResponseEnvelope::from_result(&result);
    info!(
        city = city.unwrap_or_default(),
        status = envelope.status_code,
        retryable = result.as_ref().is_err_and(AdapterError::is_retryable),
        "weather request handled"
    );
    envelope
}
