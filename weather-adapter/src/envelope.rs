use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::error;

use crate::{error::AdapterError, model::NormalizedWeather};

/// HTTP-style response returned to the request dispatcher (API Gateway proxy shape).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ResponseEnvelope {
    pub fn ok(weather: &NormalizedWeather) -> Self {
        match serde_json::to_string(weather) {
            Ok(body) => Self::with_body(200, body),
            Err(err) => {
                error!(error = %err, "failed to serialize normalized weather");
                Self::error(&AdapterError::Upstream(err.into()))
            }
        }
    }

    pub fn error(err: &AdapterError) -> Self {
        Self::with_body(err.status_code(), json!({ "error": err.to_string() }).to_string())
    }

    pub fn from_result(result: &Result<NormalizedWeather, AdapterError>) -> Self {
        match result {
            Ok(weather) => Self::ok(weather),
            Err(err) => Self::error(err),
        }
    }

    fn with_body(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            headers: default_headers(),
            body,
        }
    }
}

impl From<Result<NormalizedWeather, AdapterError>> for ResponseEnvelope {
    fn from(result: Result<NormalizedWeather, AdapterError>) -> Self {
        Self::from_result(&result)
    }
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
    ])
}
