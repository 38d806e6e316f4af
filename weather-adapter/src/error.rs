use thiserror::Error;

/// Failure of a single lookup.
///
/// The `Display` text of each variant is the public message placed in the
/// response body, so it never carries provider details.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// No API key was supplied when the adapter was built.
    #[error("Weather API key not configured")]
    Configuration,

    /// Transport failure, unreadable body or a reply that cannot be normalized.
    #[error("Failed to fetch weather data")]
    Upstream(#[from] UpstreamCause),

    /// The provider's embedded status was anything other than success.
    #[error("City not found")]
    NotFound,
}

impl AdapterError {
    /// HTTP-style status code reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            AdapterError::Configuration | AdapterError::Upstream(_) => 500,
            AdapterError::NotFound => 404,
        }
    }

    /// Whether repeating the same request may succeed without changes.
    ///
    /// Only upstream failures are transient; a missing key needs a deployment
    /// fix and a missed city needs different input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AdapterError::Upstream(_))
    }
}

/// Internal reason behind [`AdapterError::Upstream`]; logged, not returned.
#[derive(Debug, Error)]
pub enum UpstreamCause {
    #[error("request to weather provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather provider body could not be decoded: {0}")]
    Json(#[from] serde_json::Error),

    #[error("weather provider reply is missing `{0}`")]
    MissingField(&'static str),

    #[error("weather provider value `{0}` is out of range")]
    OutOfRange(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(AdapterError::Configuration.status_code(), 500);
        assert_eq!(AdapterError::NotFound.status_code(), 404);
        assert_eq!(
            AdapterError::from(UpstreamCause::MissingField("main")).status_code(),
            500
        );
    }

    #[test]
    fn public_messages_hide_the_cause() {
        let err = AdapterError::from(UpstreamCause::MissingField("main.temp"));
        assert_eq!(err.to_string(), "Failed to fetch weather data");
        assert_eq!(
            AdapterError::Configuration.to_string(),
            "Weather API key not configured"
        );
        assert_eq!(AdapterError::NotFound.to_string(), "City not found");
    }

    #[test]
    fn only_upstream_failures_are_retryable() {
        assert!(AdapterError::from(UpstreamCause::MissingField("name")).is_retryable());
        assert!(!AdapterError::Configuration.is_retryable());
        assert!(!AdapterError::NotFound.is_retryable());
    }
}
