//! Maps client error types.

/// Errors from the directions/places HTTP clients.
///
/// These are transport-level failures. An upstream response that
/// arrives intact but carries a non-OK application status is handled
/// by the resolvers as "no result", not as an error.
#[derive(Debug, thiserror::Error)]
pub enum MapsError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("maps API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed.
    #[error("maps JSON parse error: {message}")]
    Json { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MapsError::Api {
            status: 403,
            message: "key invalid".into(),
        };
        assert_eq!(err.to_string(), "maps API error 403: key invalid");

        let err = MapsError::Json {
            message: "expected object".into(),
        };
        assert!(err.to_string().contains("expected object"));
    }
}
