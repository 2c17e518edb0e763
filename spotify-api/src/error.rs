use http_client::HttpError;
use thiserror::Error;

use crate::auth::AuthError;
use crate::operation::ValidationError;

/// High-level API errors for Spotify Web API calls
///
/// Transport and parse failures are folded into a few domain-level variants
/// so callers can tell a dead network apart from a rejected request or a
/// response the client could not make sense of.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The connection could not be opened or the call timed out
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The service answered with a status the operation does not expect
    #[error("Unexpected HTTP status: {0}")]
    HttpStatusError(u16),

    /// The response body was malformed or larger than the configured buffer
    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    /// Obtaining or refreshing the bearer token failed
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),

    /// An operation parameter cannot be turned into a request
    ///
    /// This covers volume out of range, paths or bodies over the length
    /// limit, and image URLs that are not `https://`.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<HttpError> for ApiError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Network(msg) => ApiError::ConnectionError(msg),
            HttpError::Io(msg) => ApiError::ConnectionError(msg),
            HttpError::BodyTooLarge { limit } => {
                ApiError::JsonParseError(format!("response body exceeds {} bytes", limit))
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::JsonParseError(error.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(validation_error: ValidationError) -> Self {
        ApiError::InvalidParameter(validation_error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_conversion() {
        let api_error: ApiError = HttpError::Network("connection refused".to_string()).into();
        assert!(matches!(api_error, ApiError::ConnectionError(_)));

        let api_error: ApiError = HttpError::Io("reset by peer".to_string()).into();
        assert!(matches!(api_error, ApiError::ConnectionError(_)));

        let api_error: ApiError = HttpError::BodyTooLarge { limit: 1000 }.into();
        match api_error {
            ApiError::JsonParseError(msg) => assert!(msg.contains("1000")),
            other => panic!("Expected JsonParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_error_conversion() {
        let api_error: ApiError = ValidationError::range_error("volume_percent", 0, 100, 150).into();
        match api_error {
            ApiError::InvalidParameter(msg) => {
                assert!(msg.contains("volume_percent"));
                assert!(msg.contains("150"));
            }
            other => panic!("Expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let status = ApiError::HttpStatusError(401);
        assert_eq!(format!("{}", status), "Unexpected HTTP status: 401");

        let parse = ApiError::JsonParseError("expected value".to_string());
        assert_eq!(format!("{}", parse), "JSON parse error: expected value");

        let auth = ApiError::from(AuthError::MissingCredentials("refresh token"));
        assert!(format!("{}", auth).contains("refresh token"));
    }
}
