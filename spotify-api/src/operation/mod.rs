//! Operation framework
//!
//! Every Web API call the client knows about is a zero-sized type
//! implementing [`SpotifyOperation`]. The trait ties together the HTTP
//! method, the path and body built from a typed request, the status that
//! means success, and the mapping from the response body into a typed
//! result.

mod path;

pub use path::{PathBuilder, MAX_BODY_LEN, MAX_PATH_LEN};

use http_client::{Method, RequestBody};

use crate::config::BufferSizes;
use crate::error::ApiError;

/// Base trait for all Web API operations
pub trait SpotifyOperation {
    /// The typed request data for this operation
    type Request;

    /// The typed result of a successful call
    type Response;

    /// HTTP method used for the call
    const METHOD: Method;

    /// Status code that signals success
    const SUCCESS_STATUS: u16;

    /// Short name used in log output
    const NAME: &'static str;

    /// Build the request path, including any query string
    fn path(request: &Self::Request) -> Result<String, ValidationError>;

    /// Build the request body, if the operation sends one
    fn body(_request: &Self::Request) -> Result<Option<RequestBody>, ValidationError> {
        Ok(None)
    }

    /// Largest response body the operation will read
    ///
    /// `None` means the body is not read at all and `parse_response` receives
    /// an empty slice.
    fn body_limit(_sizes: &BufferSizes) -> Option<usize> {
        None
    }

    /// Map a successful response body into the typed response
    fn parse_response(request: &Self::Request, body: &[u8]) -> Result<Self::Response, ApiError>;
}

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Parameter '{parameter}' value '{value}' is out of range ({min}..={max})")]
    RangeError {
        parameter: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Parameter '{parameter}' value '{value}' is invalid: {reason}")]
    InvalidValue {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("{what} would be {length} bytes, limit is {max}")]
    TooLong {
        what: &'static str,
        length: usize,
        max: usize,
    },
}

impl ValidationError {
    pub fn range_error(
        parameter: &str,
        min: impl std::fmt::Display,
        max: impl std::fmt::Display,
        value: impl std::fmt::Display,
    ) -> Self {
        Self::RangeError {
            parameter: parameter.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn invalid_value(parameter: &str, value: impl std::fmt::Display, reason: &str) -> Self {
        Self::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Check a request body against [`MAX_BODY_LEN`]
pub fn check_body_len(body: &str) -> Result<(), ValidationError> {
    if body.len() > MAX_BODY_LEN {
        return Err(ValidationError::TooLong {
            what: "body",
            length: body.len(),
            max: MAX_BODY_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_display() {
        let error = ValidationError::range_error("volume_percent", 0, 100, 101);
        assert_eq!(
            error.to_string(),
            "Parameter 'volume_percent' value '101' is out of range (0..=100)"
        );
    }

    #[test]
    fn test_check_body_len() {
        assert!(check_body_len("{}").is_ok());

        let oversized = "x".repeat(MAX_BODY_LEN + 1);
        assert!(matches!(
            check_body_len(&oversized),
            Err(ValidationError::TooLong { what: "body", .. })
        ));
    }
}
