//! Length-checked request path building

use std::fmt::Display;

use url::form_urlencoded;

use super::ValidationError;

/// Longest request path (including the query string) the client will send
pub const MAX_PATH_LEN: usize = 256;

/// Longest request body the client will send
pub const MAX_BODY_LEN: usize = 4096;

/// Builds `path?key=value&key=value` strings
///
/// The first query parameter is joined with `?`, every later one with `&`,
/// whether the path came with a query already or not. Values are
/// percent-encoded. The length limit is enforced by [`PathBuilder::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBuilder {
    path: String,
}

impl PathBuilder {
    pub fn new(base: &str) -> Self {
        Self {
            path: base.to_string(),
        }
    }

    /// Append `key=value`, joined with `?` or `&` as appropriate
    pub fn query(mut self, key: &str, value: impl Display) -> Self {
        let separator = if self.path.contains('?') { '&' } else { '?' };
        self.path.push(separator);
        self.path.push_str(key);
        self.path.push('=');
        self.path
            .extend(form_urlencoded::byte_serialize(value.to_string().as_bytes()));
        self
    }

    /// Append `key=value` only when a value is given
    pub fn optional_query(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.query(key, value),
            _ => self,
        }
    }

    /// Append `device_id=<id>` when a device is given
    pub fn device_id(self, device_id: Option<&str>) -> Self {
        self.optional_query("device_id", device_id)
    }

    pub fn finish(self) -> Result<String, ValidationError> {
        if self.path.len() > MAX_PATH_LEN {
            return Err(ValidationError::TooLong {
                what: "path",
                length: self.path.len(),
                max: MAX_PATH_LEN,
            });
        }
        Ok(self.path)
    }
}
