//! Client configuration
//!
//! Only values live here: hosts, timeouts, per-endpoint body limits and the
//! auto-refresh switch. Credentials are handled by [`crate::auth`].

use std::time::Duration;

use http_client::{HttpClient, Scheme, DEFAULT_TIMEOUT};

pub const SPOTIFY_HOST: &str = "api.spotify.com";
pub const SPOTIFY_ACCOUNTS_HOST: &str = "accounts.spotify.com";

/// Upper bounds, in bytes, on the JSON documents the client will buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSizes {
    pub token: usize,
    pub currently_playing: usize,
    pub player_details: usize,
    pub devices: usize,
    /// How much of an unexpected error body is kept for the log
    pub error_body: usize,
}

impl Default for BufferSizes {
    fn default() -> Self {
        Self {
            token: 4 * 1024,
            currently_playing: 32 * 1024,
            player_details: 32 * 1024,
            devices: 16 * 1024,
            error_body: 1000,
        }
    }
}

/// Configuration for a [`crate::SpotifyClient`]
///
/// ```rust
/// use std::time::Duration;
/// use spotify_api::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_request_timeout(Duration::from_secs(5))
///     .with_auto_token_refresh(false);
/// assert_eq!(config.api_host, "api.spotify.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_host: String,
    pub accounts_host: String,
    pub scheme: Scheme,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub buffer_sizes: BufferSizes,
    /// Refresh the bearer token before each call once it has expired
    pub auto_token_refresh: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_host: SPOTIFY_HOST.to_string(),
            accounts_host: SPOTIFY_ACCOUNTS_HOST.to_string(),
            scheme: Scheme::Https,
            connect_timeout: DEFAULT_TIMEOUT,
            request_timeout: DEFAULT_TIMEOUT,
            buffer_sizes: BufferSizes::default(),
            auto_token_refresh: true,
        }
    }
}

impl ClientConfig {
    /// Send both API and accounts traffic to one host, e.g. a local mock server
    pub fn with_host(mut self, host: impl Into<String>, scheme: Scheme) -> Self {
        let host = host.into();
        self.api_host = host.clone();
        self.accounts_host = host;
        self.scheme = scheme;
        self
    }

    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    pub fn with_accounts_host(mut self, host: impl Into<String>) -> Self {
        self.accounts_host = host.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_buffer_sizes(mut self, buffer_sizes: BufferSizes) -> Self {
        self.buffer_sizes = buffer_sizes;
        self
    }

    pub fn with_auto_token_refresh(mut self, enabled: bool) -> Self {
        self.auto_token_refresh = enabled;
        self
    }

    pub(crate) fn http_client(&self) -> HttpClient {
        HttpClient::with_settings(self.scheme, self.connect_timeout, self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_host, SPOTIFY_HOST);
        assert_eq!(config.accounts_host, SPOTIFY_ACCOUNTS_HOST);
        assert_eq!(config.scheme, Scheme::Https);
        assert_eq!(config.connect_timeout, Duration::from_millis(2000));
        assert_eq!(config.request_timeout, Duration::from_millis(2000));
        assert!(config.auto_token_refresh);
    }

    #[test]
    fn test_with_host_points_both_hosts() {
        let config = ClientConfig::default().with_host("127.0.0.1:4000", Scheme::Http);
        assert_eq!(config.api_host, "127.0.0.1:4000");
        assert_eq!(config.accounts_host, "127.0.0.1:4000");
        assert_eq!(config.scheme, Scheme::Http);
        assert_eq!(config.http_client().scheme(), Scheme::Http);
    }
}
