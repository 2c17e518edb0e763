//! Bearer token lifecycle
//!
//! The [`TokenManager`] owns the current bearer token and the credentials
//! needed to replace it. Freshness is judged from elapsed [`Instant`]s only,
//! so a device without a wall clock works the same as one with.
//!
//! Refreshes happen inline with the request that needs them. All token state
//! sits behind one mutex that is held for the duration of a refresh, so
//! threads sharing a client wait for an in-flight refresh instead of issuing
//! their own.

use std::fmt;
use std::time::{Duration, Instant};

use http_client::{HttpClient, HttpError, HttpRequest, RequestBody};
use parking_lot::Mutex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::form_urlencoded;

use crate::config::ClientConfig;

pub const TOKEN_ENDPOINT: &str = "/api/token";

/// Subtracted from the advertised lifetime so a token is replaced slightly
/// before the service would reject it
pub const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_millis(2000);

/// Errors from obtaining or refreshing a bearer token
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("Token request failed: {0}")]
    Transport(#[from] HttpError),

    #[error("Token request rejected with HTTP {status}")]
    Rejected { status: u16, body: Option<String> },

    #[error("Token response could not be parsed: {0}")]
    Parse(String),
}

/// A bearer token and the window in which it is considered valid
///
/// The stored value already carries the `Bearer ` prefix and can be used as
/// an `Authorization` header as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    issued_at: Instant,
    ttl: Duration,
}

impl Token {
    pub fn bearer(access_token: &str, ttl: Duration, issued_at: Instant) -> Self {
        Self {
            value: format!("Bearer {}", access_token),
            issued_at,
            ttl,
        }
    }

    /// A token obtained out of band, with no known expiry
    pub fn static_bearer(access_token: &str) -> Self {
        Self::bearer(access_token, Duration::MAX, Instant::now())
    }

    /// The `Authorization` header value
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// True while less than `ttl` has elapsed since the token was issued
    pub fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.issued_at) < self.ttl
    }
}

/// Lifetime to assume for a token the service says expires in `expires_in`
/// seconds
pub fn ttl_from_expires_in(expires_in: u64) -> Duration {
    Duration::from_secs(expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN)
}

/// Application credentials used to mint new bearer tokens
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshCredentials {
    client_id: String,
    client_secret: String,
    refresh_token: Option<String>,
}

impl RefreshCredentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.filter(|token| !token.is_empty()),
        }
    }

    /// Read `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and the optional
    /// `SPOTIFY_REFRESH_TOKEN` from the environment
    pub fn from_env() -> Result<Self, AuthError> {
        let client_id = std::env::var("SPOTIFY_CLIENT_ID")
            .map_err(|_| AuthError::MissingCredentials("SPOTIFY_CLIENT_ID"))?;
        let client_secret = std::env::var("SPOTIFY_CLIENT_SECRET")
            .map_err(|_| AuthError::MissingCredentials("SPOTIFY_CLIENT_SECRET"))?;
        let refresh_token = std::env::var("SPOTIFY_REFRESH_TOKEN").ok();

        Ok(Self::new(client_id, client_secret, refresh_token))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }
}

impl fmt::Debug for RefreshCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug)]
struct TokenState {
    token: Option<Token>,
    credentials: Option<RefreshCredentials>,
}

impl TokenState {
    fn is_fresh(&self, now: Instant) -> bool {
        self.token.as_ref().is_some_and(|token| token.is_fresh(now))
    }
}

/// Owner of the bearer token used for authenticated calls
#[derive(Debug)]
pub struct TokenManager {
    http: HttpClient,
    accounts_host: String,
    body_limit: usize,
    error_body_limit: usize,
    state: Mutex<TokenState>,
}

impl TokenManager {
    pub fn new(
        config: &ClientConfig,
        credentials: Option<RefreshCredentials>,
        token: Option<Token>,
    ) -> Self {
        Self {
            http: config.http_client(),
            accounts_host: config.accounts_host.clone(),
            body_limit: config.buffer_sizes.token,
            error_body_limit: config.buffer_sizes.error_body,
            state: Mutex::new(TokenState { token, credentials }),
        }
    }

    /// True if a token is held and has not outlived its ttl at `now`
    pub fn is_token_fresh(&self, now: Instant) -> bool {
        self.state.lock().is_fresh(now)
    }

    /// Refresh the token unless it is still fresh at `now`
    ///
    /// Safe to call before every request. A failed refresh leaves the
    /// previous token in place, so the next call retries.
    pub fn ensure_fresh(&self, now: Instant) -> Result<(), AuthError> {
        let mut state = self.state.lock();
        if state.is_fresh(now) {
            return Ok(());
        }

        info!("Refresh of the access token is due, doing that now");
        self.refresh_locked(&mut state).map(|_| ())
    }

    /// Exchange the stored refresh token for a new bearer token
    pub fn refresh_using_refresh_token(&self) -> Result<Token, AuthError> {
        let mut state = self.state.lock();
        self.refresh_locked(&mut state)
    }

    /// One-time bootstrap: trade an authorization code for a bearer token
    ///
    /// On success the refresh token returned by the service replaces the
    /// stored one.
    pub fn exchange_authorization_code(&self, code: &str, redirect_url: &str) -> Result<Token, AuthError> {
        let mut state = self.state.lock();
        let credentials = state
            .credentials
            .as_mut()
            .ok_or(AuthError::MissingCredentials("client credentials"))?;

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "authorization_code")
            .append_pair("code", code)
            .append_pair("redirect_uri", redirect_url)
            .append_pair("client_id", &credentials.client_id)
            .append_pair("client_secret", &credentials.client_secret)
            .finish();

        let (response, received_at) = self.request_token(body)?;
        match response.refresh_token {
            Some(refresh_token) => credentials.refresh_token = Some(refresh_token),
            None => warn!("Authorization code exchange returned no refresh token"),
        }

        let token = Token::bearer(
            &response.access_token,
            ttl_from_expires_in(response.expires_in),
            received_at,
        );
        state.token = Some(token.clone());
        Ok(token)
    }

    /// A copy of the current `Authorization` header value, if any
    pub fn authorization(&self) -> Option<String> {
        self.state.lock().token.as_ref().map(|token| token.value().to_string())
    }

    pub fn current_token(&self) -> Option<Token> {
        self.state.lock().token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.state
            .lock()
            .credentials
            .as_ref()
            .and_then(|credentials| credentials.refresh_token.clone())
    }

    /// Replace the stored refresh token
    ///
    /// An empty string clears it. Has no effect when the manager was built
    /// without client credentials.
    pub fn set_refresh_token(&self, refresh_token: &str) {
        let mut state = self.state.lock();
        match state.credentials.as_mut() {
            Some(credentials) => {
                credentials.refresh_token =
                    Some(refresh_token.to_string()).filter(|token| !token.is_empty())
            }
            None => warn!("Ignoring refresh token: no client credentials configured"),
        }
    }

    fn refresh_locked(&self, state: &mut TokenState) -> Result<Token, AuthError> {
        let credentials = state
            .credentials
            .as_ref()
            .ok_or(AuthError::MissingCredentials("client credentials"))?;
        let refresh_token = credentials
            .refresh_token
            .as_deref()
            .ok_or(AuthError::MissingCredentials("refresh token"))?;

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "refresh_token")
            .append_pair("refresh_token", refresh_token)
            .append_pair("client_id", &credentials.client_id)
            .append_pair("client_secret", &credentials.client_secret)
            .finish();

        let (response, received_at) = self.request_token(body)?;
        let token = Token::bearer(
            &response.access_token,
            ttl_from_expires_in(response.expires_in),
            received_at,
        );
        debug!(ttl = ?token.ttl(), "Access token refreshed");

        state.token = Some(token.clone());
        Ok(token)
    }

    fn request_token(&self, body: String) -> Result<(TokenResponse, Instant), AuthError> {
        let request = HttpRequest::post(self.accounts_host.as_str(), TOKEN_ENDPOINT)
            .body(Some(RequestBody::form(body)));

        let response = self.http.send(&request).map_err(|e| {
            warn!("Token request failed: {}", e);
            AuthError::from(e)
        })?;
        let received_at = Instant::now();

        let status = response.status();
        if status != 200 {
            let body = response.read_to_string_lossy(self.error_body_limit).ok();
            warn!(
                status,
                body = body.as_deref().unwrap_or(""),
                "Token request rejected"
            );
            return Err(AuthError::Rejected { status, body });
        }

        let bytes = response.read_body(self.body_limit).map_err(|e| match e {
            HttpError::BodyTooLarge { limit } => {
                AuthError::Parse(format!("token response exceeds {} bytes", limit))
            }
            other => AuthError::Transport(other),
        })?;

        let parsed: TokenResponse = serde_json::from_slice(&bytes).map_err(|e| {
            warn!("deserializing token response failed: {}", e);
            AuthError::Parse(e.to_string())
        })?;

        Ok((parsed, received_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with(token: Option<Token>, credentials: Option<RefreshCredentials>) -> TokenManager {
        TokenManager::new(&ClientConfig::default(), credentials, token)
    }

    #[test]
    fn test_token_value_is_bearer_prefixed() {
        let token = Token::bearer("abc", Duration::from_secs(10), Instant::now());
        assert_eq!(token.value(), "Bearer abc");
    }

    #[test]
    fn test_ttl_from_expires_in() {
        assert_eq!(ttl_from_expires_in(3600), Duration::from_millis(3_598_000));
        assert_eq!(ttl_from_expires_in(2), Duration::ZERO);
        assert_eq!(ttl_from_expires_in(0), Duration::ZERO);
    }

    #[test]
    fn test_freshness_boundaries() {
        let issued_at = Instant::now();
        let token = Token::bearer("abc", Duration::from_millis(1000), issued_at);

        assert!(token.is_fresh(issued_at));
        assert!(token.is_fresh(issued_at + Duration::from_millis(999)));
        assert!(!token.is_fresh(issued_at + Duration::from_millis(1000)));
        assert!(!token.is_fresh(issued_at + Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_ttl_is_never_fresh() {
        let issued_at = Instant::now();
        let token = Token::bearer("abc", Duration::ZERO, issued_at);
        assert!(!token.is_fresh(issued_at));
    }

    #[test]
    fn test_static_bearer_stays_fresh() {
        let token = Token::static_bearer("abc");
        assert!(token.is_fresh(Instant::now() + Duration::from_secs(365 * 24 * 3600)));
    }

    #[test]
    fn test_manager_without_token_is_not_fresh() {
        let manager = manager_with(None, None);
        assert!(!manager.is_token_fresh(Instant::now()));
        assert!(manager.authorization().is_none());
    }

    #[test]
    fn test_ensure_fresh_is_noop_for_fresh_token() {
        let issued_at = Instant::now();
        let manager = manager_with(
            Some(Token::bearer("abc", Duration::from_secs(60), issued_at)),
            None,
        );

        assert!(manager.ensure_fresh(issued_at + Duration::from_secs(1)).is_ok());
        assert_eq!(manager.authorization().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn test_ensure_fresh_without_credentials_fails() {
        let manager = manager_with(None, None);
        let result = manager.ensure_fresh(Instant::now());
        assert!(matches!(result, Err(AuthError::MissingCredentials("client credentials"))));
    }

    #[test]
    fn test_refresh_without_refresh_token_fails() {
        let manager = manager_with(None, Some(RefreshCredentials::new("id", "secret", None)));
        let result = manager.refresh_using_refresh_token();
        assert!(matches!(result, Err(AuthError::MissingCredentials("refresh token"))));
    }

    #[test]
    fn test_empty_refresh_token_is_treated_as_missing() {
        let credentials = RefreshCredentials::new("id", "secret", Some(String::new()));
        assert!(credentials.refresh_token().is_none());
    }

    #[test]
    fn test_set_refresh_token() {
        let manager = manager_with(None, Some(RefreshCredentials::new("id", "secret", None)));
        manager.set_refresh_token("rt-1");
        assert_eq!(manager.refresh_token().as_deref(), Some("rt-1"));

        let without_credentials = manager_with(None, None);
        without_credentials.set_refresh_token("rt-1");
        assert!(without_credentials.refresh_token().is_none());
    }

    #[test]
    fn test_empty_refresh_token_clears_stored_one() {
        let manager = manager_with(
            None,
            Some(RefreshCredentials::new("id", "secret", Some("rt-1".to_string()))),
        );
        manager.set_refresh_token("");

        assert!(manager.refresh_token().is_none());
        assert!(matches!(
            manager.refresh_using_refresh_token(),
            Err(AuthError::MissingCredentials("refresh token"))
        ));
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let credentials = RefreshCredentials::new("my-id", "my-secret", Some("my-refresh".to_string()));
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("my-id"));
        assert!(!debug.contains("my-secret"));
        assert!(!debug.contains("my-refresh"));
    }
}
