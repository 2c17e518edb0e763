use std::io::Write;
use std::time::Instant;

use http_client::{HttpClient, HttpRequest};
use tracing::{debug, warn};
use url::Url;

use crate::auth::{RefreshCredentials, Token, TokenManager};
use crate::config::ClientConfig;
use crate::model::{CurrentlyPlaying, DeviceList, PlayerDetails, RepeatMode};
use crate::operation::SpotifyOperation;
use crate::operations::{
    DeviceRequest, GetCurrentlyPlayingOperation, GetCurrentlyPlayingRequest, GetDevicesOperation,
    GetDevicesRequest, GetPlayerDetailsOperation, GetPlayerDetailsRequest, NextOperation,
    PauseOperation, PlayAdvancedOperation, PlayAdvancedRequest, PlayOperation, PreviousOperation,
    SeekOperation, SeekRequest, SetRepeatModeOperation, SetRepeatModeRequest, SetVolumeOperation,
    SetVolumeRequest, ToggleShuffleOperation, ToggleShuffleRequest, TransferPlaybackOperation,
    TransferPlaybackRequest,
};
use crate::{ApiError, Result};

/// `Accept` header sent when downloading album art
pub const IMAGE_ACCEPT: &str = "image/jpeg,image/png,image/*;q=0.8";

/// A client for the Spotify Web API player endpoints
///
/// The client owns the bearer token (through its [`TokenManager`]) and
/// refreshes it before a call once it has expired. Every call opens its own
/// connection and blocks until the response is in.
///
/// Two layers are offered:
///
/// - [`SpotifyClient::execute`] runs any [`SpotifyOperation`] and returns a
///   `Result`.
/// - The convenience methods (`play`, `get_currently_playing`, ...) never
///   return an error. Commands answer `true`/`false`; reads return a result
///   with its `error` flag set. Failures are logged.
///
/// ```rust,no_run
/// use spotify_api::{RefreshCredentials, SpotifyClient};
///
/// let credentials = RefreshCredentials::new("client-id", "client-secret", Some("refresh".into()));
/// let client = SpotifyClient::new(credentials);
///
/// let playing = client.get_currently_playing(None);
/// if !playing.error {
///     println!("{} by {}", playing.track_name, playing.first_artist_name);
/// }
/// ```
#[derive(Debug)]
pub struct SpotifyClient {
    http: HttpClient,
    config: ClientConfig,
    tokens: TokenManager,
}

/// Builder for [`SpotifyClient`]
#[derive(Debug, Default)]
pub struct SpotifyClientBuilder {
    config: ClientConfig,
    credentials: Option<RefreshCredentials>,
    token: Option<Token>,
}

impl SpotifyClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Client id, secret and refresh token used to mint bearer tokens
    pub fn credentials(mut self, credentials: RefreshCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Start from an existing bearer token
    pub fn bearer_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    pub fn build(self) -> SpotifyClient {
        SpotifyClient {
            http: self.config.http_client(),
            tokens: TokenManager::new(&self.config, self.credentials, self.token),
            config: self.config,
        }
    }
}

impl SpotifyClient {
    pub fn builder() -> SpotifyClientBuilder {
        SpotifyClientBuilder::default()
    }

    /// Create a client that refreshes its own tokens from `credentials`
    pub fn new(credentials: RefreshCredentials) -> Self {
        Self::builder().credentials(credentials).build()
    }

    /// Create a client around a bearer token obtained elsewhere
    ///
    /// The token is treated as never expiring; there is nothing to refresh
    /// it with.
    pub fn with_bearer_token(access_token: &str) -> Self {
        Self::builder()
            .bearer_token(Token::static_bearer(access_token))
            .build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    /// Execute a Web API operation
    ///
    /// When auto refresh is on, an expired token is refreshed first. A failed
    /// refresh is logged and the call goes ahead with whatever token is held,
    /// so the service decides whether it is still good.
    ///
    /// A status other than the operation's success status becomes
    /// [`ApiError::HttpStatusError`].
    pub fn execute<Op: SpotifyOperation>(&self, request: &Op::Request) -> Result<Op::Response> {
        if self.config.auto_token_refresh {
            if let Err(e) = self.tokens.ensure_fresh(Instant::now()) {
                warn!("Failed to refresh access token: {}", e);
            }
        }

        let path = Op::path(request)?;
        let body = Op::body(request)?;
        debug!(operation = Op::NAME, "{} {}", Op::METHOD, path);

        let authorization = self.tokens.authorization();
        let http_request = HttpRequest::new(Op::METHOD, self.config.api_host.as_str(), path)
            .bearer(authorization.as_deref())
            .body(body);

        let response = self.http.send(&http_request)?;
        let status = response.status();
        if status != Op::SUCCESS_STATUS {
            let body = response
                .read_to_string_lossy(self.config.buffer_sizes.error_body)
                .unwrap_or_default();
            debug!(operation = Op::NAME, status, body = body.as_str(), "Unexpected status");
            return Err(ApiError::HttpStatusError(status));
        }

        let bytes = match Op::body_limit(&self.config.buffer_sizes) {
            Some(limit) => response.read_body(limit)?,
            None => Vec::new(),
        };

        Op::parse_response(request, &bytes).map_err(|e| {
            warn!(operation = Op::NAME, "Failed to parse response: {}", e);
            e
        })
    }

    pub fn get_currently_playing(&self, market: Option<&str>) -> CurrentlyPlaying {
        let request = GetCurrentlyPlayingRequest {
            market: market.map(str::to_string),
        };
        self.execute::<GetCurrentlyPlayingOperation>(&request)
            .unwrap_or_else(|e| {
                debug!("currently playing unavailable: {}", e);
                CurrentlyPlaying::failed()
            })
    }

    pub fn get_player_details(&self, market: Option<&str>) -> PlayerDetails {
        let request = GetPlayerDetailsRequest {
            market: market.map(str::to_string),
        };
        self.execute::<GetPlayerDetailsOperation>(&request)
            .unwrap_or_else(|e| {
                debug!("player details unavailable: {}", e);
                PlayerDetails::failed()
            })
    }

    /// List devices, keeping at most `max_devices`
    pub fn get_devices(&self, max_devices: usize) -> DeviceList {
        self.execute::<GetDevicesOperation>(&GetDevicesRequest { max_devices })
            .unwrap_or_else(|e| {
                debug!("device list unavailable: {}", e);
                DeviceList::failed()
            })
    }

    pub fn play(&self, device_id: Option<&str>) -> bool {
        self.command::<PlayOperation>(&DeviceRequest::new(device_id))
    }

    /// Start playback with a raw JSON body, e.g. a `context_uri` and offset
    pub fn play_advanced(&self, body: &str, device_id: Option<&str>) -> bool {
        self.command::<PlayAdvancedOperation>(&PlayAdvancedRequest {
            body: body.to_string(),
            device_id: device_id.map(str::to_string),
        })
    }

    pub fn pause(&self, device_id: Option<&str>) -> bool {
        self.command::<PauseOperation>(&DeviceRequest::new(device_id))
    }

    pub fn next_track(&self, device_id: Option<&str>) -> bool {
        self.command::<NextOperation>(&DeviceRequest::new(device_id))
    }

    pub fn previous_track(&self, device_id: Option<&str>) -> bool {
        self.command::<PreviousOperation>(&DeviceRequest::new(device_id))
    }

    pub fn seek(&self, position_ms: u32, device_id: Option<&str>) -> bool {
        self.command::<SeekOperation>(&SeekRequest {
            position_ms,
            device_id: device_id.map(str::to_string),
        })
    }

    /// Set the volume; values above 100 are rejected without a request
    pub fn set_volume(&self, volume_percent: u8, device_id: Option<&str>) -> bool {
        self.command::<SetVolumeOperation>(&SetVolumeRequest {
            volume_percent,
            device_id: device_id.map(str::to_string),
        })
    }

    pub fn toggle_shuffle(&self, state: bool, device_id: Option<&str>) -> bool {
        self.command::<ToggleShuffleOperation>(&ToggleShuffleRequest {
            state,
            device_id: device_id.map(str::to_string),
        })
    }

    pub fn set_repeat_mode(&self, mode: RepeatMode, device_id: Option<&str>) -> bool {
        self.command::<SetRepeatModeOperation>(&SetRepeatModeRequest {
            mode,
            device_id: device_id.map(str::to_string),
        })
    }

    pub fn transfer_playback(&self, device_id: &str, play: bool) -> bool {
        self.command::<TransferPlaybackOperation>(&TransferPlaybackRequest {
            device_id: device_id.to_string(),
            play,
        })
    }

    fn command<Op: SpotifyOperation<Response = ()>>(&self, request: &Op::Request) -> bool {
        match self.execute::<Op>(request) {
            Ok(()) => true,
            Err(e) => {
                warn!(operation = Op::NAME, "Command failed: {}", e);
                false
            }
        }
    }

    /// Download an image (typically album art) into `writer`
    ///
    /// Only `https://` URLs are accepted. The connection itself uses the
    /// client's configured [`Scheme`](http_client::Scheme), so a client set
    /// to `Scheme::Http` fetches the same host and path over plain HTTP. No
    /// `Authorization` header is sent. Returns the number of bytes written.
    pub fn fetch_image<W: Write + ?Sized>(&self, image_url: &str, writer: &mut W) -> Result<u64> {
        let (host, path) = split_image_url(image_url)?;
        debug!("GET image {}{}", host, path);

        let request = HttpRequest::get(host, path).accept(IMAGE_ACCEPT);
        let response = self.http.send(&request)?;

        let status = response.status();
        if status != 200 {
            return Err(ApiError::HttpStatusError(status));
        }

        if let Some(length) = response.content_length() {
            debug!(length, "Image download started");
        }
        Ok(response.copy_to(writer)?)
    }

    /// Like [`SpotifyClient::fetch_image`], reporting only success
    pub fn get_image<W: Write + ?Sized>(&self, image_url: &str, writer: &mut W) -> bool {
        match self.fetch_image(image_url, writer) {
            Ok(_) => true,
            Err(e) => {
                warn!("Image download failed: {}", e);
                false
            }
        }
    }

    /// Force a token refresh with the stored refresh token
    pub fn refresh_access_token(&self) -> bool {
        match self.tokens.refresh_using_refresh_token() {
            Ok(_) => true,
            Err(e) => {
                warn!("Failed to refresh access token: {}", e);
                false
            }
        }
    }

    /// Refresh only when the current token has expired
    ///
    /// Returns `true` when a refresh happened and succeeded.
    pub fn check_and_refresh_access_token(&self) -> bool {
        let now = Instant::now();
        if self.tokens.is_token_fresh(now) {
            return false;
        }

        match self.tokens.ensure_fresh(now) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to refresh access token: {}", e);
                false
            }
        }
    }

    /// Trade an authorization code for tokens, keeping the new refresh token
    pub fn request_access_tokens(&self, code: &str, redirect_url: &str) -> bool {
        match self.tokens.exchange_authorization_code(code, redirect_url) {
            Ok(_) => true,
            Err(e) => {
                warn!("Authorization code exchange failed: {}", e);
                false
            }
        }
    }

    pub fn set_refresh_token(&self, refresh_token: &str) {
        self.tokens.set_refresh_token(refresh_token);
    }
}

/// Split an `https://` URL into `host[:port]` and `path[?query]`
fn split_image_url(image_url: &str) -> Result<(String, String)> {
    let url = Url::parse(image_url)
        .map_err(|e| ApiError::InvalidParameter(format!("image url '{}': {}", image_url, e)))?;

    if url.scheme() != "https" {
        return Err(ApiError::InvalidParameter(format!(
            "image url '{}' is not https",
            image_url
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ApiError::InvalidParameter(format!("image url '{}' has no host", image_url)))?;
    let host = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let path = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };

    Ok((host, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_split_image_url() {
        let (host, path) = split_image_url("https://i.scdn.co/image/ab67616d00004851").unwrap();
        assert_eq!(host, "i.scdn.co");
        assert_eq!(path, "/image/ab67616d00004851");

        let (host, path) = split_image_url("https://127.0.0.1:8443/art.jpg?size=64").unwrap();
        assert_eq!(host, "127.0.0.1:8443");
        assert_eq!(path, "/art.jpg?size=64");
    }

    #[test]
    fn test_split_image_url_rejects_plain_http() {
        assert!(matches!(
            split_image_url("http://i.scdn.co/image/abc"),
            Err(ApiError::InvalidParameter(_))
        ));
        assert!(matches!(
            split_image_url("not a url"),
            Err(ApiError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let client = SpotifyClient::builder().build();
        assert_eq!(client.config(), &ClientConfig::default());
        assert!(client.token_manager().current_token().is_none());
    }

    #[test]
    fn test_with_bearer_token() {
        let client = SpotifyClient::with_bearer_token("abc");
        assert_eq!(client.token_manager().authorization().as_deref(), Some("Bearer abc"));
        assert!(client
            .token_manager()
            .is_token_fresh(Instant::now() + Duration::from_secs(86_400)));
    }

    #[test]
    fn test_check_and_refresh_skips_fresh_token() {
        let client = SpotifyClient::with_bearer_token("abc");
        assert!(!client.check_and_refresh_access_token());
    }

    #[test]
    fn test_refresh_without_credentials_reports_failure() {
        let client = SpotifyClient::with_bearer_token("abc");
        assert!(!client.refresh_access_token());
        assert!(!client.request_access_tokens("code", "http://localhost/callback"));
        assert_eq!(client.token_manager().authorization().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn test_invalid_volume_is_rejected_before_sending() {
        // Port 9 (discard) is never contacted because validation fails first
        let config = ClientConfig::default()
            .with_host("127.0.0.1:9", http_client::Scheme::Http)
            .with_auto_token_refresh(false);
        let client = SpotifyClient::builder().config(config).build();

        let result = client.execute::<SetVolumeOperation>(&SetVolumeRequest {
            volume_percent: 101,
            device_id: None,
        });
        assert!(matches!(result, Err(ApiError::InvalidParameter(_))));
    }
}
