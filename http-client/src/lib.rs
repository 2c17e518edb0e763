//! Private HTTP transport for the Spotify Web API client
//!
//! This crate provides a minimal blocking HTTP client that opens one
//! connection per call, sends a single request and hands the status code and
//! body back to the caller. Non-2xx statuses are returned as responses, not
//! errors; interpreting them is the job of the API layer.

mod error;

pub use error::HttpError;

use std::fmt;
use std::io::{Read, Write};
use std::time::Duration;

/// Connect and overall request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// URL scheme used for every connection made by an [`HttpClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Https,
    /// Plain HTTP, for pointing the client at a local test server
    Http,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

/// HTTP methods used by the Web API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content type of a request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    FormUrlEncoded,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

/// A request body together with its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content_type: ContentType,
    pub content: String,
}

impl RequestBody {
    pub fn json(content: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Json,
            content: content.into(),
        }
    }

    pub fn form(content: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::FormUrlEncoded,
            content: content.into(),
        }
    }
}

/// A single outgoing request
///
/// `host` may carry an explicit port (`example.com:8443`) and `path` may
/// carry a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub host: String,
    pub path: String,
    pub accept: String,
    pub authorization: Option<String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(method: Method, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            host: host.into(),
            path: path.into(),
            accept: ContentType::Json.as_str().to_string(),
            authorization: None,
            body: None,
        }
    }

    pub fn get(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::Get, host, path)
    }

    pub fn put(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::Put, host, path)
    }

    pub fn post(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(Method::Post, host, path)
    }

    /// Set the `Authorization` header to an already formatted value
    pub fn bearer(mut self, authorization: Option<&str>) -> Self {
        self.authorization = authorization.map(str::to_string);
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn body(mut self, body: Option<RequestBody>) -> Self {
        self.body = body;
        self
    }
}

/// Response to a single request
///
/// The underlying connection is released once the body has been read or the
/// response is dropped.
#[derive(Debug)]
pub struct HttpResponse {
    status: u16,
    inner: ureq::Response,
}

impl HttpResponse {
    fn new(inner: ureq::Response) -> Self {
        Self {
            status: inner.status(),
            inner,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_length(&self) -> Option<u64> {
        self.inner
            .header("Content-Length")
            .and_then(|value| value.trim().parse().ok())
    }

    /// Read the whole body, refusing bodies larger than `limit` bytes
    pub fn read_body(self, limit: usize) -> Result<Vec<u8>, HttpError> {
        let mut body = Vec::new();
        self.inner
            .into_reader()
            .take((limit as u64).saturating_add(1))
            .read_to_end(&mut body)
            .map_err(|e| HttpError::Io(e.to_string()))?;

        if body.len() > limit {
            return Err(HttpError::BodyTooLarge { limit });
        }
        Ok(body)
    }

    /// Read at most `limit` bytes of the body as text, for diagnostics
    pub fn read_to_string_lossy(self, limit: usize) -> Result<String, HttpError> {
        let mut body = Vec::new();
        self.inner
            .into_reader()
            .take(limit as u64)
            .read_to_end(&mut body)
            .map_err(|e| HttpError::Io(e.to_string()))?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Stream the body into `writer`, returning the number of bytes copied
    pub fn copy_to<W: Write + ?Sized>(self, writer: &mut W) -> Result<u64, HttpError> {
        let mut reader = self.inner.into_reader();
        std::io::copy(&mut reader, writer).map_err(|e| HttpError::Io(e.to_string()))
    }
}

/// A minimal blocking HTTP client
#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
    scheme: Scheme,
}

impl HttpClient {
    /// Create a new client with the default scheme and timeouts
    pub fn new() -> Self {
        Self::with_settings(Scheme::default(), DEFAULT_TIMEOUT, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit scheme and connect/request timeouts
    pub fn with_settings(scheme: Scheme, connect_timeout: Duration, request_timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect_timeout)
                .timeout(request_timeout)
                .max_idle_connections(0)
                .build(),
            scheme,
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Full URL for a host and path under this client's scheme
    pub fn url_for(&self, host: &str, path: &str) -> String {
        format!("{}://{}{}", self.scheme.as_str(), host, path)
    }

    /// Send a request and return the response, whatever its status
    ///
    /// PUT and POST always carry a body (empty when none is given) so that a
    /// `Content-Length` header is sent.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = self.url_for(&request.host, &request.path);
        tracing::trace!("{} {}", request.method, url);

        let mut req = self
            .agent
            .request(request.method.as_str(), &url)
            .set("Accept", &request.accept);

        if let Some(authorization) = &request.authorization {
            req = req.set("Authorization", authorization);
        }

        // Let other work on this thread run before blocking on the call
        std::thread::yield_now();

        let result = match request.method {
            Method::Get => req.call(),
            Method::Put | Method::Post => {
                let (content_type, content) = match &request.body {
                    Some(body) => (body.content_type, body.content.as_str()),
                    None => (ContentType::Json, ""),
                };
                req.set("Content-Type", content_type.as_str())
                    .send_string(content)
            }
        };

        match result {
            Ok(response) => Ok(HttpResponse::new(response)),
            Err(ureq::Error::Status(_, response)) => Ok(HttpResponse::new(response)),
            Err(ureq::Error::Transport(transport)) => Err(HttpError::Network(transport.to_string())),
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_client() -> HttpClient {
        HttpClient::with_settings(Scheme::Http, DEFAULT_TIMEOUT, DEFAULT_TIMEOUT)
    }

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new();
        assert_eq!(client.scheme(), Scheme::Https);
        let _default_client = HttpClient::default();
    }

    #[test]
    fn test_url_for() {
        let client = HttpClient::new();
        assert_eq!(
            client.url_for("api.spotify.com", "/v1/me/player?market=SE"),
            "https://api.spotify.com/v1/me/player?market=SE"
        );

        let client = local_client();
        assert_eq!(client.url_for("127.0.0.1:1234", "/x"), "http://127.0.0.1:1234/x");
    }

    #[test]
    fn test_request_builder_defaults() {
        let request = HttpRequest::put("api.spotify.com", "/v1/me/player/play");
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.accept, "application/json");
        assert!(request.authorization.is_none());
        assert!(request.body.is_none());

        let request = request
            .bearer(Some("Bearer abc"))
            .body(Some(RequestBody::form("a=b")));
        assert_eq!(request.authorization.as_deref(), Some("Bearer abc"));
        assert_eq!(
            request.body.map(|b| b.content_type),
            Some(ContentType::FormUrlEncoded)
        );
    }

    #[test]
    fn test_error_status_is_returned_as_response() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/v1/me/player")
            .with_status(401)
            .with_body(r#"{"error":{"status":401,"message":"expired"}}"#)
            .create();

        let client = local_client();
        let response = client
            .send(&HttpRequest::get(server.host_with_port(), "/v1/me/player"))
            .unwrap();

        assert_eq!(response.status(), 401);
        let text = response.read_to_string_lossy(1000).unwrap();
        assert!(text.contains("expired"));
        mock.assert();
    }

    #[test]
    fn test_put_sends_headers_and_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("PUT", "/v1/me/player")
            .match_header("authorization", "Bearer abc")
            .match_header("content-type", "application/json")
            .match_header("accept", "application/json")
            .match_body(r#"{"device_ids":["d1"]}"#)
            .with_status(204)
            .create();

        let request = HttpRequest::put(server.host_with_port(), "/v1/me/player")
            .bearer(Some("Bearer abc"))
            .body(Some(RequestBody::json(r#"{"device_ids":["d1"]}"#)));
        let response = local_client().send(&request).unwrap();

        assert_eq!(response.status(), 204);
        mock.assert();
    }

    #[test]
    fn test_post_without_body_defaults_to_json() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/me/player/next")
            .match_header("content-type", "application/json")
            .with_status(204)
            .create();

        let request = HttpRequest::post(server.host_with_port(), "/v1/me/player/next");
        let response = local_client().send(&request).unwrap();

        assert_eq!(response.status(), 204);
        mock.assert();
    }

    #[test]
    fn test_read_body_limit() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/big")
            .with_status(200)
            .with_body("0123456789")
            .expect(2)
            .create();

        let client = local_client();
        let ok = client
            .send(&HttpRequest::get(server.host_with_port(), "/big"))
            .unwrap()
            .read_body(10)
            .unwrap();
        assert_eq!(ok, b"0123456789");

        let too_large = client
            .send(&HttpRequest::get(server.host_with_port(), "/big"))
            .unwrap()
            .read_body(4);
        assert!(matches!(too_large, Err(HttpError::BodyTooLarge { limit: 4 })));
    }

    #[test]
    fn test_read_body_without_effective_limit() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/small")
            .with_status(200)
            .with_body(r#"{"a":1}"#)
            .create();

        let body = local_client()
            .send(&HttpRequest::get(server.host_with_port(), "/small"))
            .unwrap()
            .read_body(usize::MAX)
            .unwrap();
        assert_eq!(body, br#"{"a":1}"#);
    }

    #[test]
    fn test_copy_to_writer() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/image/ab67")
            .with_status(200)
            .with_body(vec![0xff, 0xd8, 0xff, 0xe0])
            .create();

        let mut sink = Vec::new();
        let copied = local_client()
            .send(&HttpRequest::get(server.host_with_port(), "/image/ab67"))
            .unwrap()
            .copy_to(&mut sink)
            .unwrap();

        assert_eq!(copied, 4);
        assert_eq!(sink, vec![0xff, 0xd8, 0xff, 0xe0]);
    }

    #[test]
    fn test_connection_failure_is_network_error() {
        // Nothing listens on port 9 of the loopback interface
        let result = local_client().send(&HttpRequest::get("127.0.0.1:9", "/"));
        assert!(matches!(result, Err(HttpError::Network(_))));
    }
}
