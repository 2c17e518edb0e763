//! Test helpers for mock-server integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use mockito::Server;
use spotify_api::{ClientConfig, RefreshCredentials, Scheme, SpotifyClient, Token};

pub const TEST_BEARER: &str = "Bearer test-token";

/// Load a JSON fixture from the fixtures directory
pub fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// Config sending API and accounts traffic to the mock server over plain HTTP
pub fn config_for(server: &Server) -> ClientConfig {
    ClientConfig::default().with_host(server.host_with_port(), Scheme::Http)
}

/// A client holding a never-expiring bearer token
pub fn bearer_client(server: &Server) -> SpotifyClient {
    SpotifyClient::builder()
        .config(config_for(server))
        .bearer_token(Token::static_bearer("test-token"))
        .build()
}

pub fn test_credentials() -> RefreshCredentials {
    RefreshCredentials::new("test-client-id", "test-client-secret", Some("test-refresh-token".to_string()))
}

/// A client with credentials and no token yet
pub fn refreshing_client(server: &Server) -> SpotifyClient {
    SpotifyClient::builder()
        .config(config_for(server))
        .credentials(test_credentials())
        .build()
}
