//! Spotify Web API client for small devices
//!
//! This crate drives the player endpoints of the Spotify Web API: reading
//! what is playing, the player state and the device list, and sending
//! transport commands (play, pause, skip, seek, volume, shuffle, repeat,
//! transfer). It uses the private `http-client` crate for the actual HTTP
//! exchanges.
//!
//! # Tokens
//!
//! Calls are authorized with a bearer token held by the client's
//! [`TokenManager`]. With client credentials and a refresh token, the token
//! is renewed automatically once it has expired:
//!
//! ```rust,no_run
//! use spotify_api::{RefreshCredentials, SpotifyClient};
//!
//! let credentials = RefreshCredentials::from_env()?;
//! let client = SpotifyClient::new(credentials);
//!
//! if client.pause(None) {
//!     println!("paused");
//! }
//! # Ok::<(), spotify_api::AuthError>(())
//! ```
//!
//! # Operations
//!
//! Every endpoint is a type implementing [`SpotifyOperation`] and can be run
//! through [`SpotifyClient::execute`] for a typed `Result`:
//!
//! ```rust,no_run
//! use spotify_api::operations::{SeekOperation, SeekRequest};
//! use spotify_api::SpotifyClient;
//!
//! let client = SpotifyClient::with_bearer_token("BQD...");
//! client.execute::<SeekOperation>(&SeekRequest {
//!     position_ms: 30_000,
//!     device_id: None,
//! })?;
//! # Ok::<(), spotify_api::ApiError>(())
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod operation;
pub mod operations;

pub use auth::{AuthError, RefreshCredentials, Token, TokenManager};
pub use client::{SpotifyClient, SpotifyClientBuilder};
pub use config::{BufferSizes, ClientConfig};
pub use error::{ApiError, Result};
pub use http_client::Scheme;
pub use model::{CurrentlyPlaying, Device, DeviceList, Image, PlayerDetails, RepeatMode};
pub use operation::{SpotifyOperation, ValidationError};
