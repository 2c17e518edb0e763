//! GetPlayerDetails operation

use http_client::Method;
use serde::Deserialize;

use crate::config::BufferSizes;
use crate::model::{Device, PlayerDetails, RepeatMode};
use crate::operation::{PathBuilder, SpotifyOperation, ValidationError};
use crate::operations::devices::DeviceBody;
use crate::operations::{OK, PLAYER_ENDPOINT};
use crate::Result;

/// Fetch device, progress, shuffle and repeat state of the player
pub struct GetPlayerDetailsOperation;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetPlayerDetailsRequest {
    pub market: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlayerBody {
    device: Option<DeviceBody>,
    progress_ms: Option<u64>,
    is_playing: Option<bool>,
    shuffle_state: Option<bool>,
    // Unknown values fail the whole parse
    repeat_state: Option<RepeatMode>,
}

impl SpotifyOperation for GetPlayerDetailsOperation {
    type Request = GetPlayerDetailsRequest;
    type Response = PlayerDetails;

    const METHOD: Method = Method::Get;
    const SUCCESS_STATUS: u16 = OK;
    const NAME: &'static str = "player";

    fn path(request: &Self::Request) -> std::result::Result<String, ValidationError> {
        PathBuilder::new(PLAYER_ENDPOINT)
            .optional_query("market", request.market.as_deref())
            .finish()
    }

    fn body_limit(sizes: &BufferSizes) -> Option<usize> {
        Some(sizes.player_details)
    }

    fn parse_response(_request: &Self::Request, body: &[u8]) -> Result<PlayerDetails> {
        let parsed: PlayerBody = serde_json::from_slice(body)?;

        Ok(PlayerDetails {
            device: parsed.device.map(Device::from).unwrap_or_default(),
            progress_ms: parsed.progress_ms.unwrap_or_default(),
            is_playing: parsed.is_playing.unwrap_or_default(),
            repeat_state: parsed.repeat_state.unwrap_or_default(),
            shuffle_state: parsed.shuffle_state.unwrap_or_default(),
            error: false,
        })
    }
}
