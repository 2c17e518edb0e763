//! Player settings: volume, shuffle, repeat and the active device

use http_client::{Method, RequestBody};
use serde_json::json;

use crate::model::RepeatMode;
use crate::operation::{check_body_len, PathBuilder, SpotifyOperation, ValidationError};
use crate::operations::{NO_CONTENT, REPEAT_ENDPOINT, SHUFFLE_ENDPOINT, TRANSFER_ENDPOINT, VOLUME_ENDPOINT};
use crate::Result;

pub const MAX_VOLUME_PERCENT: u8 = 100;

/// Set the playback volume
pub struct SetVolumeOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetVolumeRequest {
    pub volume_percent: u8,
    pub device_id: Option<String>,
}

impl SpotifyOperation for SetVolumeOperation {
    type Request = SetVolumeRequest;
    type Response = ();

    const METHOD: Method = Method::Put;
    const SUCCESS_STATUS: u16 = NO_CONTENT;
    const NAME: &'static str = "volume";

    fn path(request: &Self::Request) -> std::result::Result<String, ValidationError> {
        if request.volume_percent > MAX_VOLUME_PERCENT {
            return Err(ValidationError::range_error(
                "volume_percent",
                0,
                MAX_VOLUME_PERCENT,
                request.volume_percent,
            ));
        }

        PathBuilder::new(VOLUME_ENDPOINT)
            .query("volume_percent", request.volume_percent)
            .device_id(request.device_id.as_deref())
            .finish()
    }

    fn parse_response(_request: &Self::Request, _body: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// Turn shuffle on or off
pub struct ToggleShuffleOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleShuffleRequest {
    pub state: bool,
    pub device_id: Option<String>,
}

impl SpotifyOperation for ToggleShuffleOperation {
    type Request = ToggleShuffleRequest;
    type Response = ();

    const METHOD: Method = Method::Put;
    const SUCCESS_STATUS: u16 = NO_CONTENT;
    const NAME: &'static str = "shuffle";

    fn path(request: &Self::Request) -> std::result::Result<String, ValidationError> {
        PathBuilder::new(SHUFFLE_ENDPOINT)
            .query("state", request.state)
            .device_id(request.device_id.as_deref())
            .finish()
    }

    fn parse_response(_request: &Self::Request, _body: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// Set the repeat mode
pub struct SetRepeatModeOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRepeatModeRequest {
    pub mode: RepeatMode,
    pub device_id: Option<String>,
}

impl SpotifyOperation for SetRepeatModeOperation {
    type Request = SetRepeatModeRequest;
    type Response = ();

    const METHOD: Method = Method::Put;
    const SUCCESS_STATUS: u16 = NO_CONTENT;
    const NAME: &'static str = "repeat";

    fn path(request: &Self::Request) -> std::result::Result<String, ValidationError> {
        PathBuilder::new(REPEAT_ENDPOINT)
            .query("state", request.mode.as_str())
            .device_id(request.device_id.as_deref())
            .finish()
    }

    fn parse_response(_request: &Self::Request, _body: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// Move playback to another device
pub struct TransferPlaybackOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlaybackRequest {
    pub device_id: String,
    /// Start playing on the new device rather than keep the current state
    pub play: bool,
}

impl SpotifyOperation for TransferPlaybackOperation {
    type Request = TransferPlaybackRequest;
    type Response = ();

    const METHOD: Method = Method::Put;
    const SUCCESS_STATUS: u16 = NO_CONTENT;
    const NAME: &'static str = "transfer";

    fn path(_request: &Self::Request) -> std::result::Result<String, ValidationError> {
        PathBuilder::new(TRANSFER_ENDPOINT).finish()
    }

    fn body(request: &Self::Request) -> std::result::Result<Option<RequestBody>, ValidationError> {
        if request.device_id.is_empty() {
            return Err(ValidationError::invalid_value(
                "device_id",
                "",
                "a target device is required",
            ));
        }

        // "play" is sent as a JSON string, not a boolean
        let body = json!({
            "device_ids": [request.device_id],
            "play": request.play.to_string(),
        })
        .to_string();
        check_body_len(&body)?;

        Ok(Some(RequestBody::json(body)))
    }

    fn parse_response(_request: &Self::Request, _body: &[u8]) -> Result<()> {
        Ok(())
    }
}
