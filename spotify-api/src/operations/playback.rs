//! Transport commands: play, pause, skip and seek

use http_client::{Method, RequestBody};

use crate::operation::{check_body_len, PathBuilder, SpotifyOperation, ValidationError};
use crate::operations::{
    NEXT_TRACK_ENDPOINT, NO_CONTENT, PAUSE_ENDPOINT, PLAY_ENDPOINT,
    PREVIOUS_TRACK_ENDPOINT, SEEK_ENDPOINT,
};
use crate::Result;

device_command! {
    /// Resume playback on the active or given device
    operation: PlayOperation,
    method: Put,
    endpoint: PLAY_ENDPOINT,
    name: "play",
}

device_command! {
    operation: PauseOperation,
    method: Put,
    endpoint: PAUSE_ENDPOINT,
    name: "pause",
}

device_command! {
    /// Skip to the next track
    operation: NextOperation,
    method: Post,
    endpoint: NEXT_TRACK_ENDPOINT,
    name: "next",
}

device_command! {
    /// Skip to the previous track
    operation: PreviousOperation,
    method: Post,
    endpoint: PREVIOUS_TRACK_ENDPOINT,
    name: "previous",
}

/// Start playback with a caller-supplied JSON body
///
/// The body is passed through as is, e.g.
/// `{"context_uri":"spotify:album:…","offset":{"position":5}}`.
pub struct PlayAdvancedOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayAdvancedRequest {
    pub body: String,
    pub device_id: Option<String>,
}

impl SpotifyOperation for PlayAdvancedOperation {
    type Request = PlayAdvancedRequest;
    type Response = ();

    const METHOD: Method = Method::Put;
    const SUCCESS_STATUS: u16 = NO_CONTENT;
    const NAME: &'static str = "play";

    fn path(request: &Self::Request) -> std::result::Result<String, ValidationError> {
        PathBuilder::new(PLAY_ENDPOINT)
            .device_id(request.device_id.as_deref())
            .finish()
    }

    fn body(request: &Self::Request) -> std::result::Result<Option<RequestBody>, ValidationError> {
        check_body_len(&request.body)?;
        serde_json::from_str::<serde_json::Value>(&request.body)
            .map_err(|e| ValidationError::invalid_value("body", &request.body, &e.to_string()))?;
        Ok(Some(RequestBody::json(request.body.clone())))
    }

    fn parse_response(_request: &Self::Request, _body: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// Seek to a position in the current track
pub struct SeekOperation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekRequest {
    pub position_ms: u32,
    pub device_id: Option<String>,
}

impl SpotifyOperation for SeekOperation {
    type Request = SeekRequest;
    type Response = ();

    const METHOD: Method = Method::Put;
    const SUCCESS_STATUS: u16 = NO_CONTENT;
    const NAME: &'static str = "seek";

    fn path(request: &Self::Request) -> std::result::Result<String, ValidationError> {
        PathBuilder::new(SEEK_ENDPOINT)
            .query("position_ms", request.position_ms)
            .device_id(request.device_id.as_deref())
            .finish()
    }

    fn parse_response(_request: &Self::Request, _body: &[u8]) -> Result<()> {
        Ok(())
    }
}
