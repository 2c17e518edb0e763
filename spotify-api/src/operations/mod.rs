//! Web API operations
//!
//! Player commands (`playback`, `settings`) answer `204 No Content` and
//! carry no body back. The read operations (`currently_playing`,
//! `player_details`, `devices`) answer `200 OK` with a JSON document.

pub const CURRENTLY_PLAYING_ENDPOINT: &str = "/v1/me/player/currently-playing";
pub const PLAYER_ENDPOINT: &str = "/v1/me/player";
pub const PLAY_ENDPOINT: &str = "/v1/me/player/play";
pub const PAUSE_ENDPOINT: &str = "/v1/me/player/pause";
pub const NEXT_TRACK_ENDPOINT: &str = "/v1/me/player/next";
pub const PREVIOUS_TRACK_ENDPOINT: &str = "/v1/me/player/previous";
pub const SEEK_ENDPOINT: &str = "/v1/me/player/seek";
pub const VOLUME_ENDPOINT: &str = "/v1/me/player/volume";
pub const SHUFFLE_ENDPOINT: &str = "/v1/me/player/shuffle";
pub const REPEAT_ENDPOINT: &str = "/v1/me/player/repeat";
pub const TRANSFER_ENDPOINT: &str = "/v1/me/player";
pub const DEVICES_ENDPOINT: &str = "/v1/me/player/devices";

pub(crate) const OK: u16 = 200;
pub(crate) const NO_CONTENT: u16 = 204;

/// Request for commands whose only parameter is the target device
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceRequest {
    pub device_id: Option<String>,
}

impl DeviceRequest {
    pub fn new(device_id: Option<&str>) -> Self {
        Self {
            device_id: device_id.map(str::to_string),
        }
    }
}

/// Define a `204 No Content` player command that takes only a device id
macro_rules! device_command {
    (
        $(#[$meta:meta])*
        operation: $op:ident,
        method: $method:ident,
        endpoint: $endpoint:expr,
        name: $name:literal $(,)?
    ) => {
        $(#[$meta])*
        pub struct $op;

        impl $crate::operation::SpotifyOperation for $op {
            type Request = $crate::operations::DeviceRequest;
            type Response = ();

            const METHOD: http_client::Method = http_client::Method::$method;
            const SUCCESS_STATUS: u16 = $crate::operations::NO_CONTENT;
            const NAME: &'static str = $name;

            fn path(request: &Self::Request) -> ::std::result::Result<String, $crate::operation::ValidationError> {
                $crate::operation::PathBuilder::new($endpoint)
                    .device_id(request.device_id.as_deref())
                    .finish()
            }

            fn parse_response(_request: &Self::Request, _body: &[u8]) -> $crate::Result<()> {
                Ok(())
            }
        }
    };
}

pub mod currently_playing;
pub mod devices;
pub mod playback;
pub mod player_details;
pub mod settings;

pub use currently_playing::{GetCurrentlyPlayingOperation, GetCurrentlyPlayingRequest};
pub use devices::{GetDevicesOperation, GetDevicesRequest};
pub use playback::{
    NextOperation, PauseOperation, PlayAdvancedOperation, PlayAdvancedRequest, PlayOperation,
    PreviousOperation, SeekOperation, SeekRequest,
};
pub use player_details::{GetPlayerDetailsOperation, GetPlayerDetailsRequest};
pub use settings::{
    SetRepeatModeOperation, SetRepeatModeRequest, SetVolumeOperation, SetVolumeRequest,
    ToggleShuffleOperation, ToggleShuffleRequest, TransferPlaybackOperation,
    TransferPlaybackRequest,
};
