//! Result types returned by the read operations
//!
//! All of these are plain value snapshots. Each carries an `error` flag:
//! when it is set, every other field holds its default and must not be
//! trusted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of album images kept on a [`CurrentlyPlaying`]
pub const NUM_ALBUM_IMAGES: usize = 3;

/// Repeat setting of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    Track,
    Context,
    #[default]
    Off,
}

impl RepeatMode {
    /// The value the Web API uses for this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatMode::Track => "track",
            RepeatMode::Context => "context",
            RepeatMode::Off => "off",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a repeat state the client does not know
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown repeat state: {0}")]
pub struct UnknownRepeatMode(pub String);

impl FromStr for RepeatMode {
    type Err = UnknownRepeatMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track" => Ok(RepeatMode::Track),
            "context" => Ok(RepeatMode::Context),
            "off" => Ok(RepeatMode::Off),
            other => Err(UnknownRepeatMode(other.to_string())),
        }
    }
}

/// One album artwork entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub url: String,
}

/// A playback target known to the account
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub device_type: String,
    pub is_active: bool,
    pub is_restricted: bool,
    pub is_private_session: bool,
    pub volume_percent: u8,
}

/// State of the player as reported by `GET /v1/me/player`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayerDetails {
    pub device: Device,
    pub progress_ms: u64,
    pub is_playing: bool,
    pub repeat_state: RepeatMode,
    pub shuffle_state: bool,
    pub error: bool,
}

impl PlayerDetails {
    pub fn failed() -> Self {
        Self {
            error: true,
            ..Self::default()
        }
    }
}

/// The track currently playing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CurrentlyPlaying {
    pub track_name: String,
    pub track_uri: String,
    pub album_name: String,
    pub album_uri: String,
    pub first_artist_name: String,
    pub first_artist_uri: String,
    pub context_uri: String,
    /// At most [`NUM_ALBUM_IMAGES`] entries, smallest last
    pub album_images: Vec<Image>,
    pub is_playing: bool,
    pub progress_ms: u64,
    pub duration_ms: u64,
    pub error: bool,
}

impl CurrentlyPlaying {
    pub fn failed() -> Self {
        Self {
            error: true,
            ..Self::default()
        }
    }
}

/// Devices returned by `GET /v1/me/player/devices`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceList {
    pub devices: Vec<Device>,
    /// How many devices were dropped to stay within the caller's maximum
    pub discarded: usize,
    pub error: bool,
}

impl DeviceList {
    pub fn failed() -> Self {
        Self {
            error: true,
            ..Self::default()
        }
    }
}

/// Keep the last `cap` images, in their original order
///
/// The service lists artwork widest first, so the tail holds the small
/// images that suit a small display.
pub fn select_album_images<T>(mut images: Vec<T>, cap: usize) -> Vec<T> {
    if images.len() > cap {
        images.drain(..images.len() - cap);
    }
    images
}

/// Keep at most `max` devices; returns the kept devices and how many were
/// dropped
pub fn truncate_devices<T>(mut devices: Vec<T>, max: usize) -> (Vec<T>, usize) {
    let discarded = devices.len().saturating_sub(max);
    devices.truncate(max);
    (devices, discarded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_mode_round_trip() {
        for mode in [RepeatMode::Track, RepeatMode::Context, RepeatMode::Off] {
            assert_eq!(mode.as_str().parse::<RepeatMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_repeat_mode_rejects_unknown() {
        assert_eq!(
            "tracks".parse::<RepeatMode>(),
            Err(UnknownRepeatMode("tracks".to_string()))
        );
        assert!("".parse::<RepeatMode>().is_err());
        assert!("Off".parse::<RepeatMode>().is_err());
    }

    #[test]
    fn test_repeat_mode_serde() {
        assert_eq!(serde_json::to_string(&RepeatMode::Context).unwrap(), "\"context\"");
        let mode: RepeatMode = serde_json::from_str("\"track\"").unwrap();
        assert_eq!(mode, RepeatMode::Track);
        assert!(serde_json::from_str::<RepeatMode>("\"shuffle\"").is_err());
    }

    #[test]
    fn test_failed_results_are_otherwise_default() {
        let playing = CurrentlyPlaying::failed();
        assert!(playing.error);
        assert_eq!(playing, CurrentlyPlaying { error: true, ..Default::default() });

        assert!(PlayerDetails::failed().error);
        assert!(DeviceList::failed().error);
        assert!(DeviceList::failed().devices.is_empty());
    }

    #[test]
    fn test_select_album_images_keeps_smallest() {
        let images = vec![640, 300, 64, 32];
        assert_eq!(select_album_images(images, 3), vec![300, 64, 32]);
        assert_eq!(select_album_images(vec![640, 300], 3), vec![640, 300]);
        assert!(select_album_images(Vec::<u32>::new(), 3).is_empty());
    }

    #[test]
    fn test_truncate_devices() {
        assert_eq!(truncate_devices(vec!['a', 'b', 'c'], 2), (vec!['a', 'b'], 1));
        assert_eq!(truncate_devices(vec!['a'], 5), (vec!['a'], 0));
        assert_eq!(truncate_devices(vec!['a', 'b'], 0), (vec![], 2));
    }
}
