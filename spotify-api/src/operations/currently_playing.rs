//! GetCurrentlyPlaying operation

use http_client::Method;
use serde::Deserialize;

use crate::config::BufferSizes;
use crate::model::{select_album_images, CurrentlyPlaying, Image, NUM_ALBUM_IMAGES};
use crate::operation::{PathBuilder, SpotifyOperation, ValidationError};
use crate::operations::{CURRENTLY_PLAYING_ENDPOINT, OK};
use crate::Result;

/// Fetch the track the account is currently playing
pub struct GetCurrentlyPlayingOperation;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetCurrentlyPlayingRequest {
    /// ISO 3166-1 alpha-2 country code
    pub market: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CurrentlyPlayingBody {
    context: Option<ContextBody>,
    item: Option<ItemBody>,
    is_playing: Option<bool>,
    progress_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContextBody {
    uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemBody {
    name: Option<String>,
    uri: Option<String>,
    duration_ms: Option<u64>,
    album: Option<AlbumBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AlbumBody {
    name: Option<String>,
    uri: Option<String>,
    artists: Option<Vec<ArtistBody>>,
    images: Option<Vec<ImageBody>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArtistBody {
    name: Option<String>,
    uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageBody {
    width: Option<u32>,
    height: Option<u32>,
    url: Option<String>,
}

impl From<ImageBody> for Image {
    fn from(body: ImageBody) -> Self {
        Image {
            width: body.width.unwrap_or_default(),
            height: body.height.unwrap_or_default(),
            url: body.url.unwrap_or_default(),
        }
    }
}

impl SpotifyOperation for GetCurrentlyPlayingOperation {
    type Request = GetCurrentlyPlayingRequest;
    type Response = CurrentlyPlaying;

    const METHOD: Method = Method::Get;
    const SUCCESS_STATUS: u16 = OK;
    const NAME: &'static str = "currently-playing";

    fn path(request: &Self::Request) -> std::result::Result<String, ValidationError> {
        PathBuilder::new(CURRENTLY_PLAYING_ENDPOINT)
            .optional_query("market", request.market.as_deref())
            .finish()
    }

    fn body_limit(sizes: &BufferSizes) -> Option<usize> {
        Some(sizes.currently_playing)
    }

    fn parse_response(_request: &Self::Request, body: &[u8]) -> Result<CurrentlyPlaying> {
        let parsed: CurrentlyPlayingBody = serde_json::from_slice(body)?;

        let mut playing = CurrentlyPlaying {
            context_uri: parsed.context.and_then(|c| c.uri).unwrap_or_default(),
            is_playing: parsed.is_playing.unwrap_or_default(),
            progress_ms: parsed.progress_ms.unwrap_or_default(),
            ..CurrentlyPlaying::default()
        };

        let Some(item) = parsed.item else {
            return Ok(playing);
        };

        playing.track_name = item.name.unwrap_or_default();
        playing.track_uri = item.uri.unwrap_or_default();
        playing.duration_ms = item.duration_ms.unwrap_or_default();

        if let Some(album) = item.album {
            playing.album_name = album.name.unwrap_or_default();
            playing.album_uri = album.uri.unwrap_or_default();

            if let Some(artist) = album.artists.unwrap_or_default().into_iter().next() {
                playing.first_artist_name = artist.name.unwrap_or_default();
                playing.first_artist_uri = artist.uri.unwrap_or_default();
            }

            let images = select_album_images(album.images.unwrap_or_default(), NUM_ALBUM_IMAGES);
            playing.album_images = images.into_iter().map(Image::from).collect();
        }

        Ok(playing)
    }
}
