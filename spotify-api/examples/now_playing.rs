//! Print the track playing on the account, then list its devices
//!
//! Needs `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and
//! `SPOTIFY_REFRESH_TOKEN` in the environment. Set `SPOTIFY_LOG_MODE=debug`
//! to see the requests being made.

use spotify_api::logging::init_logging_from_env;
use spotify_api::{RefreshCredentials, SpotifyClient};

const MAX_DEVICES: usize = 6;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_from_env()?;

    let client = SpotifyClient::new(RefreshCredentials::from_env()?);

    let playing = client.get_currently_playing(None);
    if playing.error {
        println!("Nothing playing (or the request failed)");
    } else {
        println!(
            "{} {} - {} [{}/{} s]",
            if playing.is_playing { "▶" } else { "⏸" },
            playing.track_name,
            playing.first_artist_name,
            playing.progress_ms / 1000,
            playing.duration_ms / 1000,
        );
        if let Some(image) = playing.album_images.last() {
            println!("  art: {} ({}x{})", image.url, image.width, image.height);
        }
    }

    let devices = client.get_devices(MAX_DEVICES);
    for device in &devices.devices {
        println!(
            "{} {} ({}) volume {}%",
            if device.is_active { "*" } else { " " },
            device.name,
            device.device_type,
            device.volume_percent
        );
    }
    if devices.discarded > 0 {
        println!("  ... and {} more", devices.discarded);
    }

    Ok(())
}
