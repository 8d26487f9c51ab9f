//! Turns a search string into a playable `Track`.
//! The production resolver shells out to `yt-dlp` for metadata extraction;
//! resolution always runs on the command path, never on a control loop.

use serenity::async_trait;
use serenity::model::id::UserId;
use std::process::Command;
use tracing::info;
use url::Url;

use super::error::{PlayerError, PlayerResult};
use super::track::Track;

/// The external collaborator that resolves queries into tracks.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    async fn resolve(
        &self,
        query: &str,
        requested_by: UserId,
        requested_by_name: &str,
    ) -> PlayerResult<Track>;
}

/// Resolver backed by the `yt-dlp` command-line tool. Direct URLs are fetched
/// as-is; anything else goes through a `ytsearch:` lookup.
#[derive(Default)]
pub struct YtDlpResolver;

#[async_trait]
impl TrackResolver for YtDlpResolver {
    async fn resolve(
        &self,
        query: &str,
        requested_by: UserId,
        requested_by_name: &str,
    ) -> PlayerResult<Track> {
        info!("Resolving track for query: {}", query);
        let target = if is_url(query) {
            query.to_string()
        } else {
            format!("ytsearch:{query}")
        };

        let output = tokio::task::spawn_blocking(move || {
            Command::new("yt-dlp")
                .args([
                    "-j",            // Output as JSON
                    "--no-playlist", // Don't process playlists
                    &target,
                ])
                .output()
        })
        .await
        .map_err(|err| PlayerError::ResolutionFailed(err.to_string()))?
        .map_err(|err| PlayerError::ResolutionFailed(format!("Failed to run yt-dlp: {err}")))?;

        if !output.status.success() {
            return Err(PlayerError::ResolutionFailed(format!(
                "yt-dlp exited with {}",
                output.status
            )));
        }

        let metadata = String::from_utf8_lossy(&output.stdout);
        track_from_json(&metadata, requested_by, requested_by_name)
    }
}

/// Whether the query is a direct http(s) URL rather than a search term.
pub fn is_url(query: &str) -> bool {
    Url::parse(query)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Converts the output of `yt-dlp -j` into a `Track`.
fn track_from_json(
    metadata: &str,
    requested_by: UserId,
    requested_by_name: &str,
) -> PlayerResult<Track> {
    let json: serde_json::Value = serde_json::from_str(metadata).map_err(|err| {
        PlayerError::ResolutionFailed(format!("Failed to parse video metadata: {err}"))
    })?;

    // The page URL is what the media layer streams from; without it the
    // track cannot be played at all.
    let url = json["webpage_url"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            PlayerError::ResolutionFailed("Video metadata is missing a playable URL".to_string())
        })?;

    Ok(Track {
        title: json["title"].as_str().unwrap_or("Unknown Title").to_string(),
        uploader: json["uploader"].as_str().map(str::to_string),
        duration: json["duration"]
            .as_f64()
            .map(std::time::Duration::from_secs_f64),
        url,
        thumbnail: json["thumbnail"].as_str().map(str::to_string),
        requested_by,
        requested_by_name: requested_by_name.to_string(),
    })
}
