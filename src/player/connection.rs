//! Interfaces consumed from the media layer. The control loop issues a
//! non-blocking `play` and suspends on the completion channel; the media
//! layer reports `StreamEnded` exactly once per started stream, whether the
//! stream ran to the end, was stopped, or died mid-flight.

use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::error::PlayerResult;
use super::track::Track;

/// Completion report for a started stream. `error` carries the cause when
/// the stream failed mid-flight; a clean end (including stop/skip) is `None`.
#[derive(Debug)]
pub struct StreamEnded {
    pub error: Option<String>,
}

/// Handle to the stream a connection is currently playing.
#[async_trait]
pub trait LiveTrack: Send + Sync {
    async fn set_volume(&self, volume: f32) -> PlayerResult<()>;
    async fn pause(&self) -> PlayerResult<()>;
    async fn resume(&self) -> PlayerResult<()>;
    /// Stop the stream. The completion report still fires.
    async fn stop(&self) -> PlayerResult<()>;
}

/// A live voice connection owned by exactly one playback session.
#[async_trait]
pub trait VoiceConnection: Send + Sync {
    /// Start streaming `track` at `volume`, reporting completion on `on_end`.
    /// Returns immediately with a handle to the active stream.
    async fn play(
        &self,
        track: &Track,
        volume: f32,
        on_end: mpsc::Sender<StreamEnded>,
    ) -> PlayerResult<Box<dyn LiveTrack>>;

    /// Leave the voice channel and release the connection.
    async fn disconnect(&self) -> PlayerResult<()>;
}

/// Establishes voice connections; the registry uses this when a session is
/// created for a guild.
#[async_trait]
pub trait VoiceConnector: Send + Sync {
    async fn connect(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> PlayerResult<Arc<dyn VoiceConnection>>;
}
