//! songbird-backed implementations of the media-layer interfaces. A stream's
//! input is created fresh from the track URL on every start, so restarting a
//! looped track is just another `play`.

use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use serenity::prelude::Mutex as SerenityMutex;
use songbird::input::YoutubeDl;
use songbird::tracks::{PlayMode, TrackHandle};
use songbird::{Call, Event, EventContext, Songbird, TrackEvent};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::connection::{LiveTrack, StreamEnded, VoiceConnection, VoiceConnector};
use super::error::{PlayerError, PlayerResult};
use super::track::Track;
use crate::HTTP_CLIENT;

/// Establishes songbird voice connections.
pub struct SongbirdConnector {
    manager: Arc<Songbird>,
}

impl SongbirdConnector {
    pub fn new(manager: Arc<Songbird>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl VoiceConnector for SongbirdConnector {
    async fn connect(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> PlayerResult<Arc<dyn VoiceConnection>> {
        let call = self
            .manager
            .join(guild_id, channel_id)
            .await
            .map_err(|err| PlayerError::Join(err.to_string()))?;

        Ok(Arc::new(SongbirdConnection {
            manager: Arc::clone(&self.manager),
            guild_id,
            call,
        }))
    }
}

/// A live songbird call owned by one playback session.
pub struct SongbirdConnection {
    manager: Arc<Songbird>,
    guild_id: GuildId,
    call: Arc<SerenityMutex<Call>>,
}

/// Forwards songbird track end/error events into the completion channel.
struct StreamEndNotifier {
    on_end: mpsc::Sender<StreamEnded>,
}

#[async_trait]
impl songbird::EventHandler for StreamEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(tracks) = ctx {
            let error = tracks.iter().find_map(|(state, _)| match &state.playing {
                PlayMode::Errored(err) => Some(err.to_string()),
                _ => None,
            });
            // Capacity 1 and try_send: at most one report reaches the loop
            // even when both the error and end events fire for a stream.
            let _ = self.on_end.try_send(StreamEnded { error });
        }
        None
    }
}

#[async_trait]
impl VoiceConnection for SongbirdConnection {
    async fn play(
        &self,
        track: &Track,
        volume: f32,
        on_end: mpsc::Sender<StreamEnded>,
    ) -> PlayerResult<Box<dyn LiveTrack>> {
        let input = YoutubeDl::new(HTTP_CLIENT.clone(), track.url.clone());

        let handle = {
            let mut call = self.call.lock().await;
            call.play_input(input.into())
        };

        handle
            .set_volume(volume)
            .map_err(|err| PlayerError::Playback(err.to_string()))?;

        for event in [TrackEvent::End, TrackEvent::Error] {
            handle
                .add_event(
                    Event::Track(event),
                    StreamEndNotifier {
                        on_end: on_end.clone(),
                    },
                )
                .map_err(|err| PlayerError::Playback(err.to_string()))?;
        }

        Ok(Box::new(SongbirdTrack { handle }))
    }

    async fn disconnect(&self) -> PlayerResult<()> {
        // Already gone (e.g. kicked from the channel) counts as released.
        if self.manager.get(self.guild_id).is_none() {
            return Ok(());
        }
        self.manager
            .remove(self.guild_id)
            .await
            .map_err(|err| PlayerError::Connection(err.to_string()))
    }
}

struct SongbirdTrack {
    handle: TrackHandle,
}

#[async_trait]
impl LiveTrack for SongbirdTrack {
    async fn set_volume(&self, volume: f32) -> PlayerResult<()> {
        self.handle
            .set_volume(volume)
            .map_err(|err| PlayerError::Playback(err.to_string()))
    }

    async fn pause(&self) -> PlayerResult<()> {
        self.handle
            .pause()
            .map_err(|err| PlayerError::Playback(err.to_string()))
    }

    async fn resume(&self) -> PlayerResult<()> {
        self.handle
            .play()
            .map_err(|err| PlayerError::Playback(err.to_string()))
    }

    async fn stop(&self) -> PlayerResult<()> {
        self.handle
            .stop()
            .map_err(|err| PlayerError::Playback(err.to_string()))
    }
}
