//! Maps each guild to its playback session and exposes the guild-keyed
//! operations the command layer calls. Creation is atomic per guild; teardown
//! is explicit so a live voice connection is never left to a finalizer.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::join_all;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use super::connection::VoiceConnector;
use super::error::{PlayerError, PlayerResult};
use super::queue::{QueuedTrack, TRACKS_PER_PAGE};
use super::session::{PlaybackSession, PlayerEvent, SkipOutcome};
use super::track::Track;

/// One page of the queue display.
pub struct QueuePage {
    pub tracks: Vec<QueuedTrack>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

impl QueuePage {
    /// 1-based queue position of the first entry on this page.
    pub fn first_position(&self) -> usize {
        (self.page - 1) * TRACKS_PER_PAGE + 1
    }
}

enum Placed {
    Fresh,
    Replaced(Arc<PlaybackSession>),
    Conflict,
}

/// Guild-keyed registry of playback sessions.
pub struct SessionRegistry {
    sessions: DashMap<GuildId, Arc<PlaybackSession>>,
    connector: Arc<dyn VoiceConnector>,
    events: mpsc::UnboundedSender<PlayerEvent>,
}

impl SessionRegistry {
    pub fn new(
        connector: Arc<dyn VoiceConnector>,
        events: mpsc::UnboundedSender<PlayerEvent>,
    ) -> Self {
        Self {
            sessions: DashMap::new(),
            connector,
            events,
        }
    }

    /// The live session for a guild, if any. A session that tore itself down
    /// (idle timeout, stop) is evicted here and reported as absent.
    pub fn session(&self, guild_id: GuildId) -> Option<Arc<PlaybackSession>> {
        let session = Arc::clone(self.sessions.get(&guild_id)?.value());
        if session.is_terminated() {
            self.sessions
                .remove_if(&guild_id, |_, entry| entry.is_terminated());
            return None;
        }
        Some(session)
    }

    fn live_session(&self, guild_id: GuildId) -> PlayerResult<Arc<PlaybackSession>> {
        self.session(guild_id).ok_or(PlayerError::NotConnected)
    }

    /// Connect to a voice channel and start a session for the guild.
    /// A guild never has two sessions: a live one makes this a conflict.
    pub async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> PlayerResult<()> {
        if self.session(guild_id).is_some() {
            return Err(PlayerError::AlreadyConnected);
        }

        let connection = self.connector.connect(guild_id, channel_id).await?;
        let session = PlaybackSession::spawn(guild_id, connection, self.events.clone());

        // Publish atomically; no await while the shard entry is held.
        let placed = match self.sessions.entry(guild_id) {
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&session));
                Placed::Fresh
            }
            Entry::Occupied(mut slot) => {
                if slot.get().is_terminated() {
                    Placed::Replaced(slot.insert(Arc::clone(&session)))
                } else {
                    Placed::Conflict
                }
            }
        };

        match placed {
            Placed::Fresh => Ok(()),
            Placed::Replaced(stale) => {
                stale.stop().await;
                Ok(())
            }
            Placed::Conflict => {
                // A concurrent join won; back out the session we just built.
                session.stop().await;
                Err(PlayerError::AlreadyConnected)
            }
        }
    }

    /// Stop the guild's session and drop its entry.
    pub async fn destroy(&self, guild_id: GuildId) -> PlayerResult<()> {
        match self.sessions.remove(&guild_id) {
            Some((_, session)) => {
                session.stop().await;
                Ok(())
            }
            None => Err(PlayerError::NotConnected),
        }
    }

    /// Stop every session. Called on process shutdown so no voice connection
    /// outlives the bot.
    pub async fn shutdown(&self) {
        let sessions: Vec<_> = self
            .sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        self.sessions.clear();
        join_all(sessions.iter().map(|session| session.stop())).await;
        info!("Stopped {} playback session(s)", sessions.len());
    }

    pub async fn enqueue(&self, guild_id: GuildId, track: Track) -> PlayerResult<()> {
        self.live_session(guild_id)?.enqueue(track).await;
        Ok(())
    }

    /// Vote to skip the current track; the track's requester skips outright.
    pub async fn skip(&self, guild_id: GuildId, requester: UserId) -> PlayerResult<SkipOutcome> {
        self.live_session(guild_id)?.vote_skip(requester).await
    }

    pub async fn pause(&self, guild_id: GuildId) -> PlayerResult<()> {
        self.live_session(guild_id)?.pause().await
    }

    pub async fn resume(&self, guild_id: GuildId) -> PlayerResult<()> {
        self.live_session(guild_id)?.resume().await
    }

    /// Clear the queue and release the guild's connection.
    pub async fn stop(&self, guild_id: GuildId) -> PlayerResult<()> {
        let session = self.live_session(guild_id)?;
        if !session.is_playing().await {
            return Err(PlayerError::NothingPlaying);
        }
        session.stop().await;
        Ok(())
    }

    /// Set the playback volume from a user-facing percentage.
    pub async fn set_volume(&self, guild_id: GuildId, percent: i64) -> PlayerResult<()> {
        if !(0..=100).contains(&percent) {
            return Err(PlayerError::VolumeOutOfRange);
        }
        self.live_session(guild_id)?
            .set_volume(percent as f32 / 100.0)
            .await
    }

    /// Toggle loop mode, returning the new state.
    pub async fn toggle_loop(&self, guild_id: GuildId) -> PlayerResult<bool> {
        Ok(self.live_session(guild_id)?.toggle_loop().await)
    }

    /// A page of the queue, 1-based and clamped to the last page.
    pub async fn queue_page(&self, guild_id: GuildId, page: usize) -> PlayerResult<QueuePage> {
        let session = self.live_session(guild_id)?;
        let total = session.queue().len().await;
        if total == 0 {
            return Err(PlayerError::EmptyQueue);
        }
        let pages = total.div_ceil(TRACKS_PER_PAGE);
        let page = page.clamp(1, pages);
        let start = (page - 1) * TRACKS_PER_PAGE;
        let tracks = session.queue().slice(start, start + TRACKS_PER_PAGE).await;
        Ok(QueuePage {
            tracks,
            page,
            pages,
            total,
        })
    }

    pub async fn shuffle(&self, guild_id: GuildId) -> PlayerResult<()> {
        let session = self.live_session(guild_id)?;
        if session.queue().is_empty().await {
            return Err(PlayerError::EmptyQueue);
        }
        session.queue().shuffle().await;
        Ok(())
    }

    /// Remove the queued track at a 1-based position, returning it.
    pub async fn remove(&self, guild_id: GuildId, position: usize) -> PlayerResult<Track> {
        let removed = self
            .live_session(guild_id)?
            .queue()
            .remove_at(position)
            .await?;
        Ok(removed.track)
    }

    pub async fn now_playing(&self, guild_id: GuildId) -> PlayerResult<Option<Track>> {
        Ok(self.live_session(guild_id)?.now_playing().await)
    }
}
