//! The per-guild playback session and its control loop: pulls tracks off the
//! queue, drives them through the voice connection one at a time, and applies
//! the loop / volume / vote-skip policies under concurrent commands.

use serenity::model::id::{GuildId, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, warn};

use super::connection::{LiveTrack, StreamEnded, VoiceConnection};
use super::error::{PlayerError, PlayerResult};
use super::queue::TrackQueue;
use super::track::Track;

/// How long the control loop waits for a next track before the session
/// disconnects. Idle sessions must not hold a voice connection indefinitely.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(180);

/// Distinct non-requester votes required to skip the current track.
pub const SKIP_VOTE_THRESHOLD: usize = 3;

/// Starting volume for a fresh session.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Result of a skip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipOutcome {
    /// The current track was skipped.
    Skipped,
    /// The vote was counted; the track plays on.
    VoteRecorded(usize),
    /// The voter already voted on this track.
    AlreadyVoted,
}

/// Status events the session emits for the command layer to render.
#[derive(Debug)]
pub enum PlayerEvent {
    NowPlaying { guild_id: GuildId, track: Track },
    TrackFailed { guild_id: GuildId, track: Track, reason: String },
    IdleDisconnected { guild_id: GuildId },
}

/// The small mutable state block every operation serializes on.
struct PlaybackState {
    current: Option<Track>,
    live: Option<Box<dyn LiveTrack>>,
    connected: bool,
    loop_enabled: bool,
    volume: f32,
    skip_votes: HashSet<UserId>,
}

/// One playback session per guild. Owns the track queue, the voice
/// connection, and the spawned control loop; mutating operations may arrive
/// from any number of command tasks concurrently.
pub struct PlaybackSession {
    guild_id: GuildId,
    queue: TrackQueue,
    connection: Arc<dyn VoiceConnection>,
    events: mpsc::UnboundedSender<PlayerEvent>,
    state: Mutex<PlaybackState>,
    shutdown: watch::Sender<bool>,
    torn_down: AtomicBool,
}

impl PlaybackSession {
    /// Create the session and start its control loop.
    pub fn spawn(
        guild_id: GuildId,
        connection: Arc<dyn VoiceConnection>,
        events: mpsc::UnboundedSender<PlayerEvent>,
    ) -> Arc<Self> {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let session = Arc::new(Self {
            guild_id,
            queue: TrackQueue::new(),
            connection,
            events,
            state: Mutex::new(PlaybackState {
                current: None,
                live: None,
                connected: true,
                loop_enabled: false,
                volume: DEFAULT_VOLUME,
                skip_votes: HashSet::new(),
            }),
            shutdown,
            torn_down: AtomicBool::new(false),
        });

        tokio::spawn(Arc::clone(&session).run(shutdown_rx));
        info!("Started playback session for guild {}", guild_id);
        session
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn queue(&self) -> &TrackQueue {
        &self.queue
    }

    /// Whether the session has released its connection and stopped its loop.
    /// Terminal: a torn-down session never comes back.
    pub fn is_terminated(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Append a resolved track; wakes the control loop if it is waiting.
    pub async fn enqueue(&self, track: Track) {
        debug!("Enqueued '{}' for guild {}", track.title, self.guild_id);
        self.queue.push(track).await;
    }

    pub async fn is_playing(&self) -> bool {
        let state = self.state.lock().await;
        state.connected && state.current.is_some()
    }

    pub async fn now_playing(&self) -> Option<Track> {
        let state = self.state.lock().await;
        state.connected.then(|| state.current.clone()).flatten()
    }

    pub async fn loop_enabled(&self) -> bool {
        self.state.lock().await.loop_enabled
    }

    pub async fn volume(&self) -> f32 {
        self.state.lock().await.volume
    }

    /// Enable or disable replay-on-completion; observable at the next track
    /// decision point.
    pub async fn set_loop(&self, enabled: bool) {
        self.state.lock().await.loop_enabled = enabled;
    }

    /// Toggle replay-on-completion, returning the new state.
    pub async fn toggle_loop(&self) -> bool {
        let mut state = self.state.lock().await;
        state.loop_enabled = !state.loop_enabled;
        state.loop_enabled
    }

    /// Set the session volume, `[0, 1]`. Applied immediately when a stream is
    /// active; the stored value is untouched on a rejected input.
    pub async fn set_volume(&self, volume: f32) -> PlayerResult<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlayerError::VolumeOutOfRange);
        }
        let mut state = self.state.lock().await;
        state.volume = volume;
        if let Some(live) = &state.live {
            live.set_volume(volume).await?;
        }
        Ok(())
    }

    pub async fn pause(&self) -> PlayerResult<()> {
        let state = self.state.lock().await;
        match &state.live {
            Some(live) => live.pause().await,
            None => Err(PlayerError::NothingPlaying),
        }
    }

    pub async fn resume(&self) -> PlayerResult<()> {
        let state = self.state.lock().await;
        match &state.live {
            Some(live) => live.resume().await,
            None => Err(PlayerError::NothingPlaying),
        }
    }

    /// Force-skip the current track. Clears accumulated votes and, in loop
    /// mode, also clears `current` so the next decision pulls from the queue
    /// instead of replaying. No-op when nothing is playing.
    pub async fn skip(&self) -> PlayerResult<()> {
        let live = {
            let mut state = self.state.lock().await;
            state.skip_votes.clear();
            if state.current.is_none() {
                return Ok(());
            }
            state.current = None;
            state.live.take()
        };
        if let Some(live) = live {
            live.stop().await?;
        }
        Ok(())
    }

    /// Register a skip vote. The track's own requester skips unconditionally;
    /// anyone else needs `SKIP_VOTE_THRESHOLD` distinct voters. Votes reset on
    /// every skip and on track change.
    pub async fn vote_skip(&self, voter: UserId) -> PlayerResult<SkipOutcome> {
        let live = {
            let mut state = self.state.lock().await;
            let requester = match &state.current {
                Some(track) => track.requested_by,
                None => return Err(PlayerError::NothingPlaying),
            };

            if requester != voter {
                if !state.skip_votes.insert(voter) {
                    return Ok(SkipOutcome::AlreadyVoted);
                }
                let votes = state.skip_votes.len();
                if votes < SKIP_VOTE_THRESHOLD {
                    return Ok(SkipOutcome::VoteRecorded(votes));
                }
            }

            state.skip_votes.clear();
            state.current = None;
            state.live.take()
        };
        if let Some(live) = live {
            live.stop().await?;
        }
        Ok(SkipOutcome::Skipped)
    }

    /// Clear the queue, stop the loop, and release the connection. Idempotent;
    /// interrupts a pending queue wait immediately.
    pub async fn stop(&self) {
        self.finalize().await;
    }

    /// One-shot teardown shared by `stop` and the loop's own exit paths. The
    /// connection is released exactly once.
    async fn finalize(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown.send(true);
        self.queue.clear().await;
        let live = {
            let mut state = self.state.lock().await;
            state.current = None;
            state.skip_votes.clear();
            state.connected = false;
            state.live.take()
        };
        if let Some(live) = live {
            let _ = live.stop().await;
        }
        if let Err(err) = self.connection.disconnect().await {
            warn!("Failed to release voice connection for guild {}: {}", self.guild_id, err);
        }
        info!("Playback session for guild {} torn down", self.guild_id);
    }

    /// The control loop: decide the next track (queue, or `current` in loop
    /// mode), start it, suspend until its completion report, repeat. Waiting
    /// out `IDLE_TIMEOUT` with an empty queue tears the session down.
    async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                break;
            }

            let repeat = {
                let state = self.state.lock().await;
                state.loop_enabled.then(|| state.current.clone()).flatten()
            };

            let track = match repeat {
                Some(track) => track,
                None => {
                    tokio::select! {
                        _ = shutdown.changed() => break,
                        next = self.queue.next(IDLE_TIMEOUT) => match next {
                            Some(entry) => entry.track,
                            None => {
                                // Designed liveness path, not an error.
                                info!(
                                    "No track within {}s for guild {}, disconnecting",
                                    IDLE_TIMEOUT.as_secs(),
                                    self.guild_id
                                );
                                let _ = self.events.send(PlayerEvent::IdleDisconnected {
                                    guild_id: self.guild_id,
                                });
                                break;
                            }
                        },
                    }
                }
            };

            // Fresh completion channel per start: a stale report from a
            // previous stream can never be mistaken for this one's.
            let (on_end, mut ended) = mpsc::channel::<StreamEnded>(1);
            let volume = self.state.lock().await.volume;
            let live = match self.connection.play(&track, volume, on_end).await {
                Ok(live) => live,
                Err(err) => {
                    warn!(
                        "Failed to start '{}' for guild {}: {}",
                        track.title, self.guild_id, err
                    );
                    let reason = err.to_string();
                    let mut state = self.state.lock().await;
                    state.current = None;
                    state.skip_votes.clear();
                    drop(state);
                    let _ = self.events.send(PlayerEvent::TrackFailed {
                        guild_id: self.guild_id,
                        track,
                        reason,
                    });
                    continue;
                }
            };

            {
                let mut state = self.state.lock().await;
                if self.torn_down.load(Ordering::SeqCst) {
                    // Lost a race with stop(): undo the start and bail.
                    drop(state);
                    let _ = live.stop().await;
                    break;
                }
                state.current = Some(track.clone());
                state.live = Some(live);
                state.skip_votes.clear();
            }
            let _ = self.events.send(PlayerEvent::NowPlaying {
                guild_id: self.guild_id,
                track: track.clone(),
            });

            tokio::select! {
                _ = shutdown.changed() => break,
                report = ended.recv() => {
                    let mut failed = false;
                    if let Some(StreamEnded { error: Some(reason) }) = report {
                        failed = true;
                        warn!(
                            "Stream for '{}' in guild {} died: {}",
                            track.title, self.guild_id, reason
                        );
                        let _ = self.events.send(PlayerEvent::TrackFailed {
                            guild_id: self.guild_id,
                            track: track.clone(),
                            reason,
                        });
                    }
                    let mut state = self.state.lock().await;
                    state.live = None;
                    state.skip_votes.clear();
                    // A failed stream never loops; the next decision point
                    // pulls from the queue instead.
                    if failed || !state.loop_enabled {
                        state.current = None;
                    }
                }
            }
        }

        self.finalize().await;
    }
}
