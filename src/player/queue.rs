//! The per-session track queue: an ordered, mutable sequence with a
//! bounded-wait pop used by the control loop. Enqueue wakes a pending wait
//! immediately; nothing outside this module touches the backing storage.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::{Instant, timeout_at};

use super::error::{PlayerError, PlayerResult};
use super::track::Track;

/// Number of queue entries shown per page in the queue display.
pub const TRACKS_PER_PAGE: usize = 10;

/// A queued track together with the moment it was enqueued.
#[derive(Debug, Clone)]
pub struct QueuedTrack {
    pub track: Track,
    pub enqueued_at: DateTime<Utc>,
}

/// FIFO queue of tracks awaiting playback. Unbounded; the active track is
/// never part of the queue.
pub struct TrackQueue {
    entries: Mutex<VecDeque<QueuedTrack>>,
    notify: Notify,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
        }
    }

    /// Append a track to the tail and wake any pending `next` call.
    pub async fn push(&self, track: Track) {
        let mut entries = self.entries.lock().await;
        entries.push_back(QueuedTrack {
            track,
            enqueued_at: Utc::now(),
        });
        drop(entries);
        self.notify.notify_one();
    }

    /// Pop the head entry, waiting up to `wait` for one to arrive.
    ///
    /// Returns `None` once the timeout elapses with the queue still empty.
    /// Never spins: the wait suspends on a notification from `push`.
    pub async fn next(&self, wait: Duration) -> Option<QueuedTrack> {
        let deadline = Instant::now() + wait;
        loop {
            if let Some(item) = self.entries.lock().await.pop_front() {
                return Some(item);
            }
            // notify_one stores a permit when nobody is waiting yet, so a
            // push racing this re-check is not lost.
            if timeout_at(deadline, self.notify.notified()).await.is_err() {
                return None;
            }
        }
    }

    /// Uniform-random permutation of all queued entries. The currently
    /// playing track is not queued and is never shuffled.
    pub async fn shuffle(&self) {
        let mut entries = self.entries.lock().await;
        if entries.len() > 1 {
            let mut rng = rand::rng();
            entries.make_contiguous().shuffle(&mut rng);
        }
    }

    /// Remove the entry at a 1-based position, returning it.
    pub async fn remove_at(&self, position: usize) -> PlayerResult<QueuedTrack> {
        let mut entries = self.entries.lock().await;
        if position == 0 || position > entries.len() {
            return Err(PlayerError::OutOfRange(position));
        }
        entries
            .remove(position - 1)
            .ok_or(PlayerError::OutOfRange(position))
    }

    /// Drop every queued entry. Does not affect the active track.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Read-only view of `[start, end)` for paginated display, clamped to the
    /// queue bounds.
    pub async fn slice(&self, start: usize, end: usize) -> Vec<QueuedTrack> {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .cloned()
            .collect()
    }
}

impl Default for TrackQueue {
    fn default() -> Self {
        Self::new()
    }
}
