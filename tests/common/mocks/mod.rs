//! Scripted in-memory media layer: streams "play" for a configured duration
//! on the paused test clock, can be told to fail, and count every disconnect.

use encore::player::connection::{LiveTrack, StreamEnded, VoiceConnection, VoiceConnector};
use encore::player::error::PlayerResult;
use encore::player::track::Track;
use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

const DEFAULT_STREAM_DURATION: Duration = Duration::from_secs(60);

/// Shared per-URL behavior scripts, applied by every connection.
#[derive(Default)]
struct Scripts {
    durations: Mutex<HashMap<String, Duration>>,
    stream_errors: Mutex<HashMap<String, String>>,
}

/// Connector handed to the registry; remembers the connections it creates.
#[derive(Default)]
pub struct MockVoice {
    scripts: Arc<Scripts>,
    connections: Mutex<Vec<Arc<MockConnection>>>,
}

impl MockVoice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script how long a stream for this URL runs before completing.
    pub fn set_duration(&self, url: &str, duration: Duration) {
        self.scripts
            .durations
            .lock()
            .unwrap()
            .insert(url.to_string(), duration);
    }

    /// Script a mid-stream failure for this URL.
    pub fn set_stream_error(&self, url: &str, reason: &str) {
        self.scripts
            .stream_errors
            .lock()
            .unwrap()
            .insert(url.to_string(), reason.to_string());
    }

    /// The nth connection this connector has handed out.
    pub fn connection(&self, index: usize) -> Arc<MockConnection> {
        self.connections.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl VoiceConnector for MockVoice {
    async fn connect(
        &self,
        guild_id: GuildId,
        _channel_id: ChannelId,
    ) -> PlayerResult<Arc<dyn VoiceConnection>> {
        let connection = Arc::new(MockConnection {
            guild_id,
            scripts: Arc::clone(&self.scripts),
            plays: Mutex::new(Vec::new()),
            disconnects: AtomicUsize::new(0),
        });
        self.connections.lock().unwrap().push(connection.clone());
        Ok(connection)
    }
}

pub struct MockConnection {
    pub guild_id: GuildId,
    scripts: Arc<Scripts>,
    plays: Mutex<Vec<String>>,
    disconnects: AtomicUsize,
}

impl MockConnection {
    /// URLs streamed over this connection, in start order.
    pub fn play_log(&self) -> Vec<String> {
        self.plays.lock().unwrap().clone()
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceConnection for MockConnection {
    async fn play(
        &self,
        track: &Track,
        _volume: f32,
        on_end: mpsc::Sender<StreamEnded>,
    ) -> PlayerResult<Box<dyn LiveTrack>> {
        self.plays.lock().unwrap().push(track.url.clone());
        let duration = self
            .scripts
            .durations
            .lock()
            .unwrap()
            .get(&track.url)
            .copied()
            .unwrap_or(DEFAULT_STREAM_DURATION);
        let error = self
            .scripts
            .stream_errors
            .lock()
            .unwrap()
            .get(&track.url)
            .cloned();

        let (stop_tx, stop_rx) = oneshot::channel();
        tokio::spawn(async move {
            let error = tokio::select! {
                _ = tokio::time::sleep(duration) => error,
                _ = stop_rx => None,
            };
            let _ = on_end.send(StreamEnded { error }).await;
        });

        Ok(Box::new(MockLive {
            stop_tx: Mutex::new(Some(stop_tx)),
        }))
    }

    async fn disconnect(&self) -> PlayerResult<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct MockLive {
    stop_tx: Mutex<Option<oneshot::Sender<()>>>,
}

#[async_trait]
impl LiveTrack for MockLive {
    async fn set_volume(&self, _volume: f32) -> PlayerResult<()> {
        Ok(())
    }

    async fn pause(&self) -> PlayerResult<()> {
        Ok(())
    }

    async fn resume(&self) -> PlayerResult<()> {
        Ok(())
    }

    async fn stop(&self) -> PlayerResult<()> {
        if let Some(tx) = self.stop_tx.lock().unwrap().take() {
            let _ = tx.send(());
        }
        Ok(())
    }
}
