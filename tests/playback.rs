//! End-to-end playback scenarios driving the session registry against the
//! scripted mock media layer on a paused clock.

mod common;

use assert_matches::assert_matches;
use common::fixtures::{track, url_for};
use common::mocks::MockVoice;
use encore::player::error::PlayerError;
use encore::player::registry::SessionRegistry;
use encore::player::session::{PlayerEvent, SkipOutcome};
use pretty_assertions::assert_eq;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const GUILD: GuildId = GuildId::new(100);
const CHANNEL: ChannelId = ChannelId::new(200);

fn setup() -> (
    SessionRegistry,
    Arc<MockVoice>,
    mpsc::UnboundedReceiver<PlayerEvent>,
) {
    common::init();
    let voice = MockVoice::new();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let registry = SessionRegistry::new(voice.clone(), events_tx);
    (registry, voice, events_rx)
}

async fn expect_now_playing(events: &mut mpsc::UnboundedReceiver<PlayerEvent>, title: &str) {
    match events.recv().await.expect("event channel closed") {
        PlayerEvent::NowPlaying { track, .. } => assert_eq!(track.title, title),
        other => panic!("expected NowPlaying({title}), got {other:?}"),
    }
}

/// Enqueued tracks play strictly in order; once the queue stays empty for the
/// idle timeout the session disconnects, exactly once, and is gone from the
/// registry.
#[tokio::test(start_paused = true)]
async fn drains_queue_in_fifo_order_then_idle_disconnects() {
    let (registry, voice, mut events) = setup();
    registry.join(GUILD, CHANNEL).await.unwrap();

    for title in ["a", "b", "c"] {
        registry.enqueue(GUILD, track(title, 1)).await.unwrap();
    }

    for title in ["a", "b", "c"] {
        expect_now_playing(&mut events, title).await;
    }
    assert_matches!(
        events.recv().await,
        Some(PlayerEvent::IdleDisconnected { guild_id }) if guild_id == GUILD
    );

    let connection = voice.connection(0);
    assert_eq!(connection.guild_id, GUILD);
    assert_eq!(
        connection.play_log(),
        vec![url_for("a"), url_for("b"), url_for("c")]
    );
    assert_eq!(connection.disconnect_count(), 1);
    assert!(registry.session(GUILD).is_none());
}

/// Stopping mid-track drops the rest of the queue, releases the connection
/// once, and leaves nothing playing.
#[tokio::test(start_paused = true)]
async fn stop_mid_track_clears_queue_and_releases_connection() {
    let (registry, voice, mut events) = setup();
    voice.set_duration(&url_for("b"), Duration::from_secs(3600));
    registry.join(GUILD, CHANNEL).await.unwrap();

    registry.enqueue(GUILD, track("b", 1)).await.unwrap();
    expect_now_playing(&mut events, "b").await;
    registry.enqueue(GUILD, track("c", 1)).await.unwrap();

    let session = registry.session(GUILD).unwrap();
    registry.stop(GUILD).await.unwrap();

    assert_eq!(session.queue().len().await, 0);
    assert_eq!(session.now_playing().await, None);
    assert_eq!(voice.connection(0).disconnect_count(), 1);

    // The session is terminal; commands now see no connection at all.
    assert_matches!(
        registry.now_playing(GUILD).await,
        Err(PlayerError::NotConnected)
    );
    assert_eq!(voice.connection(0).play_log(), vec![url_for("b")]);
}

/// Loop mode restarts the same track identity without touching the queue;
/// toggling it off lets the session run dry and disconnect.
#[tokio::test(start_paused = true)]
async fn loop_mode_restarts_stream_until_toggled_off() {
    let (registry, voice, mut events) = setup();
    registry.join(GUILD, CHANNEL).await.unwrap();

    registry.enqueue(GUILD, track("a", 1)).await.unwrap();
    expect_now_playing(&mut events, "a").await;
    assert!(registry.toggle_loop(GUILD).await.unwrap());

    expect_now_playing(&mut events, "a").await;
    expect_now_playing(&mut events, "a").await;
    let session = registry.session(GUILD).unwrap();
    assert_eq!(session.queue().len().await, 0);

    assert!(!registry.toggle_loop(GUILD).await.unwrap());
    assert_matches!(
        events.recv().await,
        Some(PlayerEvent::IdleDisconnected { .. })
    );

    let connection = voice.connection(0);
    assert!(connection.play_log().len() >= 3);
    assert!(connection.play_log().iter().all(|url| *url == url_for("a")));
    assert_eq!(connection.disconnect_count(), 1);
}

/// Three distinct non-requester votes skip exactly once; the requester skips
/// unconditionally.
#[tokio::test(start_paused = true)]
async fn vote_skip_threshold_and_requester_bypass() {
    let (registry, voice, mut events) = setup();
    for title in ["a", "b"] {
        voice.set_duration(&url_for(title), Duration::from_secs(3600));
    }
    registry.join(GUILD, CHANNEL).await.unwrap();

    registry.enqueue(GUILD, track("a", 1)).await.unwrap();
    registry.enqueue(GUILD, track("b", 1)).await.unwrap();
    expect_now_playing(&mut events, "a").await;

    assert_matches!(
        registry.skip(GUILD, 2.into()).await,
        Ok(SkipOutcome::VoteRecorded(1))
    );
    assert_matches!(
        registry.skip(GUILD, 3.into()).await,
        Ok(SkipOutcome::VoteRecorded(2))
    );
    assert_matches!(
        registry.skip(GUILD, 3.into()).await,
        Ok(SkipOutcome::AlreadyVoted)
    );
    assert_matches!(registry.skip(GUILD, 4.into()).await, Ok(SkipOutcome::Skipped));

    expect_now_playing(&mut events, "b").await;

    // The requester of "b" needs no votes at all.
    assert_matches!(registry.skip(GUILD, 1.into()).await, Ok(SkipOutcome::Skipped));

    assert_eq!(voice.connection(0).play_log(), vec![url_for("a"), url_for("b")]);
}

/// A stream that dies mid-flight is reported and playback moves on.
#[tokio::test(start_paused = true)]
async fn mid_stream_failure_reports_and_continues() {
    let (registry, voice, mut events) = setup();
    voice.set_stream_error(&url_for("a"), "connection reset by peer");
    registry.join(GUILD, CHANNEL).await.unwrap();

    registry.enqueue(GUILD, track("a", 1)).await.unwrap();
    registry.enqueue(GUILD, track("b", 1)).await.unwrap();

    expect_now_playing(&mut events, "a").await;
    assert_matches!(
        events.recv().await,
        Some(PlayerEvent::TrackFailed { reason, .. }) if reason == "connection reset by peer"
    );
    expect_now_playing(&mut events, "b").await;
}

/// Leaving destroys the session immediately, interrupting the idle wait
/// rather than letting it run out the timeout.
#[tokio::test(start_paused = true)]
async fn leave_interrupts_idle_wait_immediately() {
    let (registry, voice, _events) = setup();
    registry.join(GUILD, CHANNEL).await.unwrap();

    registry.destroy(GUILD).await.unwrap();

    assert_eq!(voice.connection(0).disconnect_count(), 1);
    assert!(registry.session(GUILD).is_none());
    assert_matches!(
        registry.enqueue(GUILD, track("a", 1)).await,
        Err(PlayerError::NotConnected)
    );
}
