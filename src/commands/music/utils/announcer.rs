//! Consumes the playback sessions' status events and posts them to the
//! channel each guild's last `play` command came from.

use dashmap::DashMap;
use poise::serenity_prelude as serenity;
use serenity::all::CreateMessage;
use serenity::model::id::{ChannelId, GuildId};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use super::embedded_messages;
use crate::player::session::PlayerEvent;

pub async fn run(
    http: Arc<serenity::Http>,
    channels: Arc<DashMap<GuildId, ChannelId>>,
    mut events: UnboundedReceiver<PlayerEvent>,
) {
    while let Some(event) = events.recv().await {
        let guild_id = match &event {
            PlayerEvent::NowPlaying { guild_id, .. }
            | PlayerEvent::TrackFailed { guild_id, .. }
            | PlayerEvent::IdleDisconnected { guild_id } => *guild_id,
        };

        let Some(channel_id) = channels.get(&guild_id).map(|entry| *entry) else {
            continue;
        };

        let message = match &event {
            PlayerEvent::NowPlaying { track, .. } => {
                CreateMessage::new().embed(embedded_messages::now_playing_embed(track))
            }
            PlayerEvent::TrackFailed { track, reason, .. } => {
                CreateMessage::new().embed(embedded_messages::playback_failed_embed(track, reason))
            }
            PlayerEvent::IdleDisconnected { .. } => {
                channels.remove(&guild_id);
                CreateMessage::new().content(embedded_messages::idle_disconnected())
            }
        };

        if let Err(err) = channel_id.send_message(http.clone(), message).await {
            warn!(
                "Failed to post player update in guild {}: {}",
                guild_id, err
            );
        }
    }

    info!("Announcer stopped, event channel closed");
}
