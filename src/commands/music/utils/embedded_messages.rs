//! Reply and embed builders shared by the music commands and the announcer.

use poise::{CreateReply, serenity_prelude as serenity};
use serenity::all::{CreateEmbed, CreateEmbedFooter};
use serenity::model::id::ChannelId;

use super::format_duration;
use crate::player::error::PlayerError;
use crate::player::registry::QueuePage;
use crate::player::session::SKIP_VOTE_THRESHOLD;
use crate::player::track::Track;

fn success(description: impl Into<String>) -> CreateReply {
    CreateReply::default().embed(CreateEmbed::new().description(description.into()).color(0x00ff00))
}

fn failure(description: impl Into<String>) -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("❌ Error")
                .description(description.into())
                .color(0xff0000),
        )
        .ephemeral(true)
}

fn duration_field(track: &Track) -> String {
    track
        .duration
        .map(format_duration)
        .unwrap_or_else(|| "Unknown duration".to_string())
}

pub fn error(err: &PlayerError) -> CreateReply {
    failure(err.to_string())
}

/// The now-playing embed: title, duration, requester, uploader, link.
pub fn now_playing_embed(track: &Track) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("🎵 Now Playing")
        .description(format!("[{}]({})", track.title, track.url))
        .field("Duration", format!("`{}`", duration_field(track)), true)
        .field("Requested by", track.requested_by_name.clone(), true)
        .color(0x00ff00);

    if let Some(uploader) = &track.uploader {
        embed = embed.field("Uploader", uploader.clone(), true);
    }
    if let Some(thumbnail) = &track.thumbnail {
        embed = embed.thumbnail(thumbnail.clone());
    }
    embed
}

pub fn now_playing(track: &Track) -> CreateReply {
    CreateReply::default().embed(now_playing_embed(track))
}

pub fn playback_failed_embed(track: &Track, reason: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("❌ Playback Failed")
        .description(format!("[{}]({}): {}", track.title, track.url, reason))
        .color(0xff0000)
}

pub fn enqueued(track: &Track) -> CreateReply {
    let mut embed = CreateEmbed::new()
        .title("🎵 Added to Queue")
        .description(format!("[{}]({})", track.title, track.url))
        .field("Duration", format!("`{}`", duration_field(track)), true)
        .color(0x00ff00);

    if let Some(thumbnail) = &track.thumbnail {
        embed = embed.thumbnail(thumbnail.clone());
    }
    CreateReply::default().embed(embed)
}

pub fn joined(channel_id: ChannelId) -> CreateReply {
    success(format!("🔊 Joined <#{channel_id}>"))
}

pub fn left() -> CreateReply {
    CreateReply::default().content("👋 Left the voice channel")
}

pub fn stopped() -> CreateReply {
    CreateReply::default().content("🛑 Stopped playback and cleared the queue")
}

pub fn paused(track: Option<&Track>) -> CreateReply {
    match track {
        Some(track) => success(format!("⏸️ Paused [{}]({})", track.title, track.url)),
        None => success("⏸️ Paused"),
    }
}

pub fn resumed(track: Option<&Track>) -> CreateReply {
    match track {
        Some(track) => success(format!("▶️ Resumed [{}]({})", track.title, track.url)),
        None => success("▶️ Resumed"),
    }
}

pub fn skipped() -> CreateReply {
    success("⏭️ Skipped to the next track")
}

pub fn vote_recorded(count: usize) -> CreateReply {
    success(format!(
        "Skip vote added, currently at **{count}/{SKIP_VOTE_THRESHOLD}**"
    ))
}

pub fn already_voted() -> CreateReply {
    failure("You have already voted to skip this song")
}

pub fn loop_state(enabled: bool) -> CreateReply {
    if enabled {
        success("🔁 Loop enabled, the current track will repeat")
    } else {
        success("➡️ Loop disabled")
    }
}

pub fn volume_set(percent: i64) -> CreateReply {
    success(format!("🔊 Volume set to {percent}%"))
}

pub fn shuffled() -> CreateReply {
    success("🔀 Shuffled the queue")
}

pub fn removed(track: &Track, position: usize) -> CreateReply {
    success(format!(
        "🗑️ Removed [{}]({}) from position #{position}",
        track.title, track.url
    ))
}

pub fn idle_disconnected() -> String {
    "💤 Nothing played for a while, leaving the voice channel".to_string()
}

/// One page of the queue with the active track on top.
pub fn queue(page: &QueuePage, now: Option<&Track>) -> CreateReply {
    let mut description = String::new();

    match now {
        Some(track) => {
            description.push_str("**🎵 Now Playing**\n");
            description.push_str(&format!("**[{}]({})**", track.title, track.url));
            if let Some(duration) = track.duration {
                description.push_str(&format!(" `{}`", format_duration(duration)));
            }
            description.push_str("\n\n");
        }
        None => description.push_str("**🔇 Nothing playing**\n\n"),
    }

    description.push_str(&format!("**📋 Queue - {} tracks**\n", page.total));
    for (offset, item) in page.tracks.iter().enumerate() {
        let position = page.first_position() + offset;
        description.push_str(&format!(
            "`{}.` [**{}**]({})",
            position, item.track.title, item.track.url
        ));
        if let Some(duration) = item.track.duration {
            description.push_str(&format!(" `{}`", format_duration(duration)));
        }
        description.push('\n');
    }

    let embed = CreateEmbed::new()
        .description(description)
        .footer(CreateEmbedFooter::new(format!(
            "Viewing page {}/{}",
            page.page, page.pages
        )))
        .color(0x00ff00);

    CreateReply::default().embed(embed)
}
