pub mod announcer;
pub mod embedded_messages;

use poise::serenity_prelude as serenity;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::time::Duration;

use crate::player::error::{PlayerError, PlayerResult};

/// Voice channel the user is currently in, from the guild's cached voice
/// states.
pub fn user_voice_channel(
    ctx: &serenity::Context,
    guild_id: GuildId,
    user_id: UserId,
) -> PlayerResult<ChannelId> {
    let guild = ctx.cache.guild(guild_id).ok_or(PlayerError::NotInGuild)?;

    guild
        .voice_states
        .get(&user_id)
        .and_then(|voice_state| voice_state.channel_id)
        .ok_or(PlayerError::UserNotInVoiceChannel)
}

/// Format a duration into a human-readable string
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let minutes = seconds / 60;
    let seconds = seconds % 60;

    if minutes >= 60 {
        let hours = minutes / 60;
        let minutes = minutes % 60;
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
