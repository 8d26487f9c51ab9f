use super::*;
use crate::commands::music::utils::{self, embedded_messages};
use poise::serenity_prelude as serenity;

/// Summon the bot to a voice channel, yours by default
#[poise::command(
    slash_command,
    category = "Music",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn summon(
    ctx: Context<'_>,
    #[description = "Voice channel to join"]
    #[channel_types("Voice")]
    channel: Option<serenity::GuildChannel>,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    // An explicit channel wins; otherwise follow the caller.
    let channel_id = match channel {
        Some(channel) => channel.id,
        None => {
            match utils::user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id) {
                Ok(channel_id) => channel_id,
                Err(err) => {
                    ctx.send(embedded_messages::error(&err)).await?;
                    return Ok(());
                }
            }
        }
    };

    match ctx.data().registry.join(guild_id, channel_id).await {
        Ok(()) => ctx.send(embedded_messages::joined(channel_id)).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
