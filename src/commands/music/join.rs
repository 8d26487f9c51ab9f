use super::*;
use crate::commands::music::utils::{self, embedded_messages};

/// Join your current voice channel
#[poise::command(slash_command, category = "Music")]
pub async fn join(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let channel_id =
        match utils::user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id) {
            Ok(channel_id) => channel_id,
            Err(err) => {
                ctx.send(embedded_messages::error(&err)).await?;
                return Ok(());
            }
        };

    match ctx.data().registry.join(guild_id, channel_id).await {
        Ok(()) => ctx.send(embedded_messages::joined(channel_id)).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
