use super::*;
use crate::commands::music::utils::embedded_messages;

/// Stop playback and clear the queue
#[poise::command(
    slash_command,
    category = "Music",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    match ctx.data().registry.stop(guild_id).await {
        Ok(()) => ctx.send(embedded_messages::stopped()).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
