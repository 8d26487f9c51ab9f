use super::*;
use crate::commands::music::utils::embedded_messages;

/// Clear the queue and leave the voice channel
#[poise::command(
    slash_command,
    category = "Music",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let data = ctx.data();
    match data.registry.destroy(guild_id).await {
        Ok(()) => {
            data.announce_channels.remove(&guild_id);
            ctx.send(embedded_messages::left()).await?
        }
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
