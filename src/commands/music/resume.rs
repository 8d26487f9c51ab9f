use super::*;
use crate::commands::music::utils::embedded_messages;

/// Resume a paused track
#[poise::command(
    slash_command,
    category = "Music",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let data = ctx.data();
    match data.registry.resume(guild_id).await {
        Ok(()) => {
            let track = data.registry.now_playing(guild_id).await.unwrap_or_default();
            ctx.send(embedded_messages::resumed(track.as_ref())).await?
        }
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
