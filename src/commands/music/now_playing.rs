use super::*;
use crate::commands::music::utils::embedded_messages;

/// Show the currently playing track
#[poise::command(slash_command, category = "Music", rename = "now")]
pub async fn now_playing(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    match ctx.data().registry.now_playing(guild_id).await {
        Ok(Some(track)) => ctx.send(embedded_messages::now_playing(&track)).await?,
        Ok(None) => {
            ctx.send(embedded_messages::error(&PlayerError::NothingPlaying))
                .await?
        }
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
