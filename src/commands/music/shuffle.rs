use super::*;
use crate::commands::music::utils::embedded_messages;

/// Shuffle the queue
#[poise::command(slash_command, category = "Music")]
pub async fn shuffle(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    match ctx.data().registry.shuffle(guild_id).await {
        Ok(()) => ctx.send(embedded_messages::shuffled()).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
