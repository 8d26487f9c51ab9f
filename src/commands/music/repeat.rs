use super::*;
use crate::commands::music::utils::embedded_messages;

/// Loop the current track; invoke again to stop looping
#[poise::command(slash_command, category = "Music", rename = "loop")]
pub async fn repeat(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    match ctx.data().registry.toggle_loop(guild_id).await {
        Ok(enabled) => ctx.send(embedded_messages::loop_state(enabled)).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
