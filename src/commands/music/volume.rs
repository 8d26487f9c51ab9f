use super::*;
use crate::commands::music::utils::embedded_messages;

/// Set the playback volume
#[poise::command(slash_command, category = "Music")]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume percentage (0-100)"] volume: i64,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    match ctx.data().registry.set_volume(guild_id, volume).await {
        Ok(()) => ctx.send(embedded_messages::volume_set(volume)).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
