use super::*;
use crate::commands::music::utils::embedded_messages;

/// Show the queue, 10 tracks per page
#[poise::command(slash_command, category = "Music")]
pub async fn queue(
    ctx: Context<'_>,
    #[description = "Page to show"] page: Option<usize>,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let data = ctx.data();
    match data.registry.queue_page(guild_id, page.unwrap_or(1)).await {
        Ok(page) => {
            let now = data.registry.now_playing(guild_id).await.unwrap_or_default();
            ctx.send(embedded_messages::queue(&page, now.as_ref())).await?
        }
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
