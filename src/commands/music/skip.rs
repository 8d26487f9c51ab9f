use super::*;
use crate::commands::music::utils::embedded_messages;
use crate::player::session::SkipOutcome;

/// Vote to skip the current track; its requester skips immediately
#[poise::command(slash_command, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    match ctx.data().registry.skip(guild_id, ctx.author().id).await {
        Ok(SkipOutcome::Skipped) => ctx.send(embedded_messages::skipped()).await?,
        Ok(SkipOutcome::VoteRecorded(count)) => {
            ctx.send(embedded_messages::vote_recorded(count)).await?
        }
        Ok(SkipOutcome::AlreadyVoted) => ctx.send(embedded_messages::already_voted()).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
