use super::*;
use crate::commands::music::utils::{self, embedded_messages};
use tracing::info;

/// Play a song from YouTube or a direct URL
#[poise::command(slash_command, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"] query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(PlayerError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let data = ctx.data();

    // Join the requester's voice channel if no session is live yet.
    if data.registry.session(guild_id).is_none() {
        let channel_id =
            match utils::user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id) {
                Ok(channel_id) => channel_id,
                Err(err) => {
                    ctx.send(embedded_messages::error(&err)).await?;
                    return Ok(());
                }
            };

        if let Err(err) = data.registry.join(guild_id, channel_id).await {
            ctx.send(embedded_messages::error(&err)).await?;
            return Ok(());
        }
    }

    // Announcements for this guild follow the channel the request came from.
    data.announce_channels.insert(guild_id, ctx.channel_id());

    // Defer the response since resolution might take time
    ctx.defer().await?;

    let track = match data
        .resolver
        .resolve(&query, ctx.author().id, &ctx.author().name)
        .await
    {
        Ok(track) => track,
        Err(err) => {
            ctx.send(embedded_messages::error(&err)).await?;
            return Ok(());
        }
    };

    info!("Resolved '{}' for guild {}", track.title, guild_id);
    let reply = embedded_messages::enqueued(&track);
    match data.registry.enqueue(guild_id, track).await {
        Ok(()) => ctx.send(reply).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
