use ::serenity::all::ClientBuilder;
use dashmap::DashMap;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use songbird::SerenityInit;
use std::env;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use encore::commands::music::{
    join::*, leave::*, now_playing::*, pause::*, play::*, queue::*, remove::*, repeat::*,
    resume::*, shuffle::*, skip::*, stop::*, summon::*, utils::announcer, volume::*,
};
use encore::player::registry::SessionRegistry;
use encore::player::resolver::YtDlpResolver;
use encore::player::voice::SongbirdConnector;
use encore::{CommandResult, Context, Data, Error};

#[poise::command(slash_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("encore=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let token = env::var("DISCORD_TOKEN").expect("Missing DISCORD_TOKEN");

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::GUILD_VOICE_STATES;

    // The voice manager is built up front so the session registry exists
    // before the client starts and can be stopped on shutdown.
    let manager = songbird::Songbird::serenity();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let registry = Arc::new(SessionRegistry::new(
        Arc::new(SongbirdConnector::new(Arc::clone(&manager))),
        events_tx,
    ));
    let announce_channels = Arc::new(DashMap::new());

    let commands = vec![
        // Default commands
        register(),
        help(),
        // Music commands
        join(),
        summon(),
        leave(),
        play(),
        pause(),
        resume(),
        stop(),
        skip(),
        volume(),
        repeat(),
        queue(),
        shuffle(),
        remove(),
        now_playing(),
    ];

    let data_registry = Arc::clone(&registry);
    let data_channels = Arc::clone(&announce_channels);
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tokio::spawn(announcer::run(
                    ctx.http.clone(),
                    Arc::clone(&data_channels),
                    events_rx,
                ));
                Ok(Data {
                    registry: data_registry,
                    resolver: Arc::new(YtDlpResolver),
                    announce_channels: data_channels,
                })
            })
        })
        .build();

    let mut client = ClientBuilder::new(token, intents)
        .framework(framework)
        .register_songbird_with(manager)
        .await?;

    // Stop every session on ctrl-c so no voice connection outlives the bot.
    let shard_manager = client.shard_manager.clone();
    let shutdown_registry = Arc::clone(&registry);
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", err);
            return;
        }
        info!("Shutting down");
        shutdown_registry.shutdown().await;
        shard_manager.shutdown_all().await;
    });

    client.start().await.map_err(Into::into)
}
