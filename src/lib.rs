use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use serenity::model::id::{ChannelId, GuildId};

pub mod commands;
pub mod player;

use player::registry::SessionRegistry;
use player::resolver::TrackResolver;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// Shared HTTP client handed to songbird audio inputs.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub registry: Arc<SessionRegistry>,
    pub resolver: Arc<dyn TrackResolver>,
    /// Where each guild's announcements go: the channel of its last `play`.
    pub announce_channels: Arc<DashMap<GuildId, ChannelId>>,
}
