use thiserror::Error;

/// Errors that can occur during playback operations
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Couldn't find anything matching the query: {0}")]
    ResolutionFailed(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("This command can only be used in a server")]
    NotInGuild,

    #[error("You are not connected to a voice channel")]
    UserNotInVoiceChannel,

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Already connected to a voice channel")]
    AlreadyConnected,

    #[error("Failed to join voice channel: {0}")]
    Join(String),

    #[error("Voice connection error: {0}")]
    Connection(String),

    #[error("Nothing is playing right now")]
    NothingPlaying,

    #[error("Volume must be between 0 and 100")]
    VolumeOutOfRange,

    #[error("Position {0} is outside the queue")]
    OutOfRange(usize),

    #[error("The queue is empty")]
    EmptyQueue,
}

/// Result type for playback operations
pub type PlayerResult<T> = Result<T, PlayerError>;
