pub mod join;
pub mod leave;
pub mod now_playing;
pub mod pause;
pub mod play;
pub mod queue;
pub mod remove;
pub mod repeat;
pub mod resume;
pub mod shuffle;
pub mod skip;
pub mod stop;
pub mod summon;
pub mod volume;

pub mod utils;

use crate::player::error::PlayerError;
use crate::{CommandResult, Context};
