//! The playback core: per-guild sessions that serialize a shared track queue
//! into one sequential audio stream, the registry that owns them, and the
//! interfaces to the resolver and media layers. The command layer only ever
//! talks to `registry::SessionRegistry` and renders what comes back.

pub mod connection;
pub mod error;
pub mod queue;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod track;
pub mod voice;
