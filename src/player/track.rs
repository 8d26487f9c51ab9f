//! Defines the `Track` struct, the immutable record a resolver produces for a
//! playable audio item, owned by the queue until played or discarded.

use serde::{Deserialize, Serialize};
use serenity::model::id::UserId;
use std::time::Duration;

/// A resolved, playable track with its metadata and requester identity.
///
/// The media layer streams the track from `url`, creating a fresh input each
/// time the track starts; replaying a looped track is a stream restart, never
/// a re-queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// The title of the track.
    pub title: String,
    /// The name of the channel or artist that uploaded the track.
    pub uploader: Option<String>,
    /// The duration of the track, if known.
    #[serde(with = "humantime_serde")]
    pub duration: Option<Duration>,
    /// The source page URL; also what the media layer streams from.
    pub url: String,
    /// URL to a thumbnail image for the track, if available.
    pub thumbnail: Option<String>,
    /// The user who requested the track. Vote-skip exempts this user.
    pub requested_by: UserId,
    /// Display name of the requester.
    pub requested_by_name: String,
}

impl Track {
    pub fn new(title: impl Into<String>, url: impl Into<String>, requested_by: UserId) -> Self {
        Self {
            title: title.into(),
            uploader: None,
            duration: None,
            url: url.into(),
            thumbnail: None,
            requested_by,
            requested_by_name: String::new(),
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.uploader {
            Some(uploader) => write!(f, "**{}** by **{}**", self.title, uploader),
            None => write!(f, "**{}**", self.title),
        }
    }
}
