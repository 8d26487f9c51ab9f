//! Track fixtures for playback tests.

use encore::player::track::Track;
use serenity::model::id::UserId;
use std::time::Duration;

/// A resolved track with a deterministic URL derived from its title.
pub fn track(title: &str, requester: u64) -> Track {
    Track {
        title: title.to_string(),
        uploader: Some("Fixture Channel".to_string()),
        duration: Some(Duration::from_secs(215)),
        url: url_for(title),
        thumbnail: None,
        requested_by: UserId::new(requester),
        requested_by_name: format!("user-{requester}"),
    }
}

pub fn url_for(title: &str) -> String {
    format!("https://www.youtube.com/watch?v={title}")
}
