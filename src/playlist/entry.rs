use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::track::TrackId;

/// One line of the rendered playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// 1-based
    pub position: usize,
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub is_current: bool,
}

const CURRENT_MARKER: &str = "▶";

impl fmt::Display for PlaylistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. ", self.position)?;
        if self.is_current {
            write!(f, "{CURRENT_MARKER} ")?;
        }
        write!(f, "{} - {}", self.title, self.artist)
    }
}
