//! Ordered playlist with a "now playing" cursor.
//!
//! Tracks live in a vector in insertion order and the cursor is an index into
//! it. The cursor is `None` exactly when the vector is empty; every mutation
//! below keeps it on a live track otherwise.

use log::{debug, info};

use crate::domain::track::{Payload, Track, TrackId};

mod entry;
mod navigation;

pub use entry::PlaylistEntry;
pub use navigation::{Boundary, Navigation};

#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
    next_id: u64,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a track at the tail. The first track ever added becomes current.
    pub fn add_song(
        &mut self,
        title: impl Into<String>,
        artist: impl Into<String>,
        payload: Option<Payload>,
    ) -> TrackId {
        let id = TrackId(self.next_id);
        self.next_id += 1;

        let track = Track {
            id,
            title: title.into(),
            artist: artist.into(),
            payload,
        };
        info!("Added: {track}");

        self.tracks.push(track);
        if self.current.is_none() {
            self.current = Some(self.tracks.len() - 1);
        }
        id
    }

    /// Removes the first track titled exactly `title`.
    ///
    /// If the removed track was current, the cursor moves to its successor,
    /// or to its predecessor when it was the tail. Unknown titles are ignored.
    pub fn delete_song(&mut self, title: &str) -> Option<Track> {
        let index = self.tracks.iter().position(|t| t.title == title)?;
        let removed = self.tracks.remove(index);

        self.current = match self.current {
            Some(cur) if cur == index => {
                if self.tracks.is_empty() {
                    None
                } else if index < self.tracks.len() {
                    // successor shifted into the freed slot
                    Some(index)
                } else {
                    Some(index - 1)
                }
            }
            Some(cur) if cur > index => Some(cur - 1),
            other => other,
        };

        info!("Removed: {removed}");
        Some(removed)
    }

    pub fn next_song(&mut self) -> Navigation {
        let Some(cur) = self.current else {
            return Navigation::Idle;
        };
        if cur + 1 < self.tracks.len() {
            self.current = Some(cur + 1);
            debug!("next -> {}", self.tracks[cur + 1]);
            Navigation::Moved
        } else {
            Navigation::Boundary(Boundary::End)
        }
    }

    /// Steps back one track. An empty playlist reports the beginning boundary
    /// too, unlike `next_song` which stays silent.
    pub fn prev_song(&mut self) -> Navigation {
        match self.current {
            Some(cur) if cur > 0 => {
                self.current = Some(cur - 1);
                debug!("prev -> {}", self.tracks[cur - 1]);
                Navigation::Moved
            }
            _ => Navigation::Boundary(Boundary::Beginning),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = PlaylistEntry> + '_ {
        self.tracks.iter().enumerate().map(|(i, track)| PlaylistEntry {
            position: i + 1,
            id: track.id,
            title: track.title.clone(),
            artist: track.artist.clone(),
            is_current: self.current == Some(i),
        })
    }

    /// Rendered lines, e.g. `"1. ▶ S1 - A1"`, in playlist order.
    pub fn display_playlist(&self) -> Vec<String> {
        self.entries().map(|e| e.to_string()).collect()
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.map(|i| &self.tracks[i])
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
