use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// Identity of a track inside one playlist.
///
/// Assigned sequentially on insertion and never reused, so two tracks with
/// the same title and artist are still different tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represent a music track
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub payload: Option<Payload>,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.artist)
    }
}

/// Audio content attached to a track. Never decoded here.
#[derive(Debug, Clone)]
pub struct Payload {
    pub file_name: Option<String>,
    /// MIME type declared by whoever supplied the bytes
    pub mime: Option<String>,
    pub data: Arc<[u8]>,
}

impl Payload {
    pub fn new(file_name: Option<String>, mime: Option<String>, data: Vec<u8>) -> Self {
        Self {
            file_name,
            mime,
            data: Arc::from(data),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// MIME type to serve the payload with.
    ///
    /// Prefers a declared `audio/*` type, then a guess from the file name.
    pub fn content_type(&self) -> String {
        if let Some(mime) = self.mime.as_deref().filter(|m| m.starts_with("audio/")) {
            return mime.to_string();
        }
        self.file_name
            .as_deref()
            .map(|name| mime_guess::from_path(name).first_or_octet_stream().to_string())
            .unwrap_or_else(|| mime_guess::mime::APPLICATION_OCTET_STREAM.to_string())
    }
}
