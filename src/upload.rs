//! Checks applied to track submissions before they reach the playlist.

use std::path::Path;

use thiserror::Error;

use crate::{config::UploadConfig, domain::track::Payload};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("uploaded file is empty")]
    EmptyFile,

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("file is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },
}

/// A file as received from a client
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub mime: Option<String>,
    pub data: Vec<u8>,
}

/// Track submission that passed validation
#[derive(Debug)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub payload: Payload,
}

impl NewTrack {
    pub fn validate(
        title: &str,
        artist: &str,
        file: Option<UploadedFile>,
        config: &UploadConfig,
    ) -> Result<Self, UploadError> {
        if title.trim().is_empty() {
            return Err(UploadError::MissingField("title"));
        }
        if artist.trim().is_empty() {
            return Err(UploadError::MissingField("artist"));
        }
        let file = file.ok_or(UploadError::MissingField("file"))?;

        let name = file.file_name.clone().unwrap_or_default();
        if !has_allowed_extension(&name, &config.allowed_extensions) {
            return Err(UploadError::UnsupportedFormat(name));
        }
        if file.data.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        if file.data.len() > config.max_bytes {
            return Err(UploadError::TooLarge {
                size: file.data.len(),
                limit: config.max_bytes,
            });
        }

        Ok(Self {
            title: title.to_string(),
            artist: artist.to_string(),
            payload: Payload::new(file.file_name, file.mime, file.data),
        })
    }
}

fn has_allowed_extension(file_name: &str, allowed: &[String]) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
