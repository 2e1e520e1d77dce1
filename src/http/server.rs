use log::{debug, info, warn};
use rouille::{Request, Response, ResponseBody, input::post::BufferedFile};
use serde::{Deserialize, Serialize};
use std::{
    io::Cursor,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    config::{HttpConfig, UploadConfig},
    domain::track::{Track, TrackId},
    http::{error::ApiError, page},
    playlist::{Boundary, Navigation, Playlist, PlaylistEntry},
    upload::{NewTrack, UploadError, UploadedFile},
};

/// Room for the title/artist parts and multipart framing around the file
const FORM_OVERHEAD: usize = 64 * 1024;

pub struct HttpServer {
    playlist: Arc<Mutex<Playlist>>,
    pub config: HttpConfig,
    uploads: UploadConfig,
}

impl HttpServer {
    pub fn new(playlist: Playlist, config: HttpConfig, uploads: UploadConfig) -> Self {
        Self {
            playlist: Arc::new(Mutex::new(playlist)),
            config,
            uploads,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        Self::log_request(request);

        let response = rouille::router!(request,
            (GET) (/) => {
                self.handle_page(request)
            },
            (GET) (/playlist) => {
                Self::respond(self.get_playlist())
            },
            (GET) (/current) => {
                Self::respond(self.get_current())
            },
            (GET) (/current/audio) => {
                Self::respond(self.get_current_audio())
            },
            (GET) (/tracks/{id: u64}) => {
                Self::respond(self.get_track(TrackId(id)))
            },
            (POST) (/tracks) => {
                Self::respond(self.add_track(request))
            },
            (DELETE) (/tracks) => {
                Self::respond(self.delete_track(request))
            },
            (POST) (/next) => {
                Self::respond(self.navigate(Playlist::next_song))
            },
            (POST) (/prev) => {
                Self::respond(self.navigate(Playlist::prev_song))
            },
            (POST) (/ui/add) => {
                self.handle_ui_add(request)
            },
            (POST) (/ui/delete) => {
                self.handle_ui_delete(request)
            },
            (POST) (/ui/next) => {
                self.handle_ui_navigate(Playlist::next_song)
            },
            (POST) (/ui/prev) => {
                self.handle_ui_navigate(Playlist::prev_song)
            },
            _ => Response::empty_404()
        );

        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn log_request(request: &Request) {
        info!("{} {}", request.method(), request.url());
    }

    fn respond(result: Result<Response, ApiError>) -> Response {
        result.unwrap_or_else(ApiError::into_response)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Playlist>, ApiError> {
        self.playlist
            .lock()
            .map_err(|e| ApiError::Internal(format!("could not access playlist under lock: {e}")))
    }

    fn get_playlist(&self) -> Result<Response, ApiError> {
        let playlist = self.lock()?;
        Ok(Response::json(&PlaylistResponse::from_playlist(&playlist)))
    }

    fn get_current(&self) -> Result<Response, ApiError> {
        let playlist = self.lock()?;
        let track = playlist
            .current()
            .ok_or_else(|| ApiError::NotFound("no track is playing".into()))?;
        Ok(Response::json(&TrackResponse::from_domain(track)))
    }

    fn get_track(&self, id: TrackId) -> Result<Response, ApiError> {
        let playlist = self.lock()?;
        let track = playlist
            .get(id)
            .ok_or_else(|| ApiError::NotFound(format!("track {id} not found")))?;
        Ok(Response::json(&TrackResponse::from_domain(track)))
    }

    fn get_current_audio(&self) -> Result<Response, ApiError> {
        let (id, payload) = {
            let playlist = self.lock()?;
            let track = playlist
                .current()
                .ok_or_else(|| ApiError::NotFound("no track is playing".into()))?;
            let payload = track
                .payload
                .clone()
                .ok_or_else(|| ApiError::NotFound(format!("track {} has no audio", track.id)))?;
            (track.id, payload)
        };

        let mime = payload.content_type();
        let size = payload.size();
        debug!("STREAM {} -> 200 OK, {} bytes, MIME type: {}", id, size, mime);

        Ok(Response {
            status_code: 200,
            headers: vec![("Content-Type".into(), mime.into())],
            data: ResponseBody::from_reader_and_size(Cursor::new(payload.data), size),
            upgrade: None,
        })
    }

    fn read_new_track(&self, request: &Request) -> Result<NewTrack, ApiError> {
        // refuse before buffering the body when the client already says it is too big
        let allowance = self.uploads.max_bytes.saturating_add(FORM_OVERHEAD);
        let declared = request
            .header("Content-Length")
            .and_then(|len| len.trim().parse::<usize>().ok());
        if let Some(size) = declared.filter(|&size| size > allowance) {
            return Err(UploadError::TooLarge {
                size,
                limit: self.uploads.max_bytes,
            }
            .into());
        }

        let input = rouille::post_input!(request, {
            title: Option<String>,
            artist: Option<String>,
            file: Option<BufferedFile>,
        })?;

        // browsers send an empty, unnamed part when no file was picked
        let file = input
            .file
            .filter(|f| !(f.data.is_empty() && f.filename.as_deref().unwrap_or("").is_empty()))
            .map(|f| UploadedFile {
                file_name: f.filename,
                mime: Some(f.mime),
                data: f.data,
            });

        Ok(NewTrack::validate(
            input.title.as_deref().unwrap_or(""),
            input.artist.as_deref().unwrap_or(""),
            file,
            &self.uploads,
        )?)
    }

    fn add_track(&self, request: &Request) -> Result<Response, ApiError> {
        let new_track = self.read_new_track(request)?;

        let mut playlist = self.lock()?;
        let id = playlist.add_song(new_track.title, new_track.artist, Some(new_track.payload));
        let entry = playlist
            .entries()
            .find(|e| e.id == id)
            .ok_or_else(|| ApiError::Internal(format!("track {id} vanished after insert")))?;

        Ok(Response::json(&entry).with_status_code(201))
    }

    fn delete_track(&self, request: &Request) -> Result<Response, ApiError> {
        let title = request
            .get_param("title")
            .ok_or_else(|| ApiError::BadRequest("missing track title".into()))?;

        let mut playlist = self.lock()?;
        let removed = playlist.delete_song(&title);

        Ok(Response::json(&DeleteResponse {
            removed: removed.as_ref().map(TrackResponse::from_domain),
            playlist: PlaylistResponse::from_playlist(&playlist),
        }))
    }

    fn navigate(&self, step: fn(&mut Playlist) -> Navigation) -> Result<Response, ApiError> {
        let mut playlist = self.lock()?;
        let navigation = step(&mut *playlist);
        if let Some(boundary) = navigation.boundary() {
            warn!("{boundary}");
        }

        Ok(Response::json(&NavigationResponse {
            navigation: navigation.as_str().to_string(),
            notice: navigation.boundary().map(|b| b.to_string()),
            current: playlist.current().map(TrackResponse::from_domain),
        }))
    }

    fn handle_page(&self, request: &Request) -> Response {
        let notice = request
            .get_param("notice")
            .and_then(|n| Boundary::from_param(&n))
            .map(|b| b.to_string());
        let error = request.get_param("error").filter(|e| !e.is_empty());

        self.render_page(notice.as_deref(), error.as_deref())
    }

    fn render_page(&self, notice: Option<&str>, error: Option<&str>) -> Response {
        match self.lock() {
            Ok(playlist) => Response::html(page::render(&playlist, &self.uploads, notice, error)),
            Err(e) => e.into_response(),
        }
    }

    fn handle_ui_add(&self, request: &Request) -> Response {
        match self.add_track(request) {
            Ok(_) => Response::redirect_303("/"),
            Err(ApiError::BadRequest(msg)) => {
                Response::redirect_303(format!("/?error={}", urlencoding::encode(&msg)))
            }
            Err(e) => e.into_response(),
        }
    }

    fn handle_ui_delete(&self, request: &Request) -> Response {
        let result = rouille::post_input!(request, { title: Option<String> })
            .map_err(ApiError::from)
            .and_then(|input| {
                let mut playlist = self.lock()?;
                playlist.delete_song(input.title.as_deref().unwrap_or(""));
                Ok(())
            });

        match result {
            Ok(()) => Response::redirect_303("/"),
            Err(e) => e.into_response(),
        }
    }

    fn handle_ui_navigate(&self, step: fn(&mut Playlist) -> Navigation) -> Response {
        let navigation = match self.lock() {
            Ok(mut playlist) => step(&mut *playlist),
            Err(e) => return e.into_response(),
        };

        match navigation.boundary() {
            Some(boundary) => {
                warn!("{boundary}");
                Response::redirect_303(format!("/?notice={}", boundary.as_param()))
            }
            None => Response::redirect_303("/"),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TrackResponse {
    id: TrackId,
    title: String,
    artist: String,
    has_audio: bool,
}

impl TrackResponse {
    fn from_domain(track: &Track) -> Self {
        Self {
            id: track.id,
            title: track.title.clone(),
            artist: track.artist.clone(),
            has_audio: track.payload.is_some(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct PlaylistResponse {
    length: usize,
    current: Option<TrackResponse>,
    entries: Vec<PlaylistEntry>,
    lines: Vec<String>,
}

impl PlaylistResponse {
    fn from_playlist(playlist: &Playlist) -> Self {
        Self {
            length: playlist.len(),
            current: playlist.current().map(TrackResponse::from_domain),
            entries: playlist.entries().collect(),
            lines: playlist.display_playlist(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct DeleteResponse {
    removed: Option<TrackResponse>,
    playlist: PlaylistResponse,
}

#[derive(Serialize, Deserialize)]
struct NavigationResponse {
    navigation: String,
    notice: Option<String>,
    current: Option<TrackResponse>,
}

#[cfg(test)]
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: rouille::Response,
) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(
        response.data.into_reader_and_size().0,
    )?)
}
