//! HTML rendering of the playlist page.

use crate::{config::UploadConfig, playlist::Playlist};

const TEMPLATE: &str = include_str!("../../html/index.html");

pub fn render(
    playlist: &Playlist,
    uploads: &UploadConfig,
    notice: Option<&str>,
    error: Option<&str>,
) -> String {
    let lines = playlist.display_playlist();
    let list = if lines.is_empty() {
        "<p>No songs added yet.</p>".to_string()
    } else {
        let items: String = lines
            .iter()
            .map(|line| format!("<li>{}</li>", escape(line)))
            .collect();
        format!("<ul>{items}</ul>")
    };

    let now_playing = match playlist.current() {
        Some(track) => {
            let audio = if track.payload.is_some() {
                r#"<audio controls src="/current/audio"></audio>"#
            } else {
                ""
            };
            format!(
                r#"<h3>{}</h3><p>Artist: {}</p>{audio}
<form method="post" action="/ui/prev" style="display:inline"><button>Prev</button></form>
<a href="/">Refresh</a>
<form method="post" action="/ui/next" style="display:inline"><button>Next</button></form>"#,
                escape(&track.title),
                escape(&track.artist),
            )
        }
        None => "<p>Select a song to play.</p>".to_string(),
    };

    let accept = uploads
        .allowed_extensions
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");

    TEMPLATE
        .replace("{{ACCEPT}}", &escape(&accept))
        .replace("{{PLAYLIST}}", &list)
        .replace("{{NOW_PLAYING}}", &now_playing)
        .replace(
            "{{NOTICE}}",
            &notice
                .map(|n| format!(r#"<p class="notice">{}</p>"#, escape(n)))
                .unwrap_or_default(),
        )
        .replace(
            "{{ERROR}}",
            &error
                .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
                .unwrap_or_default(),
        )
        .replace("{{TOTAL}}", &playlist.len().to_string())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page() {
        let html = render(&Playlist::new(), &UploadConfig::default(), None, None);
        assert!(html.contains("No songs added yet."));
        assert!(html.contains("Select a song to play."));
        assert!(html.contains("Total tracks: 0"));
        assert!(html.contains(".mp3,.wav,.ogg"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_page_lists_tracks_and_notice() {
        let mut playlist = Playlist::new();
        playlist.add_song("S1", "A1", None);
        playlist.add_song("<b>S2</b>", "A2", None);

        let html = render(
            &playlist,
            &UploadConfig::default(),
            Some("End of playlist."),
            None,
        );
        assert!(html.contains("<li>1. ▶ S1 - A1</li>"));
        assert!(html.contains("<li>2. &lt;b&gt;S2&lt;/b&gt; - A2</li>"));
        assert!(html.contains("End of playlist."));
        assert!(html.contains("Artist: A1"));
        assert!(html.contains("Total tracks: 2"));
        // no payload, no player
        assert!(!html.contains("<audio"));
    }
}
