//! Line-oriented playlist session on stdin/stdout.

use anyhow::{Context, bail};
use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use crate::{
    domain::track::Payload,
    playlist::{Navigation, Playlist},
};

const HELP: &str = "\
commands:
  add <title> | <artist> [| <audio file>]
  delete <title>
  next
  prev
  list
  current
  help
  quit";

#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Add {
        title: String,
        artist: String,
        file: Option<PathBuf>,
    },
    Delete(String),
    Next,
    Prev,
    List,
    Current,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word {
            "add" => {
                let mut parts = rest.split('|').map(str::trim);
                let title = parts.next().unwrap_or_default();
                let Some(artist) = parts.next() else {
                    bail!("usage: add <title> | <artist> [| <audio file>]");
                };
                let file = parts.next().filter(|p| !p.is_empty()).map(PathBuf::from);
                if parts.next().is_some() {
                    bail!("too many fields for add");
                }
                ShellCommand::Add {
                    title: title.to_string(),
                    artist: artist.to_string(),
                    file,
                }
            }
            "delete" | "del" => ShellCommand::Delete(rest.to_string()),
            "next" => ShellCommand::Next,
            "prev" => ShellCommand::Prev,
            "list" | "ls" => ShellCommand::List,
            "current" => ShellCommand::Current,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => bail!("unknown command: {other}"),
        };
        Ok(command)
    }
}

fn read_payload(path: &Path) -> anyhow::Result<Payload> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read audio file {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(Payload::new(file_name, None, data))
}

fn print_playlist<W: Write>(playlist: &Playlist, out: &mut W) -> anyhow::Result<()> {
    let lines = playlist.display_playlist();
    if lines.is_empty() {
        writeln!(out, "No songs added yet.")?;
    }
    for line in lines {
        writeln!(out, "{line}")?;
    }
    writeln!(out, "Total tracks: {}", playlist.len())?;
    Ok(())
}

fn print_current<W: Write>(playlist: &Playlist, out: &mut W) -> anyhow::Result<()> {
    match playlist.current() {
        Some(track) => {
            write!(out, "Now playing: {track}")?;
            if let Some(payload) = &track.payload {
                write!(out, " [{} bytes, {}]", payload.size(), payload.content_type())?;
            }
            writeln!(out)?;
        }
        None => writeln!(out, "Nothing is playing.")?,
    }
    Ok(())
}

fn print_navigation<W: Write>(
    playlist: &Playlist,
    navigation: Navigation,
    out: &mut W,
) -> anyhow::Result<()> {
    if let Navigation::Boundary(boundary) = navigation {
        writeln!(out, "{boundary}")?;
    }
    print_current(playlist, out)
}

/// Applies one command. Returns `false` when the session should end.
pub fn execute<W: Write>(
    playlist: &mut Playlist,
    command: ShellCommand,
    out: &mut W,
) -> anyhow::Result<bool> {
    match command {
        ShellCommand::Add {
            title,
            artist,
            file,
        } => {
            let payload = file.as_deref().map(read_payload).transpose()?;
            playlist.add_song(title, artist, payload);
            print_playlist(playlist, out)?;
        }
        ShellCommand::Delete(title) => {
            match playlist.delete_song(&title) {
                Some(track) => writeln!(out, "Removed: {track}")?,
                None => writeln!(out, "No track titled {title:?}.")?,
            }
            print_playlist(playlist, out)?;
        }
        ShellCommand::Next => {
            let navigation = playlist.next_song();
            print_navigation(playlist, navigation, out)?;
        }
        ShellCommand::Prev => {
            let navigation = playlist.prev_song();
            print_navigation(playlist, navigation, out)?;
        }
        ShellCommand::List => print_playlist(playlist, out)?,
        ShellCommand::Current => print_current(playlist, out)?,
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Reads commands until `quit` or end of input.
pub fn run_shell<R: BufRead, W: Write>(input: R, out: &mut W) -> anyhow::Result<Playlist> {
    let mut playlist = Playlist::new();

    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let keep_going = ShellCommand::parse(&line)
            .and_then(|command| execute(&mut playlist, command, out));
        match keep_going {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                log::debug!("shell command {line:?} failed: {e:#}");
                writeln!(out, "error: {e:#}")?;
            }
        }
        out.flush()?;
    }

    Ok(playlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str) -> anyhow::Result<(Playlist, String)> {
        let mut out = Vec::new();
        let playlist = run_shell(Cursor::new(script.to_string()), &mut out)?;
        Ok((playlist, String::from_utf8(out)?))
    }

    #[test]
    fn test_parse_add() -> anyhow::Result<()> {
        assert_eq!(
            ShellCommand::parse("add Song Title | Some Artist")?,
            ShellCommand::Add {
                title: "Song Title".into(),
                artist: "Some Artist".into(),
                file: None,
            }
        );
        assert_eq!(
            ShellCommand::parse("add S | A | /tmp/s.mp3")?,
            ShellCommand::Add {
                title: "S".into(),
                artist: "A".into(),
                file: Some(PathBuf::from("/tmp/s.mp3")),
            }
        );
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        assert!(ShellCommand::parse("add only a title").is_err());
        assert!(ShellCommand::parse("add a | b | c | d").is_err());
        assert!(ShellCommand::parse("shuffle").is_err());
    }

    #[test]
    fn test_parse_simple_commands() -> anyhow::Result<()> {
        assert_eq!(ShellCommand::parse("  next ")?, ShellCommand::Next);
        assert_eq!(ShellCommand::parse("prev")?, ShellCommand::Prev);
        assert_eq!(
            ShellCommand::parse("delete Two Words")?,
            ShellCommand::Delete("Two Words".into())
        );
        assert_eq!(ShellCommand::parse("exit")?, ShellCommand::Quit);
        Ok(())
    }

    #[test]
    fn test_session_scenario() -> anyhow::Result<()> {
        let (playlist, out) = run("add S1 | A1\n\
             add S2 | A2\n\
             add S3 | A3\n\
             next\n\
             next\n\
             next\n\
             delete S2\n\
             quit\n\
             add ignored | after quit\n")?;

        assert_eq!(playlist.display_playlist(), vec!["1. S1 - A1", "2. ▶ S3 - A3"]);
        assert!(out.contains("1. ▶ S1 - A1\n2. S2 - A2\n3. S3 - A3\nTotal tracks: 3"));
        assert_eq!(out.matches("End of playlist.").count(), 1);
        assert!(out.contains("Removed: S2 by A2"));
        assert!(out.ends_with("Total tracks: 2\n"));

        Ok(())
    }

    #[test]
    fn test_session_boundaries_and_errors() -> anyhow::Result<()> {
        let (playlist, out) = run("next\nprev\nbogus\ndelete nothing\n")?;

        assert!(playlist.is_empty());
        assert!(!out.contains("End of playlist."));
        assert!(out.contains("Beginning of playlist."));
        assert!(out.contains("error: unknown command: bogus"));
        assert!(out.contains("No track titled \"nothing\"."));

        Ok(())
    }

    #[test]
    fn test_add_with_audio_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tune.mp3");
        std::fs::write(&path, b"abcd")?;

        let (playlist, out) = run(&format!("add Tune | Band | {}\ncurrent\n", path.display()))?;

        let payload = playlist
            .current()
            .and_then(|t| t.payload.as_ref())
            .expect("payload attached");
        assert_eq!(payload.file_name.as_deref(), Some("tune.mp3"));
        assert!(out.contains("Now playing: Tune by Band [4 bytes, audio/mpeg]"));

        Ok(())
    }

    #[test]
    fn test_add_with_missing_file_reports_error() -> anyhow::Result<()> {
        let (playlist, out) = run("add Tune | Band | /definitely/not/here.mp3\n")?;

        assert!(playlist.is_empty());
        assert!(out.contains("error: Failed to read audio file"));

        Ok(())
    }
}
