use clap::{Parser, Subcommand};
use std::{io, path::PathBuf};

use crate::config::Config;
use crate::http::server::HttpServer;
use crate::playlist::Playlist;

pub mod shell;

#[derive(Parser)]
#[command(name = "playdeck")]
#[command(version = "0.1")]
#[command(about = "Playlist manager with a small web player")]
pub struct Cli {
    /// Path to the config TOML file. Built-in defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run http server hosting the playlist
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Manage a playlist interactively from the terminal
    Shell,
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Serve { port } => {
            let mut http = cfg.http;
            if let Some(port) = port {
                http.port = port;
            }

            let http_server = HttpServer::new(Playlist::new(), http, cfg.uploads);

            println!(
                "HTTP server running at http://{}:{}",
                http_server.config.bind_addr, http_server.config.port
            );
            http_server.run();
        }

        Commands::Shell => {
            println!("Type \"help\" for commands.");
            let stdin = io::stdin();
            let playlist = shell::run_shell(stdin.lock(), &mut io::stdout())?;
            println!("Total tracks: {}", playlist.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::parse_from(["playdeck", "--config", "deck.toml", "serve", "-p", "9000"]);
        assert_eq!(cli.config, Some(PathBuf::from("deck.toml")));
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000) }));
    }

    #[test]
    fn test_parse_shell_without_config() {
        let cli = Cli::parse_from(["playdeck", "shell"]);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Commands::Shell));
    }
}
