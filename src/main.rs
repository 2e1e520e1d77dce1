use crate::cli::run;

pub mod cli;
pub mod config;
pub mod domain;
pub mod http;
pub mod playlist;
pub mod upload;

fn main() -> anyhow::Result<()> {
    run()
}
