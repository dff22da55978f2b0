// bases/library_cli/src/config.rs
use crate::args::{Args, Command};
use media_store::DEFAULT_DB_NAME;
use std::path::PathBuf;

pub const DEFAULT_LIBRARY_DIR: &str = "static/music";

/// Resolved startup configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub library_dir: PathBuf,
    pub database: PathBuf,
    pub verbose: bool,
    pub command: Command,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        Self {
            library_dir: args
                .library_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LIBRARY_DIR)),
            database: args
                .database
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_NAME)),
            verbose: args.verbose,
            command: args.command,
        }
    }

    /// Only adding needs the download tools installed
    pub fn needs_downloader(&self) -> bool {
        matches!(self.command, Command::Add { .. })
    }
}
