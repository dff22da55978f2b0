// bases/library_cli/src/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keep a personal library of songs downloaded from video links
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the audio files
    #[arg(long, env = "SONG_LIBRARY_DIR")]
    pub library_dir: Option<PathBuf>,

    /// SQLite database holding song metadata
    #[arg(long, env = "SONG_LIBRARY_DB")]
    pub database: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List all songs
    List,

    /// Download the audio behind a video link and add it
    Add {
        /// Link to the video
        link: String,
    },

    /// Change the display name of a song
    Rename {
        /// Song id
        id: String,

        /// New name
        name: String,
    },

    /// Delete a song and its audio file
    Remove {
        /// Song id
        id: String,
    },

    /// Show free space on the library volume in GiB
    FreeSpace,
}
