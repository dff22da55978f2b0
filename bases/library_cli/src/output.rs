// bases/library_cli/src/output.rs
use file_area::SongId;
use song_library::AddOutcome;
use std::collections::HashMap;

pub struct OutputHandler {
    verbose: bool,
}

impl OutputHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print_songs(&self, songs: &HashMap<SongId, String>) {
        for (id, name) in sorted_by_name(songs) {
            println!("{}\t{}", id, name);
        }
        if self.verbose {
            println!("{} songs", songs.len());
        }
    }

    pub fn print_download_start(&self, link: &str) {
        println!("Starting download from: {}", link);
    }

    pub fn print_add_outcome(&self, outcome: &AddOutcome) {
        let song = outcome.song();
        match outcome {
            AddOutcome::Added(_) => println!("Added: {} ({})", song.title, song.id),
            AddOutcome::AlreadyPresent(_) => {
                println!("Already in library: {} ({})", song.title, song.id)
            }
            AddOutcome::Restored(_) => {
                println!("Restored missing audio: {} ({})", song.title, song.id)
            }
        }
        if self.verbose {
            println!("File: {}", song.path.display());
        }
    }

    pub fn print_renamed(&self, id: &str, name: &str) {
        println!("Song successfully renamed to: {}", name);
        if self.verbose {
            println!("Id: {}", id);
        }
    }

    pub fn print_removed(&self, id: &str) {
        println!("Song successfully removed: {}", id);
    }

    pub fn print_free_space(&self, gib: f64) {
        println!("{:.1} GiB free", gib);
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }
}

/// Songs ordered by name, then id, for stable listings
fn sorted_by_name(songs: &HashMap<SongId, String>) -> Vec<(&SongId, &String)> {
    let mut sorted: Vec<_> = songs.iter().collect();
    sorted.sort_by(|(a_id, a_name), (b_id, b_name)| {
        a_name.to_lowercase().cmp(&b_name.to_lowercase()).then_with(|| a_id.cmp(b_id))
    });
    sorted
}
