// bases/library_cli/src/app.rs
use crate::args::Command;
use crate::config::Config;
use crate::output::OutputHandler;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use file_area::{FileArea, SystemDiskUsage};
use media_downloader::{MediaDownloader, YtDlp};
use media_store::SqliteMediaStore;
use song_library::SongLibrary;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct App {
    config: Config,
    output: OutputHandler,
}

impl App {
    pub fn new(config: Config) -> Self {
        let output = OutputHandler::new(config.verbose);
        Self { config, output }
    }

    /// Open the store and File Area; failures here are fatal
    async fn open_library(&self) -> Result<SongLibrary> {
        let area = FileArea::open(&self.config.library_dir).await?;
        let store = SqliteMediaStore::open(&self.config.database).await?;

        let downloader = if self.config.needs_downloader() {
            MediaDownloader::new(area).await?
        } else {
            MediaDownloader::unchecked(area, Arc::new(YtDlp))
        };

        info!(
            library = %self.config.library_dir.display(),
            database = %self.config.database.display(),
            "opened song library"
        );
        Ok(SongLibrary::new(
            Arc::new(store),
            downloader,
            Arc::new(SystemDiskUsage),
        ))
    }

    pub async fn run(&self) -> Result<()> {
        let library = self.open_library().await?;

        match &self.config.command {
            Command::List => {
                let songs = library.list().await?;
                self.output.print_songs(&songs);
            }
            Command::Add { link } => {
                self.output.print_download_start(link);

                let cancel = CancellationToken::new();
                let on_interrupt = cancel.clone();
                let watcher = tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        warn!("interrupted, cancelling download");
                        on_interrupt.cancel();
                    }
                });

                let result = library.add_from_link_with_cancel(link, &cancel).await;
                watcher.abort();

                self.output.print_add_outcome(&result?);
            }
            Command::Rename { id, name } => {
                if !library.rename(id, name).await? {
                    return Err(eyre!("Failed to rename song: no song with id {}", id));
                }
                self.output.print_renamed(id, name);
            }
            Command::Remove { id } => {
                if !library.remove(id).await? {
                    return Err(eyre!("Failed to remove song: no song with id {}", id));
                }
                self.output.print_removed(id);
            }
            Command::FreeSpace => {
                self.output.print_free_space(library.free_space_gib()?);
            }
        }

        Ok(())
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        self.output.print_error(error);
    }
}
