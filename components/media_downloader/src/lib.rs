// components/media_downloader/src/lib.rs
mod process;
mod staged;
mod types;
mod utils;
mod ytdlp;

use file_area::FileArea;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

pub use staged::StagedAudio;
pub use types::{AcquiredSong, AcquisitionError, SourceInfo};
use utils::locate_staged;
pub use ytdlp::{Downloader, YtDlp};

/// The Acquirer: turns a link into an audio file for the File Area
pub struct MediaDownloader {
    area: FileArea,
    downloader: Arc<dyn Downloader>,
}

impl MediaDownloader {
    /// Create a MediaDownloader backed by yt-dlp
    pub async fn new(area: FileArea) -> Result<Self, AcquisitionError> {
        Self::new_with_downloader(area, Arc::new(YtDlp)).await
    }

    /// Create a MediaDownloader with a specific downloader implementation
    pub async fn new_with_downloader(
        area: FileArea,
        downloader: Arc<dyn Downloader>,
    ) -> Result<Self, AcquisitionError> {
        downloader.check_available().await?;
        Ok(Self::unchecked(area, downloader))
    }

    /// Create a MediaDownloader without checking that the tool is installed
    ///
    /// For callers that only need the File Area and may never download.
    pub fn unchecked(area: FileArea, downloader: Arc<dyn Downloader>) -> Self {
        Self { area, downloader }
    }

    pub fn file_area(&self) -> &FileArea {
        &self.area
    }

    /// Resolve a link to the song's id and title
    pub async fn identify(
        &self,
        link: &str,
        cancel: &CancellationToken,
    ) -> Result<SourceInfo, AcquisitionError> {
        let url = Url::parse(link.trim()).map_err(|e| AcquisitionError::InvalidUrl(e.to_string()))?;
        if cancel.is_cancelled() {
            return Err(AcquisitionError::Cancelled);
        }
        let source = self.downloader.fetch_metadata(&url, cancel).await?;
        debug!(id = %source.id, title = %source.title, "identified link");
        Ok(source)
    }

    /// Download the audio for `source` into a fresh staging directory
    ///
    /// Nothing reaches the File Area until the returned [`StagedAudio`] is
    /// committed.
    pub async fn fetch(
        &self,
        source: SourceInfo,
        cancel: &CancellationToken,
    ) -> Result<StagedAudio, AcquisitionError> {
        if cancel.is_cancelled() {
            return Err(AcquisitionError::Cancelled);
        }
        let staging = TempDir::new_in(self.area.staging_root())?;

        self.downloader
            .download_audio(&source.url, staging.path(), cancel)
            .await?;

        let file = locate_staged(staging.path(), &source.id).await?;
        Ok(StagedAudio::new(source, staging, file))
    }

    /// Identify, download and place a song in one go
    ///
    /// This does not record anything in the media store; the library
    /// coordinator drives the two halves itself so it can insert the row
    /// before the file is placed.
    pub async fn acquire(&self, link: &str) -> Result<AcquiredSong, AcquisitionError> {
        let cancel = CancellationToken::new();
        let source = self.identify(link, &cancel).await?;
        let staged = self.fetch(source, &cancel).await?;
        let song = staged.commit(&self.area).await?;
        info!(id = %song.id, path = %song.path.display(), "acquired song");
        Ok(song)
    }
}
