//! Stubs for exercising the coordinator without yt-dlp or a real disk

use async_trait::async_trait;
use file_area::{DiskUsage, FileArea, FreeSpace, SongId};
use media_downloader::{AcquisitionError, Downloader, MediaDownloader, SourceInfo};
use media_store::SqliteMediaStore;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::SongLibrary;

pub enum Behavior {
    Succeed,
    Fail(&'static str),
    /// Resolving the link never finishes unless cancelled
    HangInIdentify,
    HangUntilCancelled,
    /// Signal the first notify once downloading, then wait for the second
    PauseDuringDownload(Arc<Notify>, Arc<Notify>),
}

/// Reports every link as the same song and writes a fake mp3 for it
pub struct StubDownloader {
    id: &'static str,
    title: &'static str,
    behavior: Behavior,
    delay: Duration,
    downloads: AtomicUsize,
}

impl StubDownloader {
    pub fn new(id: &'static str, title: &'static str) -> Self {
        Self {
            id,
            title,
            behavior: Behavior::Succeed,
            delay: Duration::ZERO,
            downloads: AtomicUsize::new(0),
        }
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Downloader for StubDownloader {
    async fn check_available(&self) -> Result<(), AcquisitionError> {
        Ok(())
    }

    async fn fetch_metadata(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<SourceInfo, AcquisitionError> {
        match &self.behavior {
            Behavior::Fail(message) => {
                return Err(AcquisitionError::DownloadFailed(message.to_string()));
            }
            Behavior::HangInIdentify => {
                cancel.cancelled().await;
                return Err(AcquisitionError::Cancelled);
            }
            _ => {}
        }
        Ok(SourceInfo {
            id: SongId::new(self.id)?,
            title: self.title.to_string(),
            url: url.clone(),
        })
    }

    async fn download_audio(
        &self,
        _url: &Url,
        staging_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), AcquisitionError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let file = staging_dir.join(format!("{}.mp3", self.id));

        if let Behavior::HangUntilCancelled = self.behavior {
            tokio::fs::write(staging_dir.join(format!("{}.mp3.part", self.id)), b"half").await?;
            cancel.cancelled().await;
            return Err(AcquisitionError::Cancelled);
        }

        if let Behavior::PauseDuringDownload(started, resume) = &self.behavior {
            started.notify_one();
            resume.notified().await;
        }

        tokio::time::sleep(self.delay).await;
        tokio::fs::write(file, self.title.as_bytes()).await?;
        Ok(())
    }
}

pub struct FixedDiskUsage(pub FreeSpace);

impl DiskUsage for FixedDiskUsage {
    fn available(&self, _path: &Path) -> io::Result<FreeSpace> {
        Ok(self.0)
    }
}

pub struct Fixture {
    pub library: Arc<SongLibrary>,
    pub store: Arc<SqliteMediaStore>,
    pub downloader: Arc<StubDownloader>,
    _dir: TempDir,
}

impl Fixture {
    pub async fn new(downloader: StubDownloader) -> Self {
        Self::with_disk(downloader, FreeSpace::from_gib(10)).await
    }

    pub async fn with_disk(downloader: StubDownloader, free: FreeSpace) -> Self {
        let dir = TempDir::new().unwrap();
        let area = FileArea::open(dir.path().join("music")).await.unwrap();
        let store = Arc::new(SqliteMediaStore::open(dir.path().join("data.db")).await.unwrap());
        let downloader = Arc::new(downloader);
        let media = MediaDownloader::new_with_downloader(area, downloader.clone())
            .await
            .unwrap();
        let library = Arc::new(SongLibrary::new(
            store.clone(),
            media,
            Arc::new(FixedDiskUsage(free)),
        ));

        Self {
            library,
            store,
            downloader,
            _dir: dir,
        }
    }

    pub fn staging_is_empty(&self) -> bool {
        std::fs::read_dir(self.library.file_area().staging_root())
            .unwrap()
            .next()
            .is_none()
    }

    pub fn audio_path(&self, id: &str) -> std::path::PathBuf {
        self.library
            .file_area()
            .path_for(&SongId::new(id).unwrap())
    }
}
