//! Library Coordinator
//!
//! Sits on top of the media store, the File Area and the downloader and
//! keeps the two halves of a song (metadata row and audio file) consistent:
//!
//! - a row is inserted before its file is moved into the File Area, and
//!   deleted again if the move fails
//! - a file is deleted before its row, so an interrupted removal leaves a
//!   row without a file, which the next removal cleans up
//! - every operation on a song id runs inside that id's exclusive section,
//!   so concurrent adds of one link download once and insert once

mod error;
mod locks;

use file_area::{DiskUsage, FileArea, SongId};
use media_downloader::{AcquiredSong, AcquisitionError, MediaDownloader};
use media_store::{MediaStore, Song, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub use error::{LibraryError, Result};
use locks::KeyedLocks;

/// How an add request was satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Downloaded and recorded
    Added(AcquiredSong),
    /// Row and file were already there; nothing was downloaded
    AlreadyPresent(AcquiredSong),
    /// Row existed but its file was gone; the file was downloaded again
    Restored(AcquiredSong),
}

impl AddOutcome {
    pub fn song(&self) -> &AcquiredSong {
        match self {
            AddOutcome::Added(song) | AddOutcome::AlreadyPresent(song) | AddOutcome::Restored(song) => {
                song
            }
        }
    }
}

pub struct SongLibrary {
    store: Arc<dyn MediaStore>,
    downloader: MediaDownloader,
    disk: Arc<dyn DiskUsage>,
    locks: KeyedLocks,
}

impl SongLibrary {
    pub fn new(
        store: Arc<dyn MediaStore>,
        downloader: MediaDownloader,
        disk: Arc<dyn DiskUsage>,
    ) -> Self {
        Self {
            store,
            downloader,
            disk,
            locks: KeyedLocks::new(),
        }
    }

    pub fn file_area(&self) -> &FileArea {
        self.downloader.file_area()
    }

    /// All songs as id -> name, straight from the store
    pub async fn list(&self) -> Result<HashMap<SongId, String>> {
        Ok(self.store.list().await?)
    }

    pub async fn add_from_link(&self, link: &str) -> Result<AddOutcome> {
        self.add_from_link_with_cancel(link, &CancellationToken::new())
            .await
    }

    /// Download the song behind `link` and record it
    ///
    /// Cancelling `cancel` stops the request wherever it is (resolving the
    /// link, waiting for the song's exclusive section, or downloading);
    /// nothing is recorded and no file reaches the File Area.
    pub async fn add_from_link_with_cancel(
        &self,
        link: &str,
        cancel: &CancellationToken,
    ) -> Result<AddOutcome> {
        let source = self.downloader.identify(link, cancel).await?;
        let id = source.id.clone();
        let _guard = tokio::select! {
            guard = self.locks.lock(&id) => guard,
            _ = cancel.cancelled() => {
                info!(id = %id, "add cancelled while waiting for the song");
                return Err(AcquisitionError::Cancelled.into());
            }
        };

        if let Some(existing) = self.store.get(&id).await? {
            if self.file_area().contains(&id).await? {
                info!(id = %id, "song already in library");
                return Ok(AddOutcome::AlreadyPresent(acquired_from_row(existing)));
            }

            warn!(id = %id, "song row has no audio file, downloading again");
            let staged = self.downloader.fetch(source, cancel).await?;
            let restored = staged.commit(self.file_area()).await?;
            return Ok(AddOutcome::Restored(AcquiredSong {
                title: existing.name,
                ..restored
            }));
        }

        let staged = self.downloader.fetch(source, cancel).await?;
        let row = Song {
            id: id.clone(),
            name: staged.source().title.clone(),
            path: self.file_area().path_for(&id),
        };

        match self.store.insert(&row).await {
            Ok(()) => {}
            Err(StoreError::DuplicateKey(_)) => {
                // Another writer recorded this id after our check.
                info!(id = %id, "song recorded concurrently, discarding download");
                staged.discard();
                let existing = self.store.get(&id).await?.unwrap_or(row);
                return Ok(AddOutcome::AlreadyPresent(acquired_from_row(existing)));
            }
            Err(e) => return Err(e.into()),
        }

        match staged.commit(self.file_area()).await {
            Ok(song) => {
                info!(id = %song.id, title = %song.title, "added song");
                Ok(AddOutcome::Added(song))
            }
            Err(e) => {
                if let Err(rollback) = self.store.delete_by_id(&id).await {
                    error!(id = %id, error = %rollback, "failed to roll back song row");
                }
                Err(e.into())
            }
        }
    }

    /// Change a song's display name; the file is keyed by id and stays put
    pub async fn rename(&self, id: &str, name: &str) -> Result<bool> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let _guard = self.locks.lock(&id).await;

        let renamed = self.store.update_name(&id, name).await?;
        if renamed {
            info!(id = %id, name = %name, "renamed song");
        }
        Ok(renamed)
    }

    /// Delete a song's file, then its row
    ///
    /// A file that cannot be deleted is logged and otherwise ignored. The
    /// result says whether a row was removed.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let _guard = self.locks.lock(&id).await;

        match self.file_area().remove(&id).await {
            Ok(true) => debug!(id = %id, "deleted audio file"),
            Ok(false) => debug!(id = %id, "no audio file to delete"),
            Err(e) => warn!(id = %id, error = %e, "could not delete audio file, removing row anyway"),
        }

        let removed = self.store.delete_by_id(&id).await?;
        if removed {
            info!(id = %id, "removed song");
        }
        Ok(removed)
    }

    /// Free space on the library volume in GiB, one decimal place
    pub fn free_space_gib(&self) -> Result<f64> {
        let free = self.file_area().free_space(self.disk.as_ref())?;
        debug!(free = %free, "queried free space");
        Ok(free.gibibytes_rounded())
    }
}

fn parse_id(raw: &str) -> Option<SongId> {
    match SongId::new(raw) {
        Ok(id) => Some(id),
        Err(e) => {
            debug!(error = %e, "not a song id");
            None
        }
    }
}

fn acquired_from_row(row: Song) -> AcquiredSong {
    AcquiredSong {
        id: row.id,
        title: row.name,
        path: row.path,
    }
}

#[cfg(test)]
mod testing;
