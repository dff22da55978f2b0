//! The File Area: one audio file per song, named `<id>.mp3`
//!
//! Paths are always derived from the [`SongId`], never from the title, so a
//! rename never touches the filesystem. Downloads land in a staging
//! directory inside the area first and are moved into place with a single
//! rename once the metadata row exists.

mod disk;
mod error;
mod id;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use disk::{DiskUsage, SystemDiskUsage};
pub use error::FileAreaError;
pub use id::SongId;
pub use storage_primitives::{ByteSize, FreeSpace};

/// Audio files are always transcoded to this format
pub const AUDIO_EXTENSION: &str = "mp3";

const STAGING_DIR: &str = ".staging";

#[derive(Debug, Clone)]
pub struct FileArea {
    root: PathBuf,
    staging: PathBuf,
}

impl FileArea {
    /// Open the File Area rooted at `root`, creating it if needed
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, FileAreaError> {
        let root = root.as_ref().to_owned();
        let staging = root.join(STAGING_DIR);

        tokio::fs::create_dir_all(&staging)
            .await
            .map_err(|e| FileAreaError::io("create file area", &staging, e))?;

        Ok(Self { root, staging })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for in-progress downloads; same volume as the area itself
    pub fn staging_root(&self) -> &Path {
        &self.staging
    }

    pub fn path_for(&self, id: &SongId) -> PathBuf {
        self.root.join(file_name_for(id))
    }

    /// Whether the file for `id` exists
    ///
    /// An error means the area could not be inspected, which is not the same
    /// as the file being absent.
    pub async fn contains(&self, id: &SongId) -> Result<bool, FileAreaError> {
        let path = self.path_for(id);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| FileAreaError::io("check audio file", path, e))
    }

    /// Move a staged file into its final location
    pub async fn place(&self, staged: &Path, id: &SongId) -> Result<PathBuf, FileAreaError> {
        let destination = self.path_for(id);
        tokio::fs::rename(staged, &destination)
            .await
            .map_err(|e| FileAreaError::io("place audio file", &destination, e))?;

        debug!(id = %id, path = %destination.display(), "placed audio file");
        Ok(destination)
    }

    /// Delete the file for `id`
    ///
    /// Returns `Ok(false)` when there was nothing to delete, including the
    /// case where someone else removed it between the check and the delete.
    pub async fn remove(&self, id: &SongId) -> Result<bool, FileAreaError> {
        if !self.contains(id).await? {
            return Ok(false);
        }

        let path = self.path_for(id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FileAreaError::io("remove audio file", path, e)),
        }
    }

    pub fn free_space(&self, disk: &dyn DiskUsage) -> Result<FreeSpace, FileAreaError> {
        disk.available(&self.root)
            .map_err(|e| FileAreaError::io("query free space", &self.root, e))
    }
}

/// File name for a song inside the area
pub fn file_name_for(id: &SongId) -> String {
    format!("{}.{}", id.as_str(), AUDIO_EXTENSION)
}
