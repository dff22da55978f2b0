use crate::types::{AcquiredSong, AcquisitionError, SourceInfo};
use file_area::FileArea;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// A downloaded file waiting in the staging area
///
/// Committing moves it into the File Area. Dropping it without committing
/// deletes the file together with its staging directory.
#[derive(Debug)]
pub struct StagedAudio {
    source: SourceInfo,
    file: PathBuf,
    dir: TempDir,
}

impl StagedAudio {
    pub fn new(source: SourceInfo, dir: TempDir, file: PathBuf) -> Self {
        Self { source, file, dir }
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub async fn commit(self, area: &FileArea) -> Result<AcquiredSong, AcquisitionError> {
        let path = area.place(&self.file, &self.source.id).await?;
        Ok(AcquiredSong {
            id: self.source.id,
            title: self.source.title,
            path,
        })
    }

    pub fn discard(self) {
        debug!(id = %self.source.id, staging = %self.dir.path().display(), "discarding staged audio");
    }
}
