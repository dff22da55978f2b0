use file_area::{FileAreaError, SongId};
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Required dependency not found: {0}")]
    DependencyNotFound(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Diagnostic from the external tool, passed through verbatim
    #[error("{0}")]
    DownloadFailed(String),

    #[error("Format conversion failed: {0}")]
    FormatError(String),

    #[error("Download cancelled")]
    Cancelled,

    #[error(transparent)]
    FileArea(#[from] FileAreaError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// What the source platform reports about a link before downloading
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub id: SongId,
    pub title: String,
    pub url: Url,
}

/// A song whose audio file sits in the File Area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredSong {
    pub id: SongId,
    pub title: String,
    pub path: PathBuf,
}
