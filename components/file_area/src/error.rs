use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileAreaError {
    #[error("invalid song id {id:?}: {reason}")]
    InvalidId { id: String, reason: &'static str },

    #[error("io error during {operation} on {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileAreaError {
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FileAreaError::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
