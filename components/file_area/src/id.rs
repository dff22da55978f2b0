use crate::{FileAreaError, AUDIO_EXTENSION};
use std::fmt;

/// Longest id whose `<id>.mp3` still fits in a 255-byte file name
const MAX_ID_LEN: usize = 255 - AUDIO_EXTENSION.len() - 1;

/// External identifier of a song, assigned by the source platform
///
/// The id doubles as the filename stem in the File Area, so anything that
/// could leave the area (separators, `..`, hidden names) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SongId(String);

impl SongId {
    pub fn new(id: impl Into<String>) -> Result<Self, FileAreaError> {
        let id = id.into();
        let invalid = |reason| FileAreaError::InvalidId {
            id: id.clone(),
            reason,
        };

        if id.is_empty() || id.len() > MAX_ID_LEN {
            return Err(invalid("id must be 1-251 bytes"));
        }
        if id.starts_with('.') {
            return Err(invalid("id cannot start with a dot"));
        }
        if id
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control())
        {
            return Err(invalid("id contains path or control characters"));
        }

        Ok(SongId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
