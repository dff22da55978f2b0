use crate::types::AcquisitionError;
use file_area::{file_name_for, SongId};
use std::path::{Path, PathBuf};

/// Find the file the downloader left in `dir` for `id`
pub async fn locate_staged(dir: &Path, id: &SongId) -> Result<PathBuf, AcquisitionError> {
    let expected = dir.join(file_name_for(id));
    if tokio::fs::try_exists(&expected).await? {
        return Ok(expected);
    }

    let prefix = format!("{}.", id.as_str());
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(&prefix) {
            return Err(AcquisitionError::FormatError(format!(
                "expected {} but the downloader produced {}",
                file_name_for(id),
                name
            )));
        }
    }

    Err(AcquisitionError::DownloadFailed(format!(
        "downloader reported success but no audio file was written for {}",
        id
    )))
}
