use crate::process::{run_cancellable, GRACE_PERIOD};
use crate::types::{AcquisitionError, SourceInfo};
use async_trait::async_trait;
use file_area::{SongId, AUDIO_EXTENSION};
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

/// The external media-extraction capability
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Check that the tool and everything it shells out to is installed
    async fn check_available(&self) -> Result<(), AcquisitionError>;

    /// Ask the source for the song's id and title without downloading
    ///
    /// Must stop when `cancel` fires.
    async fn fetch_metadata(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<SourceInfo, AcquisitionError>;

    /// Download `url` and transcode it to `<staging_dir>/<id>.mp3`
    ///
    /// Must stop when `cancel` fires. Nothing may be written outside
    /// `staging_dir`.
    async fn download_audio(
        &self,
        url: &Url,
        staging_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), AcquisitionError>;
}

pub struct YtDlp;

const YT_DLP: &str = "yt-dlp";
const FFMPEG: &str = "ffmpeg";

#[async_trait]
impl Downloader for YtDlp {
    async fn check_available(&self) -> Result<(), AcquisitionError> {
        which::which(YT_DLP).map_err(|_| AcquisitionError::DependencyNotFound(YT_DLP))?;
        which::which(FFMPEG).map_err(|_| AcquisitionError::DependencyNotFound(FFMPEG))?;
        Ok(())
    }

    async fn fetch_metadata(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<SourceInfo, AcquisitionError> {
        debug!(url = %url, "fetching metadata");

        let mut command = Command::new(YT_DLP);
        command
            .arg("--dump-json")
            .arg("--no-download")
            .arg("--no-playlist")
            .arg(url.as_str());

        let output = run_cancellable(command, cancel, GRACE_PERIOD).await?;
        if !output.status.success() {
            return Err(tool_failure(&output.stderr, output.status));
        }

        parse_metadata(&output.stdout, url)
    }

    async fn download_audio(
        &self,
        url: &Url,
        staging_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), AcquisitionError> {
        let template = staging_dir.join("%(id)s.%(ext)s");
        let template = template.to_str().ok_or_else(|| {
            AcquisitionError::DownloadFailed("staging path is not valid UTF-8".to_string())
        })?;

        info!(url = %url, staging = %staging_dir.display(), "downloading audio");

        let mut command = Command::new(YT_DLP);
        command
            .arg("--extract-audio")
            .arg("--audio-format")
            .arg(AUDIO_EXTENSION)
            .arg("--audio-quality")
            .arg("192K")
            .arg("--format")
            .arg("bestaudio/best")
            .arg("--no-playlist")
            .arg("--no-progress")
            .arg("--output")
            .arg(template)
            .arg(url.as_str())
            .current_dir(staging_dir);

        // Partial output only ever lives in the staging directory.
        let output = match run_cancellable(command, cancel, GRACE_PERIOD).await {
            Err(AcquisitionError::Cancelled) => {
                info!(url = %url, "download cancelled");
                return Err(AcquisitionError::Cancelled);
            }
            other => other?,
        };

        if !output.status.success() {
            return Err(tool_failure(&output.stderr, output.status));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct YtDlpMetadata {
    id: String,
    title: String,
}

fn parse_metadata(stdout: &[u8], url: &Url) -> Result<SourceInfo, AcquisitionError> {
    let meta: YtDlpMetadata = serde_json::from_slice(stdout)
        .map_err(|e| AcquisitionError::DownloadFailed(e.to_string()))?;

    Ok(SourceInfo {
        id: SongId::new(meta.id)?,
        title: meta.title,
        url: url.clone(),
    })
}

fn tool_failure(stderr: &[u8], status: std::process::ExitStatus) -> AcquisitionError {
    let message = String::from_utf8_lossy(stderr).trim().to_string();
    if message.is_empty() {
        AcquisitionError::DownloadFailed(format!("yt-dlp exited with status: {}", status))
    } else {
        AcquisitionError::DownloadFailed(message)
    }
}
