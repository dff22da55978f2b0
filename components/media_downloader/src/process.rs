use crate::types::AcquisitionError;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// How long an interrupted tool gets to clean up before it is killed
pub const GRACE_PERIOD: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Run `command` to completion unless `cancel` fires first
///
/// The tool runs in its own process group. On cancellation the whole group
/// (yt-dlp and the ffmpeg it spawns) gets SIGINT and `grace` to exit; only
/// then is it killed. This returns after the group is gone.
pub async fn run_cancellable(
    mut command: Command,
    cancel: &CancellationToken,
    grace: Duration,
) -> Result<ToolOutput, AcquisitionError> {
    if cancel.is_cancelled() {
        return Err(AcquisitionError::Cancelled);
    }

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let mut child = command.spawn()?;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = tokio::select! {
        status = child.wait() => status?,
        _ = cancel.cancelled() => {
            stop(&mut child, grace).await;
            return Err(AcquisitionError::Cancelled);
        }
    };

    Ok(ToolOutput {
        status,
        stdout: stdout.await.unwrap_or_default(),
        stderr: stderr.await.unwrap_or_default(),
    })
}

fn drain<R>(pipe: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            // A broken pipe only loses diagnostics.
            let _ = pipe.read_to_end(&mut buf).await;
        }
        buf
    })
}

async fn stop(child: &mut Child, grace: Duration) {
    interrupt(child);

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(_) => debug!("tool exited after interrupt"),
        Err(_) => {
            warn!(grace = ?grace, "tool ignored interrupt, killing it");
            kill(child).await;
        }
    }
}

#[cfg(unix)]
fn interrupt(child: &Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGINT) {
            warn!(pid, error = %e, "failed to interrupt tool");
        }
    }
}

#[cfg(not(unix))]
fn interrupt(_child: &Child) {}

#[cfg(unix)]
async fn kill(child: &mut Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
    }
    let _ = child.wait().await;
}

#[cfg(not(unix))]
async fn kill(child: &mut Child) {
    let _ = child.kill().await;
}
