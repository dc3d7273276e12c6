//! Audio track extraction via ffmpeg
//!
//! The extracted artifact lives in a scoped temporary file that is deleted
//! on every exit path, including timeouts and parse failures further up
//! the pipeline: the bytes are read into memory here and the file is gone
//! before this module returns.

use std::path::Path;
use std::process::Stdio;
use tempfile::Builder;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, warn};

/// Errors from audio extraction.
///
/// All of these are recoverable: the caller degrades to an empty
/// hypothesis rather than surfacing them.
#[derive(Error, Debug)]
pub enum AudioError {
    /// ffmpeg binary not found or not executable
    #[error("ffmpeg unavailable: {0}")]
    ToolUnavailable(String),

    /// ffmpeg exited with a failure status
    #[error("ffmpeg failed: {0}")]
    ExtractionFailed(String),

    /// ffmpeg exceeded its time budget and was killed
    #[error("ffmpeg timed out")]
    Timeout,

    /// The output file was empty or unreadable
    #[error("audio artifact unusable: {0}")]
    EmptyArtifact(String),
}

/// Extract a mono, 16 kHz, 64 kbps mp3 audio track from a video file.
///
/// Returns the audio bytes; the temporary artifact is deleted before
/// returning on every path.
pub async fn extract_audio(
    ffmpeg_path: &str,
    video_path: &Path,
    time_budget: Duration,
) -> Result<Vec<u8>, AudioError> {
    // The temp file is deleted when `artifact` drops, on every exit path
    let artifact = Builder::new()
        .prefix("mealsight-audio-")
        .suffix(".mp3")
        .tempfile()
        .map_err(|e| AudioError::ExtractionFailed(e.to_string()))?;

    let mut child = Command::new(ffmpeg_path)
        .arg("-i")
        .arg(video_path)
        .arg("-vn") // no video
        .args(["-acodec", "libmp3lame"])
        .args(["-ar", "16000"]) // 16 kHz, good for speech
        .args(["-ac", "1"]) // mono
        .args(["-b:a", "64k"]) // sufficient for speech
        .arg("-y")
        .arg(artifact.path())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            warn!("ffmpeg not found: {}", e);
            AudioError::ToolUnavailable(e.to_string())
        })?;

    let status = match timeout(time_budget, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => return Err(AudioError::ExtractionFailed(e.to_string())),
        Err(_) => {
            error!("ffmpeg timeout after {:?}, killing", time_budget);
            let _ = child.kill().await;
            return Err(AudioError::Timeout);
        }
    };

    if !status.success() {
        return Err(AudioError::ExtractionFailed(format!(
            "exit status {}",
            status
        )));
    }

    let bytes = tokio::fs::read(artifact.path())
        .await
        .map_err(|e| AudioError::EmptyArtifact(e.to_string()))?;

    if bytes.is_empty() {
        return Err(AudioError::EmptyArtifact(
            "ffmpeg produced an empty file".to_string(),
        ));
    }

    info!("Audio extracted: {} bytes", bytes.len());
    debug!("Temporary artifact {} will be deleted", artifact.path().display());

    Ok(bytes)
}
