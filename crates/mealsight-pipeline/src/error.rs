//! Pipeline error taxonomy
//!
//! Degraded inputs (no transcription credential, missing ffmpeg) never
//! reach this enum; they are absorbed inside the speech extractor.
//! Transient per-frame errors are absorbed inside the frame analyzer.
//! What remains are exhaustion conditions and caller misuse, each with a
//! short actionable message for the chat layer.

use thiserror::Error;

/// Terminal failures of the top-level pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The video yielded no analyzable frames (unreadable, or shorter
    /// than its skip window)
    #[error("No analyzable frames in the video")]
    NoFrames,

    /// Analysis produced no usable result (every frame failed, or the
    /// image showed no recognizable food)
    #[error("Analysis produced no usable result")]
    AnalysisFailed,

    /// The photo exceeds the configured size limit
    #[error("Photo too large: {size} bytes (max {max})")]
    PhotoTooLarge {
        /// Submitted photo size in bytes
        size: usize,
        /// Configured maximum in bytes
        max: usize,
    },

    /// A correction was requested with no active session
    #[error("No active analysis session")]
    NoActiveSession,

    /// The session store failed
    #[error("Session error: {0}")]
    Session(String),

    /// A background task failed to complete
    #[error("Internal task failure: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Short, actionable message for the end user
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::NoFrames => {
                "I couldn't read any frames from that video. Try recording a \
                 slightly longer video with the dish in view."
                    .to_string()
            }
            PipelineError::AnalysisFailed => {
                "I couldn't recognize the meal this time. Try again with \
                 better lighting and a clearer view of the dish."
                    .to_string()
            }
            PipelineError::PhotoTooLarge { max, .. } => format!(
                "That photo is too large. Please send one under {} MB.",
                max / (1024 * 1024)
            ),
            PipelineError::NoActiveSession => {
                "There's no analysis to correct right now. Send a photo or \
                 video first."
                    .to_string()
            }
            PipelineError::Session(_) | PipelineError::Internal(_) => {
                "Something went wrong on my side. Please try again.".to_string()
            }
        }
    }
}
