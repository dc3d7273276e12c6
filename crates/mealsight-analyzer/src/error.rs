//! Error types for the frame analyzer

use thiserror::Error;

/// Errors that can occur during frame analysis
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Vision capability error
    #[error("Vision capability error: {0}")]
    Capability(String),

    /// Per-frame analysis timeout
    #[error("Frame analysis timeout")]
    Timeout,

    /// Model output could not be parsed into frame evidence
    #[error("Invalid evidence format: {0}")]
    InvalidFormat(String),

    /// Every frame in the batch failed analysis
    #[error("No usable frames: all frame analyses failed")]
    NoUsableFrames,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
