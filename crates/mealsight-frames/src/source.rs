//! Video frame access abstraction
//!
//! Video decoding is an integration detail owned by the environment; the
//! selector only needs sequential frame reads plus fps and frame count.

use image::RgbImage;

/// Sequential, non-restartable access to a decoded video
pub trait VideoSource {
    /// Frames per second of the source video (0.0 when unknown)
    fn fps(&self) -> f64;

    /// Total number of frames in the video
    fn frame_count(&self) -> usize;

    /// Read the next frame, or None at end of stream
    fn next_frame(&mut self) -> Option<RgbImage>;

    /// Duration in seconds, derived from frame count and fps
    fn duration_secs(&self) -> f64 {
        if self.fps() > 0.0 {
            self.frame_count() as f64 / self.fps()
        } else {
            0.0
        }
    }
}

/// In-memory video source over pre-decoded frames.
///
/// Used in tests and by callers that decode elsewhere.
pub struct FrameSequence {
    frames: std::vec::IntoIter<RgbImage>,
    frame_count: usize,
    fps: f64,
}

impl FrameSequence {
    /// Create a source from decoded frames and a frame rate
    pub fn new(frames: Vec<RgbImage>, fps: f64) -> Self {
        let frame_count = frames.len();
        Self {
            frames: frames.into_iter(),
            frame_count,
            fps,
        }
    }
}

impl VideoSource for FrameSequence {
    fn fps(&self) -> f64 {
        self.fps
    }

    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn next_frame(&mut self) -> Option<RgbImage> {
        self.frames.next()
    }
}
