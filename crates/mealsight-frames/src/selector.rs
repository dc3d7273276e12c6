//! Best-frame selection

use crate::config::FrameConfig;
use crate::enhance::enhance_frame;
use crate::score::frame_score;
use crate::source::VideoSource;
use image::codecs::jpeg::JpegEncoder;
use image::imageops;
use tracing::{debug, info, warn};

/// One selected, enhanced, encoded frame
#[derive(Debug, Clone)]
pub struct SelectedFrame {
    /// Original frame index within the video
    pub index: usize,
    /// Composite quality score in [0, 1]
    pub score: f64,
    /// Enhanced frame encoded as JPEG
    pub jpeg: Vec<u8>,
}

/// Selects and enhances the highest-quality frames of a video
pub struct FrameSelector {
    config: FrameConfig,
}

impl FrameSelector {
    /// Create a selector with the given configuration
    pub fn new(config: FrameConfig) -> Self {
        Self { config }
    }

    /// Score every frame after the skip window and return the top
    /// `target_frames`, re-sorted into chronological order.
    ///
    /// An empty result is a normal outcome (video unreadable or shorter
    /// than its skip window), not an error.
    pub fn select_best_frames(&self, mut source: impl VideoSource) -> Vec<SelectedFrame> {
        let duration = source.duration_secs();
        let fps = source.fps();
        let skip_secs = self.config.skip_seconds(duration);
        let skip_frames = (skip_secs * fps) as usize;

        info!(
            "Video: {} frames, {:.1} fps, {:.1}s; skipping first {:.1}s ({} frames)",
            source.frame_count(),
            fps,
            duration,
            skip_secs,
            skip_frames
        );

        let mut scored = Vec::new();
        let mut prev_gray = None;
        let mut frame_idx = 0usize;

        while let Some(frame) = source.next_frame() {
            if frame_idx < skip_frames {
                frame_idx += 1;
                continue;
            }

            let gray = imageops::grayscale(&frame);
            let score = frame_score(&gray, prev_gray.as_ref());
            scored.push((frame_idx, frame, score));

            prev_gray = Some(gray);
            frame_idx += 1;
        }

        if scored.is_empty() {
            warn!(
                "No frames after skipping {:.1}s - video too short?",
                skip_secs
            );
            return Vec::new();
        }

        // Top N by score, then back to chronological order: downstream
        // frame-index bookkeeping assumes temporal order.
        scored.sort_by(|a, b| b.2.total_cmp(&a.2));
        scored.truncate(self.config.target_frames);
        scored.sort_by_key(|entry| entry.0);

        info!("Selected {} best frames", scored.len());

        let mut selected = Vec::with_capacity(scored.len());
        for (index, frame, score) in scored {
            let enhanced = enhance_frame(&frame);
            let mut jpeg = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut jpeg, self.config.jpeg_quality);
            match enhanced.write_with_encoder(encoder) {
                Ok(()) => {
                    debug!("Frame {}: score={:.3}", index, score);
                    selected.push(SelectedFrame { index, score, jpeg });
                }
                Err(e) => {
                    warn!("Failed to encode frame {}: {}", index, e);
                }
            }
        }

        selected
    }
}
