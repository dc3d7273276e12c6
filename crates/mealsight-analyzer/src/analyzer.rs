//! Core frame analyzer implementation

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::parser::parse_frame_response;
use crate::prompt::PromptBuilder;
use mealsight_domain::{FrameEvidence, SpeechHypothesis};
use mealsight_llm::{ChatProvider, ChatRequest};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Analyzes selected video frames against a speech hypothesis.
///
/// Frames are analyzed concurrently since the calls are independent; the
/// output is re-sorted by frame index so downstream "frame N of M"
/// bookkeeping holds.
pub struct FrameAnalyzer<P: ChatProvider> {
    provider: Arc<P>,
    config: AnalyzerConfig,
}

impl<P: ChatProvider + 'static> FrameAnalyzer<P> {
    /// Create a new frame analyzer
    pub fn new(provider: P, config: AnalyzerConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Analyze a batch of JPEG-encoded frames.
    ///
    /// Per-frame failures (network, timeout, unparseable output) drop that
    /// frame and never abort the batch. Returns an error only when every
    /// frame failed, which callers must treat as a hard failure.
    pub async fn analyze_frames(
        &self,
        frames: Vec<Vec<u8>>,
        hypothesis: &SpeechHypothesis,
    ) -> Result<Vec<FrameEvidence>, AnalyzerError> {
        let frame_total = frames.len();
        if frame_total == 0 {
            return Err(AnalyzerError::NoUsableFrames);
        }

        let builder = PromptBuilder::new(hypothesis);
        let system = builder.build();

        info!(
            "Analyzing {} frames ({} hypothesis)",
            frame_total,
            if hypothesis.is_empty() {
                "without"
            } else {
                "with"
            }
        );

        let mut set = JoinSet::new();
        for (frame_index, jpeg) in frames.into_iter().enumerate() {
            let provider = Arc::clone(&self.provider);
            let request = ChatRequest::text(
                system.clone(),
                builder.frame_instruction(frame_index, frame_total),
            )
            .with_image(jpeg)
            .with_max_tokens(self.config.max_response_tokens);
            let budget = self.config.per_frame_timeout();

            set.spawn(async move {
                let reply = timeout(budget, provider.complete(request)).await;
                (frame_index, reply)
            });
        }

        let mut evidences = Vec::with_capacity(frame_total);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((frame_index, Ok(Ok(reply)))) => {
                    debug!(
                        "Frame {}: response length {} chars",
                        frame_index,
                        reply.len()
                    );
                    match parse_frame_response(&reply, frame_index, frame_total) {
                        Ok(evidence) => evidences.push(evidence),
                        Err(e) => warn!("Frame {} dropped: {}", frame_index, e),
                    }
                }
                Ok((frame_index, Ok(Err(e)))) => {
                    warn!("Frame {} dropped: capability error: {}", frame_index, e);
                }
                Ok((frame_index, Err(_))) => {
                    warn!(
                        "Frame {} dropped: timeout after {:?}",
                        frame_index,
                        self.config.per_frame_timeout()
                    );
                }
                Err(e) => {
                    warn!("Frame task failed to join: {}", e);
                }
            }
        }

        if evidences.is_empty() {
            return Err(AnalyzerError::NoUsableFrames);
        }

        // Concurrent completion order is arbitrary; restore frame order
        evidences.sort_by_key(|evidence| evidence.frame_index);

        info!(
            "Frame analysis complete: {}/{} frames usable",
            evidences.len(),
            frame_total
        );

        Ok(evidences)
    }
}
