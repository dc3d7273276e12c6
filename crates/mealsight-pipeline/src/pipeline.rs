//! Top-level pipeline orchestration

use crate::cache::AnalysisCache;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use mealsight_aggregator::Aggregator;
use mealsight_analyzer::{parse_frame_response, FrameAnalyzer, PromptBuilder};
use mealsight_correction::{CorrectionEngine, CorrectionOutcome};
use mealsight_domain::validate::analysis_warnings;
use mealsight_domain::{AnalysisSource, FoodAnalysis, SessionId, SessionStore, SpeechHypothesis};
use mealsight_frames::{FrameSelector, SelectedFrame, VideoSource};
use mealsight_llm::{ChatProvider, ChatRequest, Transcriber};
use mealsight_speech::SpeechExtractor;
use std::path::Path;
use std::sync::Mutex;
use tokio::time::timeout;
use tracing::{info, warn};

/// Result of a successful video analysis
#[derive(Debug, Clone)]
pub struct VideoAnalysisOutcome {
    /// The aggregated final analysis
    pub final_analysis: FoodAnalysis,
    /// The selected, enhanced frames as JPEG bytes (for echoing back to
    /// the user)
    pub frames: Vec<Vec<u8>>,
    /// The raw transcription, empty when nothing was heard
    pub transcription: String,
}

/// Result of a correction request against an active session
#[derive(Debug, Clone)]
pub enum CorrectionReply {
    /// The correction was applied and persisted to the session
    Applied(FoodAnalysis),
    /// The correction was refused, with guidance
    Rejected(String),
    /// The session's correction budget is spent; the engine was not
    /// invoked
    LimitReached(String),
}

/// The complete analysis pipeline.
///
/// Owns every stage and the photo cache; generic over the chat and
/// transcription capabilities so tests run entirely on mocks.
///
/// Cancellation: dropping an in-flight `analyze_video` future cancels its
/// outstanding capability calls; partial evidence never reaches
/// aggregation.
pub struct Pipeline<C, T>
where
    C: ChatProvider + Clone + 'static,
    T: Transcriber,
{
    speech: SpeechExtractor<T>,
    analyzer: FrameAnalyzer<C>,
    aggregator: Aggregator,
    correction: CorrectionEngine,
    chat: C,
    cache: Mutex<AnalysisCache>,
    config: PipelineConfig,
}

impl<C, T> Pipeline<C, T>
where
    C: ChatProvider + Clone + 'static,
    T: Transcriber,
{
    /// Assemble a pipeline from capabilities and configuration
    pub fn new(chat: C, transcriber: T, config: PipelineConfig) -> Self {
        let speech = SpeechExtractor::new(config.speech.clone(), transcriber);
        let analyzer = FrameAnalyzer::new(chat.clone(), config.analyzer.clone());
        let aggregator = Aggregator::new(config.voting.clone());
        let correction = CorrectionEngine::with_ai(chat.clone());
        let cache = Mutex::new(AnalysisCache::new(config.cache_capacity, config.cache_ttl()));

        Self {
            speech,
            analyzer,
            aggregator,
            correction,
            chat,
            cache,
            config,
        }
    }

    /// Analyze a meal video: speech hypothesis and frame selection run
    /// concurrently, then per-frame analysis and aggregation.
    ///
    /// `video_path` is the file the audio track is extracted from;
    /// `source` provides decoded frame access to the same video.
    pub async fn analyze_video<S>(
        &self,
        video_path: &Path,
        source: S,
    ) -> Result<VideoAnalysisOutcome, PipelineError>
    where
        S: VideoSource + Send + 'static,
    {
        let frame_config = self.config.frame.clone();
        let selection = tokio::task::spawn_blocking(move || {
            FrameSelector::new(frame_config).select_best_frames(source)
        });

        let (hypothesis, frames) =
            tokio::join!(self.speech.extract_hypothesis(video_path), selection);
        let frames = frames.map_err(|e| PipelineError::Internal(e.to_string()))?;

        self.analyze_with_hypothesis(hypothesis, frames).await
    }

    /// Analyze already-selected frames against a known hypothesis.
    ///
    /// The second half of [`Pipeline::analyze_video`], exposed for callers
    /// that obtained a transcript or frames elsewhere.
    pub async fn analyze_with_hypothesis(
        &self,
        hypothesis: SpeechHypothesis,
        frames: Vec<SelectedFrame>,
    ) -> Result<VideoAnalysisOutcome, PipelineError> {
        if frames.is_empty() {
            return Err(PipelineError::NoFrames);
        }

        let jpegs: Vec<Vec<u8>> = frames.into_iter().map(|f| f.jpeg).collect();

        let evidence = self
            .analyzer
            .analyze_frames(jpegs.clone(), &hypothesis)
            .await
            .map_err(|e| {
                warn!("Frame analysis batch failed: {}", e);
                PipelineError::AnalysisFailed
            })?;

        let final_analysis = self.aggregator.aggregate(&hypothesis, &evidence);

        info!(
            "Video analysis complete: '{}', {} kcal",
            final_analysis.dish_name, final_analysis.calories_total
        );

        Ok(VideoAnalysisOutcome {
            final_analysis,
            frames: jpegs,
            transcription: hypothesis.transcription,
        })
    }

    /// Analyze a single meal photo: one vision call, no hypothesis, no
    /// aggregation beyond the single-ballot fold. Results are served from
    /// the TTL cache for repeated submissions of the same image.
    pub async fn analyze_photo(&self, image_jpeg: &[u8]) -> Result<FoodAnalysis, PipelineError> {
        if image_jpeg.len() > self.config.max_photo_bytes {
            return Err(PipelineError::PhotoTooLarge {
                size: image_jpeg.len(),
                max: self.config.max_photo_bytes,
            });
        }

        let key = AnalysisCache::key_for(image_jpeg);
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(key) {
                return Ok(hit);
            }
        }

        let hypothesis = SpeechHypothesis::empty();
        let system = PromptBuilder::new(&hypothesis).build();
        let request = ChatRequest::text(system, "Analyze this photo of a meal.")
            .with_image(image_jpeg.to_vec())
            .with_max_tokens(self.config.analyzer.max_response_tokens);

        let reply = match timeout(self.config.photo_timeout(), self.chat.complete(request)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                warn!("Photo analysis call failed: {}", e);
                return Err(PipelineError::AnalysisFailed);
            }
            Err(_) => {
                warn!("Photo analysis timed out");
                return Err(PipelineError::AnalysisFailed);
            }
        };

        let evidence = parse_frame_response(&reply, 0, 1).map_err(|e| {
            warn!("Photo response unparseable: {}", e);
            PipelineError::AnalysisFailed
        })?;

        let mut analysis = self.aggregator.aggregate(&hypothesis, &[evidence]);
        if !analysis.is_usable() {
            warn!("Photo analysis recognized no food");
            return Err(PipelineError::AnalysisFailed);
        }
        analysis.source = Some(AnalysisSource::Photo);
        for warning in analysis_warnings(&analysis) {
            analysis.push_warning(warning);
        }

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, analysis.clone());
        }

        Ok(analysis)
    }

    /// Apply a user correction to the session's current analysis.
    ///
    /// Refuses to invoke the correction engine once the session's
    /// correction budget is spent; the caller should then prompt for
    /// confirm-or-cancel.
    pub async fn apply_correction<S>(
        &self,
        store: &mut S,
        id: SessionId,
        text: &str,
    ) -> Result<CorrectionReply, PipelineError>
    where
        S: SessionStore,
        S::Error: std::fmt::Display,
    {
        let analysis = store
            .get_current_analysis(id)
            .map_err(|e| PipelineError::Session(e.to_string()))?
            .ok_or(PipelineError::NoActiveSession)?;

        let count = store
            .get_correction_count(id)
            .map_err(|e| PipelineError::Session(e.to_string()))?;
        if count >= self.config.max_corrections {
            info!("{}: correction limit reached ({})", id, count);
            return Ok(CorrectionReply::LimitReached(format!(
                "You've already made {} corrections to this analysis. Confirm \
                 the current result or cancel and start over.",
                count
            )));
        }

        match self.correction.apply(text, &analysis).await {
            CorrectionOutcome::Applied(updated) => {
                store
                    .replace_analysis(id, updated.clone())
                    .map_err(|e| PipelineError::Session(e.to_string()))?;
                store
                    .increment_correction_count(id)
                    .map_err(|e| PipelineError::Session(e.to_string()))?;
                Ok(CorrectionReply::Applied(updated))
            }
            CorrectionOutcome::Rejected(message) => Ok(CorrectionReply::Rejected(message)),
        }
    }
}
