//! The speech extraction pipeline

use mealsight_domain::SpeechHypothesis;
use mealsight_llm::{LlmError, Transcriber};
use std::path::Path;
use tracing::{info, warn};

use crate::audio::extract_audio;
use crate::config::SpeechConfig;
use crate::parser::HypothesisParser;

/// Extracts a [`SpeechHypothesis`] from a video's audio track.
///
/// Generic over the transcription capability so tests never touch the
/// network.
pub struct SpeechExtractor<T: Transcriber> {
    config: SpeechConfig,
    transcriber: T,
    parser: HypothesisParser,
}

impl<T: Transcriber> SpeechExtractor<T> {
    /// Create an extractor with the given configuration and transcriber
    pub fn new(config: SpeechConfig, transcriber: T) -> Self {
        let parser = HypothesisParser::new(config.clone());
        Self {
            config,
            transcriber,
            parser,
        }
    }

    /// Extract a hypothesis from the video at `video_path`.
    ///
    /// This never fails: a missing ffmpeg binary, an unconfigured
    /// transcription credential, a transcription error, or an empty
    /// transcript all degrade to [`SpeechHypothesis::empty`].
    pub async fn extract_hypothesis(&self, video_path: &Path) -> SpeechHypothesis {
        let audio = match extract_audio(
            &self.config.ffmpeg_path,
            video_path,
            self.config.extraction_timeout(),
        )
        .await
        {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Audio extraction failed, proceeding without speech: {}", e);
                return SpeechHypothesis::empty();
            }
        };

        let transcript = match self
            .transcriber
            .transcribe(&audio, &self.config.language_hint)
            .await
        {
            Ok(text) => text,
            Err(LlmError::Unconfigured(capability)) => {
                info!("No {} credential, proceeding without speech", capability);
                return SpeechHypothesis::empty();
            }
            Err(e) => {
                warn!("Transcription failed, proceeding without speech: {}", e);
                return SpeechHypothesis::empty();
            }
        };

        if transcript.trim().is_empty() {
            info!("Empty transcript - nothing was said");
            return SpeechHypothesis::empty();
        }

        info!("Transcript: {:?}", transcript);
        self.parser.parse(&transcript)
    }

    /// Parse an already-obtained transcript without touching audio.
    ///
    /// Used when the caller receives a transcript from another source.
    pub fn parse_transcript(&self, transcript: &str) -> SpeechHypothesis {
        self.parser.parse(transcript)
    }
}
