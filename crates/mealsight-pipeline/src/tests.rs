//! End-to-end pipeline tests over mocked capabilities

#[cfg(test)]
mod tests {
    use crate::{CorrectionReply, InMemorySessionStore, Pipeline, PipelineConfig, PipelineError};
    use image::{Rgb, RgbImage};
    use mealsight_domain::{FoodAnalysis, FoodComponent, SessionId, SessionStore};
    use mealsight_frames::{FrameSequence, SelectedFrame};
    use mealsight_llm::{MockChatProvider, MockTranscriber};
    use mealsight_speech::{HypothesisParser, SpeechConfig};
    use std::path::Path;

    fn pipeline(chat: MockChatProvider) -> Pipeline<MockChatProvider, MockTranscriber> {
        Pipeline::new(chat, MockTranscriber::unconfigured(), PipelineConfig::default())
    }

    fn fake_frames(count: usize) -> Vec<SelectedFrame> {
        (0..count)
            .map(|index| SelectedFrame {
                index: index * 10,
                score: 0.8,
                jpeg: vec![0xFF, 0xD8, index as u8],
            })
            .collect()
    }

    fn frame_reply(components: &[(&str, u32, u32)], actual_dish: &str) -> String {
        let list = components
            .iter()
            .map(|(name, weight, calories)| {
                format!(
                    r#"{{"name": "{name}", "weight_g": {weight}, "calories": {calories}, "protein_g": 6.0, "fat_g": 4.0, "carbs_g": 20.0, "confidence": 0.85}}"#
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        format!(
            r#"{{"hypothesis_confirmed": true, "actual_dish": "{actual_dish}", "components": [{list}], "discrepancies": [], "additional_items": []}}"#
        )
    }

    fn spoken_hypothesis() -> mealsight_domain::SpeechHypothesis {
        HypothesisParser::new(SpeechConfig::default())
            .parse("mashed potato, about 500 grams, plus two slices of bread")
    }

    // Scenario: clear speech, 5 frames agree on the dish, 3 of 5 see bread
    #[tokio::test]
    async fn test_video_with_speech_and_partial_bread_consensus() {
        let chat = MockChatProvider::default();
        for _ in 0..3 {
            chat.push_response(frame_reply(
                &[("mashed potato", 300, 330), ("bread", 50, 130)],
                "mashed potato",
            ));
        }
        for _ in 0..2 {
            chat.push_response(frame_reply(&[("mashed potato", 300, 330)], "mashed potato"));
        }

        let pipeline = pipeline(chat);
        let outcome = pipeline
            .analyze_with_hypothesis(spoken_hypothesis(), fake_frames(5))
            .await
            .unwrap();

        let analysis = &outcome.final_analysis;
        assert!(analysis.transcription_used);
        assert!(analysis
            .components
            .iter()
            .any(|c| c.name == "Mashed Potato"));
        // 3/5 visual votes, and the spoken mention boosts it further
        assert!(analysis.components.iter().any(|c| c.name == "Bread"));
        assert_eq!(outcome.frames.len(), 5);
        assert!(!outcome.transcription.is_empty());
    }

    // Full video entry point: audio extraction fails on a missing file,
    // the speech arm degrades to the empty hypothesis, and the frame arm
    // carries the analysis alone.
    #[tokio::test]
    async fn test_analyze_video_degrades_without_audio() {
        let chat = MockChatProvider::new(frame_reply(&[("soup", 250, 120)], "soup"));
        let pipeline = pipeline(chat);

        // 1s of face (skipped), then 2s of textured food footage
        let mut frames = vec![RgbImage::from_pixel(32, 32, Rgb([40, 40, 40])); 30];
        frames.extend(vec![
            RgbImage::from_fn(32, 32, |x, y| {
                if (x / 2 + y / 2) % 2 == 0 {
                    Rgb([200, 180, 150])
                } else {
                    Rgb([80, 60, 40])
                }
            });
            60
        ]);
        let source = FrameSequence::new(frames, 30.0);

        let outcome = pipeline
            .analyze_video(Path::new("/nonexistent/meal.mp4"), source)
            .await
            .unwrap();

        assert_eq!(outcome.transcription, "");
        assert_eq!(outcome.frames.len(), 5);
        assert!(outcome.final_analysis.is_usable());
        assert!(!outcome.final_analysis.transcription_used);
    }

    // Scenario: no audio track; analysis proceeds from visual evidence
    #[tokio::test]
    async fn test_video_without_audio_still_produces_analysis() {
        let chat = MockChatProvider::new(frame_reply(&[("soup", 250, 120)], "soup"));
        let pipeline = pipeline(chat);

        let outcome = pipeline
            .analyze_with_hypothesis(Default::default(), fake_frames(5))
            .await
            .unwrap();

        assert_eq!(outcome.transcription, "");
        assert!(!outcome.final_analysis.transcription_used);
        assert!(outcome.final_analysis.is_usable());
    }

    #[tokio::test]
    async fn test_no_frames_is_a_terminal_failure() {
        let pipeline = pipeline(MockChatProvider::default());
        let result = pipeline
            .analyze_with_hypothesis(Default::default(), Vec::new())
            .await;
        assert!(matches!(result, Err(PipelineError::NoFrames)));
    }

    #[tokio::test]
    async fn test_all_frames_failing_is_a_terminal_failure() {
        let chat = MockChatProvider::new("absolutely not JSON");
        let pipeline = pipeline(chat);

        let result = pipeline
            .analyze_with_hypothesis(Default::default(), fake_frames(3))
            .await;
        assert!(matches!(result, Err(PipelineError::AnalysisFailed)));
    }

    // Scenario: two frames disagree on the actual dish
    #[tokio::test]
    async fn test_conflicting_dishes_are_recorded_in_metadata() {
        let chat = MockChatProvider::default();
        chat.push_response(frame_reply(&[("soup", 250, 120)], "soup"));
        chat.push_response(frame_reply(&[("soup", 250, 120)], "stew"));

        let pipeline = pipeline(chat);
        let outcome = pipeline
            .analyze_with_hypothesis(Default::default(), fake_frames(2))
            .await
            .unwrap();

        let metadata = outcome.final_analysis.aggregation_metadata.unwrap();
        assert!(metadata.conflicts_resolved >= 1);
    }

    #[tokio::test]
    async fn test_photo_analysis_and_cache() {
        let chat = MockChatProvider::new(frame_reply(&[("salad", 280, 685)], "salad"));
        let pipeline = pipeline(chat.clone());

        let photo = vec![0xFF, 0xD8, 1, 2, 3];
        let first = pipeline.analyze_photo(&photo).await.unwrap();
        assert_eq!(first.weight_grams, 280);
        assert_eq!(first.calories_total, 685);
        assert_eq!(first.source.unwrap().as_str(), "photo");
        assert_eq!(chat.call_count(), 1);

        // Same bytes hit the cache; no second capability call
        let second = pipeline.analyze_photo(&photo).await.unwrap();
        assert_eq!(second.calories_total, 685);
        assert_eq!(chat.call_count(), 1);
    }

    // A reply that parses but names no food is a failure, and failures
    // must never be served from the cache
    #[tokio::test]
    async fn test_photo_with_no_recognized_food_fails_and_is_not_cached() {
        let chat = MockChatProvider::new(r#"{"components": []}"#);
        let pipeline = pipeline(chat.clone());
        let photo = vec![0xFF, 0xD8, 7];

        let result = pipeline.analyze_photo(&photo).await;
        assert!(matches!(result, Err(PipelineError::AnalysisFailed)));

        let result = pipeline.analyze_photo(&photo).await;
        assert!(matches!(result, Err(PipelineError::AnalysisFailed)));
        assert_eq!(chat.call_count(), 2);
    }

    #[tokio::test]
    async fn test_oversized_photo_is_refused() {
        let pipeline = pipeline(MockChatProvider::default());
        let huge = vec![0u8; 11 * 1024 * 1024];
        let result = pipeline.analyze_photo(&huge).await;
        assert!(matches!(result, Err(PipelineError::PhotoTooLarge { .. })));
    }

    #[tokio::test]
    async fn test_photo_range_validation_adds_warnings() {
        // 100 g at 2000 kcal: far past any plausible calorie density
        let chat = MockChatProvider::new(frame_reply(&[("mystery", 100, 2000)], "mystery"));
        let pipeline = pipeline(chat);

        let analysis = pipeline.analyze_photo(&[0xFF, 0xD8, 9]).await.unwrap();
        assert!(analysis
            .warnings
            .iter()
            .any(|w| w.contains("calorie density")));
    }

    fn session_analysis() -> FoodAnalysis {
        FoodAnalysis::from_components(
            "Porridge",
            vec![FoodComponent {
                name: "Porridge".to_string(),
                weight_g: 150,
                calories: 390,
                protein_g: 9.0,
                fat_g: 6.0,
                carbs_g: 72.0,
                confidence: 0.8,
            }],
        )
    }

    // Scenario: removing an absent component succeeds as a no-op
    #[tokio::test]
    async fn test_correction_noop_removal() {
        let chat = MockChatProvider::default();
        chat.push_error("ai path down"); // force rule fallback
        let pipeline = pipeline(chat);
        let mut store = InMemorySessionStore::new();
        let id = store.open_session(session_analysis());

        let reply = pipeline
            .apply_correction(&mut store, id, "no bread")
            .await
            .unwrap();
        let CorrectionReply::Applied(updated) = reply else {
            panic!("expected Applied");
        };
        assert_eq!(updated.weight_grams, 150);
        assert_eq!(updated.calories_total, 390);
        assert!(updated.warnings.is_empty());
        assert_eq!(store.get_correction_count(id).unwrap(), 1);
    }

    // Scenario: "500g" rescales 150 g / 390 kcal to 500 g / 1300 kcal
    #[tokio::test]
    async fn test_correction_rescale_end_to_end() {
        let chat = MockChatProvider::default();
        chat.push_error("ai path down");
        let pipeline = pipeline(chat);
        let mut store = InMemorySessionStore::new();
        let id = store.open_session(session_analysis());

        let reply = pipeline
            .apply_correction(&mut store, id, "500g")
            .await
            .unwrap();
        let CorrectionReply::Applied(updated) = reply else {
            panic!("expected Applied");
        };
        assert_eq!(updated.weight_grams, 500);
        assert_eq!(updated.calories_total, 1300);

        // The session now holds the corrected analysis
        let stored = store.get_current_analysis(id).unwrap().unwrap();
        assert_eq!(stored.weight_grams, 500);
    }

    // Scenario: the correction limit refuses before invoking the engine
    #[tokio::test]
    async fn test_correction_limit_refuses_without_engine_call() {
        let chat = MockChatProvider::default();
        let pipeline = pipeline(chat.clone());
        let mut store = InMemorySessionStore::new();
        let id = store.open_session(session_analysis());
        for _ in 0..3 {
            store.increment_correction_count(id).unwrap();
        }

        let reply = pipeline
            .apply_correction(&mut store, id, "no bread")
            .await
            .unwrap();
        assert!(matches!(reply, CorrectionReply::LimitReached(_)));
        assert_eq!(chat.call_count(), 0);
    }

    #[tokio::test]
    async fn test_correction_without_session_is_caller_misuse() {
        let pipeline = pipeline(MockChatProvider::default());
        let mut store = InMemorySessionStore::new();

        let result = pipeline
            .apply_correction(&mut store, SessionId(7), "no bread")
            .await;
        assert!(matches!(result, Err(PipelineError::NoActiveSession)));
    }

    #[tokio::test]
    async fn test_unrecognized_correction_returns_guidance() {
        let chat = MockChatProvider::default();
        chat.push_error("ai path down");
        let pipeline = pipeline(chat);
        let mut store = InMemorySessionStore::new();
        let id = store.open_session(session_analysis());

        let reply = pipeline
            .apply_correction(&mut store, id, "make it fancier")
            .await
            .unwrap();
        let CorrectionReply::Rejected(message) = reply else {
            panic!("expected Rejected");
        };
        assert!(message.contains("Supported corrections"));
        // A rejected correction does not consume the budget
        assert_eq!(store.get_correction_count(id).unwrap(), 0);
    }
}
