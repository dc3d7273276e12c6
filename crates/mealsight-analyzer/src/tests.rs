//! Integration tests for the frame analyzer

#[cfg(test)]
mod tests {
    use crate::{AnalyzerConfig, AnalyzerError, FrameAnalyzer};
    use mealsight_domain::{PrimaryDish, SpeechHypothesis};
    use mealsight_llm::MockChatProvider;

    fn fake_jpeg() -> Vec<u8> {
        vec![0xFF, 0xD8, 0xFF, 0xE0]
    }

    fn frame_response(name: &str, confidence: f64) -> String {
        format!(
            r#"{{
                "hypothesis_confirmed": true,
                "actual_dish": "{name}",
                "components": [
                    {{
                        "name": "{name}",
                        "weight_g": 300,
                        "calories": 330,
                        "protein_g": 6.0,
                        "fat_g": 12.0,
                        "carbs_g": 48.0,
                        "confidence": {confidence}
                    }}
                ],
                "discrepancies": [],
                "additional_items": []
            }}"#
        )
    }

    fn hypothesis() -> SpeechHypothesis {
        SpeechHypothesis {
            transcription: "mashed potato".to_string(),
            primary_dish: Some(PrimaryDish {
                name: "mashed potato".to_string(),
                weight_guess: None,
            }),
            ..SpeechHypothesis::default()
        }
    }

    #[tokio::test]
    async fn test_full_batch_analysis() {
        let provider = MockChatProvider::new(frame_response("mashed potato", 0.85));
        let analyzer = FrameAnalyzer::new(provider.clone(), AnalyzerConfig::default());

        let frames = vec![fake_jpeg(); 5];
        let evidence = analyzer.analyze_frames(frames, &hypothesis()).await.unwrap();

        assert_eq!(evidence.len(), 5);
        assert_eq!(provider.call_count(), 5);
        for (idx, item) in evidence.iter().enumerate() {
            assert_eq!(item.frame_index, idx);
            assert_eq!(item.frame_total, 5);
            assert_eq!(item.components.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_partial_failures_drop_frames_only() {
        let provider = MockChatProvider::new(frame_response("soup", 0.8));
        provider.push_response(frame_response("soup", 0.9));
        provider.push_error("connection reset");
        provider.push_response("not JSON at all");

        let analyzer = FrameAnalyzer::new(provider, AnalyzerConfig::default());
        let frames = vec![fake_jpeg(); 3];

        let evidence = analyzer
            .analyze_frames(frames, &SpeechHypothesis::empty())
            .await
            .unwrap();

        // One network failure, one unparseable response: one frame survives.
        // (Scripted replies are consumed in call order, which under
        // concurrency is not guaranteed to match frame order, so assert
        // counts rather than indices.)
        assert_eq!(evidence.len(), 1);
    }

    #[tokio::test]
    async fn test_all_frames_failing_is_a_batch_failure() {
        let provider = MockChatProvider::new("no structured data here");
        let analyzer = FrameAnalyzer::new(provider, AnalyzerConfig::default());

        let result = analyzer
            .analyze_frames(vec![fake_jpeg(); 3], &SpeechHypothesis::empty())
            .await;
        assert!(matches!(result, Err(AnalyzerError::NoUsableFrames)));
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_batch_failure() {
        let provider = MockChatProvider::default();
        let analyzer = FrameAnalyzer::new(provider, AnalyzerConfig::default());

        let result = analyzer
            .analyze_frames(Vec::new(), &SpeechHypothesis::empty())
            .await;
        assert!(matches!(result, Err(AnalyzerError::NoUsableFrames)));
    }

    #[tokio::test]
    async fn test_output_is_in_frame_order() {
        let provider = MockChatProvider::new(frame_response("rice", 0.7));
        let analyzer = FrameAnalyzer::new(provider, AnalyzerConfig::default());

        let evidence = analyzer
            .analyze_frames(vec![fake_jpeg(); 4], &SpeechHypothesis::empty())
            .await
            .unwrap();

        let indices: Vec<usize> = evidence.iter().map(|e| e.frame_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }
}
