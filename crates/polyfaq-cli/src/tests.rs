//! Assistant loop tests against in-memory services

#[cfg(test)]
mod loop_tests {
    use crate::Assistant;
    use async_trait::async_trait;
    use polyfaq_core::{
        Answer, DetectedLanguage, Error, KnowledgeBase, LanguageCode, LanguageDetector, Result,
        Translation, Translator,
    };
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        questions: Vec<String>,
        detections: Vec<String>,
        translations: Vec<(String, String)>,
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Calls>>);

    impl Recorder {
        fn questions(&self) -> Vec<String> {
            self.0.lock().unwrap().questions.clone()
        }

        fn detections(&self) -> Vec<String> {
            self.0.lock().unwrap().detections.clone()
        }

        fn translations(&self) -> Vec<(String, String)> {
            self.0.lock().unwrap().translations.clone()
        }
    }

    struct FakeKnowledgeBase {
        answers: Vec<&'static str>,
        fail: bool,
        calls: Recorder,
    }

    #[async_trait]
    impl KnowledgeBase for FakeKnowledgeBase {
        async fn answers(&self, question: &str) -> Result<Vec<Answer>> {
            self.calls.0.lock().unwrap().questions.push(question.to_string());
            if self.fail {
                return Err(Error::Network("connection refused".to_string()));
            }
            Ok(self.answers.iter().map(|a| Answer::new(*a, 0.9)).collect())
        }
    }

    struct FakeDetector {
        language: &'static str,
        calls: Recorder,
    }

    #[async_trait]
    impl LanguageDetector for FakeDetector {
        async fn detect(&self, text: &str) -> Result<DetectedLanguage> {
            self.calls.0.lock().unwrap().detections.push(text.to_string());
            Ok(DetectedLanguage {
                code: LanguageCode::parse(self.language)?,
            })
        }
    }

    struct FakeTranslator {
        fail_on: Option<&'static str>,
        calls: Recorder,
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate(&self, text: &str, to: &LanguageCode) -> Result<Translation> {
            self.calls
                .0
                .lock()
                .unwrap()
                .translations
                .push((text.to_string(), to.to_string()));
            if self.fail_on == Some(text) {
                return Err(Error::UnexpectedResponse("translate response contained no translations".to_string()));
            }
            let text = match text {
                "Paris is the capital of France." => "Paris est la capitale de la France.".to_string(),
                other => format!("[{}] {}", to, other),
            };
            Ok(Translation { text, to: to.clone() })
        }
    }

    struct Setup {
        answers: Vec<&'static str>,
        language: &'static str,
        kb_fails: bool,
        translation_fails_on: Option<&'static str>,
    }

    impl Default for Setup {
        fn default() -> Self {
            Self {
                answers: vec!["Paris is the capital of France."],
                language: "en",
                kb_fails: false,
                translation_fails_on: None,
            }
        }
    }

    impl Setup {
        fn build(self) -> (Assistant<FakeKnowledgeBase, FakeDetector, FakeTranslator>, Recorder) {
            colored::control::set_override(false);
            let calls = Recorder::default();
            let assistant = Assistant::new(
                FakeKnowledgeBase {
                    answers: self.answers,
                    fail: self.kb_fails,
                    calls: calls.clone(),
                },
                FakeDetector {
                    language: self.language,
                    calls: calls.clone(),
                },
                FakeTranslator {
                    fail_on: self.translation_fails_on,
                    calls: calls.clone(),
                },
            );
            (assistant, calls)
        }
    }

    async fn run_with(assistant: &Assistant<FakeKnowledgeBase, FakeDetector, FakeTranslator>, input: &str) -> String {
        let mut out = Vec::new();
        assistant.run(Cursor::new(input.to_string()), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn exit_in_any_casing_makes_no_calls() {
        for input in ["exit\n", "EXIT\n", "Exit\nWhat is the capital of France?\n"] {
            let (assistant, calls) = Setup::default().build();
            let output = run_with(&assistant, input).await;

            assert!(output.starts_with("Ask a question, type 'exit' to quit."));
            assert!(calls.questions().is_empty());
            assert!(calls.detections().is_empty());
        }
    }

    #[tokio::test]
    async fn english_question_skips_translation() {
        let (assistant, calls) = Setup::default().build();
        let output = run_with(&assistant, "What is the capital of France?\nexit\n").await;

        assert!(output.contains("Question language: en"));
        assert!(output.contains("Question: What is the capital of France?"));
        assert!(output.contains("Answer: Paris is the capital of France."));
        assert!(output.contains("The input text is already in language of original answer."));
        assert!(!output.contains("Translation to"));
        assert!(calls.translations().is_empty());
    }

    #[tokio::test]
    async fn french_question_gets_translated_answer() {
        let (assistant, calls) = Setup {
            language: "fr",
            ..Default::default()
        }
        .build();
        let output = run_with(&assistant, "Quelle est la capitale de la France?\nexit\n").await;

        assert_eq!(calls.detections(), vec!["Quelle est la capitale de la France?"]);
        assert_eq!(
            calls.translations(),
            vec![("Paris is the capital of France.".to_string(), "fr".to_string())]
        );
        assert!(output.contains("Question language: fr"));
        assert!(output.contains("Answer: Paris is the capital of France."));
        assert!(output.contains("Translation to fr: Paris est la capitale de la France."));
        assert!(!output.contains("already in language"));
    }

    #[tokio::test]
    async fn one_detection_and_translation_per_answer() {
        let (assistant, calls) = Setup {
            answers: vec!["Paris is the capital of France.", "Lyon is the third largest city."],
            language: "de",
            ..Default::default()
        }
        .build();
        run_with(&assistant, "Was ist die Hauptstadt von Frankreich?\nexit\n").await;

        assert_eq!(calls.detections().len(), 2);
        let targets: Vec<String> = calls.translations().into_iter().map(|(_, to)| to).collect();
        assert_eq!(targets, vec!["de", "de"]);
    }

    #[tokio::test]
    async fn knowledge_base_failure_is_reported_and_loop_continues() {
        let (assistant, calls) = Setup {
            kb_fails: true,
            ..Default::default()
        }
        .build();
        let output = run_with(&assistant, "first?\nsecond?\nexit\n").await;

        assert!(output.contains("Request error: Network error: connection refused"));
        assert_eq!(output.matches("Request error:").count(), 2);
        assert_eq!(calls.questions(), vec!["first?", "second?"]);
        assert!(calls.detections().is_empty());
    }

    #[tokio::test]
    async fn translation_failure_abandons_remaining_answers() {
        let (assistant, calls) = Setup {
            answers: vec!["first answer", "second answer", "third answer"],
            language: "sv",
            translation_fails_on: Some("second answer"),
            ..Default::default()
        }
        .build();
        let output = run_with(&assistant, "fråga\nexit\n").await;

        assert!(output.contains("Translation to sv: [sv] first answer"));
        assert!(output.contains("Answer: second answer"));
        assert!(!output.contains("third answer"));
        assert!(output.contains("Request error: Unexpected response"));
        assert_eq!(calls.translations().len(), 2);
    }

    #[tokio::test]
    async fn same_question_twice_is_detected_twice() {
        let (assistant, calls) = Setup {
            language: "fr",
            ..Default::default()
        }
        .build();
        run_with(&assistant, "Bonjour?\nBonjour?\nexit\n").await;

        assert_eq!(calls.questions().len(), 2);
        assert_eq!(calls.detections().len(), 2);
        assert_eq!(calls.translations().len(), 2);
    }

    #[tokio::test]
    async fn blank_lines_and_help_do_not_reach_services() {
        let (assistant, calls) = Setup::default().build();
        let output = run_with(&assistant, "\n   \nhelp\nexit\n").await;

        assert!(output.contains("Available commands:"));
        assert!(calls.questions().is_empty());
    }

    #[tokio::test]
    async fn end_of_input_stops_the_loop() {
        let (assistant, calls) = Setup::default().build();
        let output = run_with(&assistant, "What is the capital of France?\n").await;

        assert!(output.contains("Answer: Paris is the capital of France."));
        assert_eq!(calls.questions().len(), 1);
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_the_loop() {
        let (assistant, calls) = Setup::default().build();
        let mut out = Vec::new();
        let input: &[u8] = b"caf\xe9?\nWhat is the capital of France?\nexit\n";

        assistant.run(Cursor::new(input), &mut out).await.unwrap();

        assert_eq!(calls.questions(), vec!["caf\u{FFFD}?", "What is the capital of France?"]);
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Answer: Paris is the capital of France."));
    }

    #[tokio::test]
    async fn single_question_reports_request_error() {
        let (assistant, _) = Setup {
            kb_fails: true,
            ..Default::default()
        }
        .build();
        let mut out = Vec::new();

        let answered = assistant.ask("What is the capital of France?", &mut out).await.unwrap();

        assert!(!answered);
        assert_eq!(
            String::from_utf8(out).unwrap().trim_end(),
            "Request error: Network error: connection refused"
        );
    }

    #[tokio::test]
    async fn single_question_answered() {
        let (assistant, _) = Setup::default().build();
        let mut out = Vec::new();

        assert!(assistant.ask("What is the capital of France?", &mut out).await.unwrap());
        assert!(String::from_utf8(out).unwrap().contains("already in language of original answer"));
    }

    #[tokio::test]
    async fn no_answers() {
        let (assistant, calls) = Setup {
            answers: vec![],
            ..Default::default()
        }
        .build();
        let mut out = Vec::new();
        let shown = assistant.answer("anything?", &mut out).await.unwrap();

        assert_eq!(shown, 0);
        assert!(String::from_utf8(out).unwrap().contains("No answer found"));
        assert!(calls.detections().is_empty());
    }
}
