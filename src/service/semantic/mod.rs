//! Semantic risk analysis using a generative model
//!
//! Rates the article's writing style on three markers (subjectivity, clickbait framing,
//! missing evidence). The primary model is tried first and the fallback model exactly once
//! if the primary call fails.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::model::SemanticRisk;
use crate::model::config::SemanticConfig;
use crate::service::llm::{LlmError, TextGenerator};

pub mod error;
pub mod parse;
pub mod prompts;

pub use error::SemanticError;
use parse::parse_semantic_response;
use prompts::{SEMANTIC_SYSTEM_PROMPT, build_semantic_prompt};

/// Analyzer for stylistic risk markers
pub struct SemanticRiskAnalyzer {
    generator: Arc<dyn TextGenerator>,
    config: SemanticConfig,
}

impl SemanticRiskAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>, config: SemanticConfig) -> Self {
        tracing::info!(
            primary_model = %config.primary_model,
            fallback_model = %config.fallback_model,
            "Semantic risk analyzer initialized"
        );
        Self { generator, config }
    }

    /// Rate the article text
    pub async fn analyze(&self, text: &str) -> Result<SemanticRisk, SemanticError> {
        let excerpt = truncate_chars(text, self.config.max_input_chars);
        let prompt = build_semantic_prompt(excerpt);
        let start = Instant::now();

        let (model, raw) = match self.call_model(&self.config.primary_model, &prompt).await {
            Ok(raw) => (self.config.primary_model.as_str(), raw),
            Err(primary_error) => {
                tracing::warn!(
                    model = %self.config.primary_model,
                    error = %primary_error,
                    "Primary model failed, trying fallback"
                );
                match self.call_model(&self.config.fallback_model, &prompt).await {
                    Ok(raw) => (self.config.fallback_model.as_str(), raw),
                    Err(fallback_error) => {
                        tracing::error!(
                            model = %self.config.fallback_model,
                            error = %fallback_error,
                            "Fallback model failed"
                        );
                        return Err(SemanticError::ModelUnavailable {
                            primary: primary_error.to_string(),
                            fallback: fallback_error.to_string(),
                        });
                    }
                }
            }
        };

        let risk = parse_semantic_response(&raw, model)?;

        tracing::info!(
            model = %model,
            subjectivity = risk.subjectivity,
            clickbait = risk.clickbait,
            evidence_absence = risk.evidence_absence,
            aggregate_risk = risk.aggregate_risk,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Semantic analysis completed"
        );

        Ok(risk)
    }

    async fn call_model(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let call = self.generator.generate(
            model,
            SEMANTIC_SYSTEM_PROMPT,
            prompt,
            self.config.temperature,
        );

        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Completion(format!(
                "no answer within {}s",
                timeout.as_secs()
            ))),
        }
    }
}

/// First `max_chars` characters of `text`, cut on a char boundary
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const VALID_ANSWER: &str = r#"{"subjectivity_analysis": {"score": 1, "details": "Neutre"},
        "clickbait_analysis": {"score": 2}, "evidence_analysis": {"missing_evidence_score": 2},
        "overall_summary": "Factuel", "style_verdict": "RELIABLE"}"#;

    /// Scripted generator answering per model name
    struct FakeGenerator {
        answers: Vec<(&'static str, Result<&'static str, &'static str>)>,
        calls: Mutex<Vec<(String, usize)>>,
    }

    impl FakeGenerator {
        fn new(answers: Vec<(&'static str, Result<&'static str, &'static str>)>) -> Arc<Self> {
            Arc::new(Self {
                answers,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn models_called(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(
            &self,
            model: &str,
            _preamble: &str,
            prompt: &str,
            _temperature: f64,
        ) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.chars().count()));
            match self.answers.iter().find(|(m, _)| *m == model) {
                Some((_, Ok(answer))) => Ok(answer.to_string()),
                Some((_, Err(message))) => Err(LlmError::Completion(message.to_string())),
                None => Err(LlmError::Completion("unknown model".to_string())),
            }
        }
    }

    fn config() -> SemanticConfig {
        SemanticConfig {
            primary_model: "primary".to_string(),
            fallback_model: "fallback".to_string(),
            ..SemanticConfig::default()
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let generator = FakeGenerator::new(vec![("primary", Ok(VALID_ANSWER))]);
        let analyzer = SemanticRiskAnalyzer::new(generator.clone(), config());

        let risk = analyzer.analyze("Texte de l'article.").await.unwrap();

        assert_eq!(generator.models_called(), vec!["primary"]);
        assert_eq!(risk.model_used, "primary");
        assert_eq!(risk.aggregate_risk, 16.7);
    }

    #[tokio::test]
    async fn test_fallback_used_once_after_primary_failure() {
        let generator = FakeGenerator::new(vec![
            ("primary", Err("quota exceeded")),
            ("fallback", Ok(VALID_ANSWER)),
        ]);
        let analyzer = SemanticRiskAnalyzer::new(generator.clone(), config());

        let risk = analyzer.analyze("Texte.").await.unwrap();

        assert_eq!(generator.models_called(), vec!["primary", "fallback"]);
        assert_eq!(risk.model_used, "fallback");
    }

    #[tokio::test]
    async fn test_both_models_failing_is_model_unavailable() {
        let generator = FakeGenerator::new(vec![
            ("primary", Err("quota exceeded")),
            ("fallback", Err("service down")),
        ]);
        let analyzer = SemanticRiskAnalyzer::new(generator.clone(), config());

        let err = analyzer.analyze("Texte.").await.unwrap_err();

        assert_eq!(generator.models_called().len(), 2);
        match err {
            SemanticError::ModelUnavailable { primary, fallback } => {
                assert!(primary.contains("quota exceeded"));
                assert!(fallback.contains("service down"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_answer_does_not_trigger_fallback() {
        let generator = FakeGenerator::new(vec![
            ("primary", Ok("Désolé, je ne peux pas.")),
            ("fallback", Ok(VALID_ANSWER)),
        ]);
        let analyzer = SemanticRiskAnalyzer::new(generator.clone(), config());

        let err = analyzer.analyze("Texte.").await.unwrap_err();

        assert!(matches!(err, SemanticError::MalformedOutput { .. }));
        assert_eq!(generator.models_called(), vec!["primary"]);
    }

    #[tokio::test]
    async fn test_long_input_is_truncated() {
        let generator = FakeGenerator::new(vec![("primary", Ok(VALID_ANSWER))]);
        let analyzer = SemanticRiskAnalyzer::new(
            generator.clone(),
            SemanticConfig {
                max_input_chars: 100,
                ..config()
            },
        );

        let long_text = "é".repeat(50_000);
        analyzer.analyze(&long_text).await.unwrap();

        let prompt_chars = generator.calls.lock().unwrap()[0].1;
        let template_chars = build_semantic_prompt("").chars().count();
        assert_eq!(prompt_chars, template_chars + 100);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("éàü", 2), "éà");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
