use anyhow::{Context, Result};
use tera::{Context as TeraContext, Tera};

use crate::error::AnalyzerError;
use crate::providers::{Provider, ProviderUsage};
use crate::settings::Settings;
use crate::vocabulary::{parse_vocabulary_response, VocabularyTable};

const TRANSLATION_PROMPT: &str = include_str!("prompts/translation.tera");
const VOCABULARY_PROMPT: &str = include_str!("prompts/vocabulary.tera");

/// One completed service call: the verbatim response text plus metadata.
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub text: String,
    pub model: Option<String>,
    pub usage: Option<ProviderUsage>,
}

/// Outcome of one full run. The two steps are independent; a translation
/// failure never suppresses the vocabulary step (or vice versa), so both
/// results are reported side by side.
#[derive(Debug)]
pub struct AnalysisReport {
    pub translation: Result<StepOutput, AnalyzerError>,
    pub vocabulary: Result<VocabularyTable, AnalyzerError>,
}

#[derive(Debug, Clone)]
pub struct Analyzer<P: Provider + Clone> {
    provider: P,
    settings: Settings,
}

impl<P: Provider + Clone> Analyzer<P> {
    pub fn new(provider: P, settings: Settings) -> Self {
        Self { provider, settings }
    }

    /// Runs both steps sequentially against the resolved text. Each run
    /// issues exactly two fresh service calls; nothing is cached or reused
    /// across runs.
    pub async fn analyze(&self, text: &str) -> AnalysisReport {
        let translation = self.translate(text).await;
        if let Err(err) = &translation {
            tracing::warn!(error = %err, "translation step failed, continuing with vocabulary");
        }
        let vocabulary = self.extract_vocabulary(text).await;
        AnalysisReport {
            translation,
            vocabulary,
        }
    }

    pub async fn translate(&self, text: &str) -> Result<StepOutput, AnalyzerError> {
        let prompt = render_translation_prompt(text, &self.settings.target_language)
            .map_err(AnalyzerError::Translation)?;
        let response = self
            .provider
            .clone()
            .append_user_input(prompt)
            .complete()
            .await
            .map_err(AnalyzerError::Translation)?;
        Ok(StepOutput {
            text: response.text,
            model: response.model,
            usage: response.usage,
        })
    }

    pub async fn extract_vocabulary(&self, text: &str) -> Result<VocabularyTable, AnalyzerError> {
        let prompt = render_vocabulary_prompt(text, &self.settings.target_language)
            .map_err(AnalyzerError::Vocabulary)?;
        let response = self
            .provider
            .clone()
            .append_user_input(prompt)
            .complete()
            .await
            .map_err(AnalyzerError::Vocabulary)?;
        Ok(parse_vocabulary_response(&response.text))
    }
}

pub fn render_translation_prompt(text: &str, target_language: &str) -> Result<String> {
    render_prompt(TRANSLATION_PROMPT, text, target_language)
        .with_context(|| "failed to render translation prompt")
}

pub fn render_vocabulary_prompt(text: &str, target_language: &str) -> Result<String> {
    render_prompt(VOCABULARY_PROMPT, text, target_language)
        .with_context(|| "failed to render vocabulary prompt")
}

fn render_prompt(template: &str, text: &str, target_language: &str) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("text", text);
    context.insert("target_language", target_language);
    Ok(Tera::one_off(template, &context, false)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ProviderFuture, ProviderResponse};
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct TestProvider {
        response: Result<String, String>,
        calls: Arc<AtomicUsize>,
    }

    impl TestProvider {
        fn new(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Provider for TestProvider {
        fn append_system_input(self, _input: String) -> Self {
            self
        }

        fn append_user_input(self, _input: String) -> Self {
            self
        }

        fn complete(self) -> ProviderFuture {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = self.response.clone();
            Box::pin(async move {
                match response {
                    Ok(text) => Ok(ProviderResponse {
                        text,
                        model: Some("test".to_string()),
                        usage: None,
                    }),
                    Err(message) => Err(anyhow!(message)),
                }
            })
        }
    }

    #[tokio::test]
    async fn each_run_issues_two_fresh_calls() {
        let provider = TestProvider::new("N3:言葉\tことば\tword\t例");
        let calls = provider.calls.clone();
        let analyzer = Analyzer::new(provider, Settings::default());

        analyzer.analyze("こんにちは").await;
        analyzer.analyze("こんにちは").await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn translation_failure_does_not_block_vocabulary() {
        let provider = TestProvider::failing("quota exceeded");
        let calls = provider.calls.clone();
        let analyzer = Analyzer::new(provider, Settings::default());

        let report = analyzer.analyze("こんにちは").await;
        assert!(matches!(
            report.translation,
            Err(AnalyzerError::Translation(_))
        ));
        assert!(matches!(
            report.vocabulary,
            Err(AnalyzerError::Vocabulary(_))
        ));
        // Both steps were attempted despite the first failing.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn vocabulary_step_parses_the_raw_response() {
        let provider = TestProvider::new("N2:termA\treadingA\tmeaningA\texampleA\nfoo");
        let analyzer = Analyzer::new(provider, Settings::default());

        let table = analyzer.extract_vocabulary("text").await.unwrap();
        assert_eq!(
            table.entries(crate::vocabulary::JlptLevel::N2)[0].fields,
            vec!["termA", "readingA", "meaningA", "exampleA"]
        );
    }

    #[test]
    fn prompts_embed_the_exact_input() {
        let prompt = render_translation_prompt("こんにちは", "Thai").unwrap();
        assert!(prompt.contains("こんにちは"));
        assert!(prompt.contains("Thai"));

        let prompt = render_vocabulary_prompt("こんにちは", "Thai").unwrap();
        assert!(prompt.contains("こんにちは"));
        assert!(prompt.contains("N3, N2 and N1"));
    }
}
