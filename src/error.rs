use thiserror::Error;

/// Failure taxonomy for a single analysis run. Every variant is terminal for
/// the step that raised it; nothing is retried.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("no API key provided (pass --key or set OPENAI_API_KEY)")]
    MissingCredential,

    #[error("input is empty")]
    EmptyInput,

    #[error("failed to fetch url: {0}")]
    Fetch(anyhow::Error),

    #[error("could not locate a main content block in the fetched page")]
    Extraction,

    #[error("translation request failed: {0}")]
    Translation(anyhow::Error),

    #[error("vocabulary request failed: {0}")]
    Vocabulary(anyhow::Error),
}
