use anyhow::Result;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

use crate::error::AnalyzerError;

mod openai;

pub use openai::OpenAI;

#[derive(Debug, Clone, Copy)]
pub enum MessageRole {
    System,
    User,
}

impl MessageRole {
    fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

/// Free-text completion plus whatever metadata the service reported.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderResponse {
    pub text: String,
    pub model: Option<String>,
    pub usage: Option<ProviderUsage>,
}

pub type ProviderFuture = Pin<Box<dyn Future<Output = Result<ProviderResponse>> + Send>>;

pub trait Provider: Clone + Send + Sync {
    fn append_system_input(self, input: String) -> Self;
    fn append_user_input(self, input: String) -> Self;
    fn complete(self) -> ProviderFuture;
}

/// An explicit key always wins over the environment. The key travels with the
/// provider instance for one run; there is no process-wide credential state.
pub fn resolve_key(override_key: Option<&str>) -> Result<String, AnalyzerError> {
    if let Some(key) = override_key {
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }
    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(AnalyzerError::MissingCredential)
}
