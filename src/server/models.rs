use serde::{Deserialize, Serialize};

use crate::vocabulary::VocabularyEntry;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct AnalyzeRequest {
    pub(crate) input: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) model: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeResponse {
    pub(crate) source: SourcePayload,
    pub(crate) resolved_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) translation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) translation_error: Option<String>,
    pub(crate) tiers: Vec<TierPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) vocabulary_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) model: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SourcePayload {
    pub(crate) kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TierPayload {
    pub(crate) level: String,
    pub(crate) entries: Vec<VocabularyEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) csv: Option<String>,
    pub(crate) file_name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}
