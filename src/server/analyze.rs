use crate::analysis::Analyzer;
use crate::error::AnalyzerError;
use crate::providers::{self, OpenAI};
use crate::resolver::{self, ResolvedContent, ResolvedSource};
use crate::vocabulary::{csv_file_name, tier_csv, JlptLevel, VocabularyTable};

use super::models::{AnalyzeRequest, AnalyzeResponse, SourcePayload, TierPayload};
use super::state::ServerState;

#[derive(Debug)]
pub(crate) struct ServerError {
    pub(crate) status: axum::http::StatusCode,
    pub(crate) message: String,
}

impl From<AnalyzerError> for ServerError {
    fn from(err: AnalyzerError) -> Self {
        let status = match &err {
            AnalyzerError::MissingCredential | AnalyzerError::EmptyInput => {
                axum::http::StatusCode::BAD_REQUEST
            }
            AnalyzerError::Fetch(_) => axum::http::StatusCode::BAD_GATEWAY,
            AnalyzerError::Extraction => axum::http::StatusCode::UNPROCESSABLE_ENTITY,
            AnalyzerError::Translation(_) | AnalyzerError::Vocabulary(_) => {
                axum::http::StatusCode::BAD_GATEWAY
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

pub(crate) async fn analyze_request(
    state: &ServerState,
    request: AnalyzeRequest,
) -> Result<AnalyzeResponse, ServerError> {
    let input = request.input.unwrap_or_default();
    if input.is_empty() {
        return Err(ServerError::from(AnalyzerError::EmptyInput));
    }
    let key = providers::resolve_key(request.key.as_deref()).map_err(ServerError::from)?;
    let model = request
        .model
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| state.settings.model.clone());

    let resolved = resolver::resolve(&input, &state.settings)
        .await
        .map_err(ServerError::from)?;

    let provider = OpenAI::new(key).with_model(model);
    let analyzer = Analyzer::new(provider, state.settings.clone());
    let report = analyzer.analyze(&resolved.text).await;

    Ok(build_response(resolved, report))
}

fn build_response(
    resolved: ResolvedContent,
    report: crate::analysis::AnalysisReport,
) -> AnalyzeResponse {
    let source = match &resolved.source {
        ResolvedSource::Text => SourcePayload {
            kind: "text".to_string(),
            url: None,
        },
        ResolvedSource::Url(url) => SourcePayload {
            kind: "url".to_string(),
            url: Some(url.clone()),
        },
    };

    let (translation, translation_error, model) = match report.translation {
        Ok(output) => (Some(output.text), None, output.model),
        Err(err) => (None, Some(err.to_string()), None),
    };
    let (tiers, vocabulary_error) = match report.vocabulary {
        Ok(table) => (tier_payloads(&table), None),
        Err(err) => (tier_payloads(&VocabularyTable::default()), Some(err.to_string())),
    };

    AnalyzeResponse {
        source,
        resolved_text: resolved.text,
        translation,
        translation_error,
        tiers,
        vocabulary_error,
        model,
    }
}

fn tier_payloads(table: &VocabularyTable) -> Vec<TierPayload> {
    JlptLevel::ALL
        .iter()
        .map(|level| TierPayload {
            level: level.as_str().to_string(),
            entries: table.entries(*level).to_vec(),
            csv: tier_csv(table, *level),
            file_name: csv_file_name(*level),
        })
        .collect()
}
