use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub mod analysis;
pub mod error;
pub mod logging;
mod providers;
pub mod resolver;
pub mod server;
pub mod settings;
pub mod vocabulary;

pub use analysis::{AnalysisReport, Analyzer, StepOutput};
pub use error::AnalyzerError;
pub use providers::{OpenAI, Provider, ProviderResponse, ProviderUsage};

use resolver::ResolvedSource;
use vocabulary::{csv_file_name, tier_csv, JlptLevel, VocabularyTable};

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub key: Option<String>,
    pub model: Option<String>,
    pub settings_path: Option<String>,
    pub out_dir: Option<String>,
    pub verbose: bool,
}

/// One full pass: resolve the input, run both analysis steps, format a
/// plain-text report. CSV files are written per non-empty tier when an
/// output directory is configured.
pub async fn run(config: Config, input: Option<String>) -> Result<String> {
    let settings_path = config.settings_path.as_deref().map(Path::new);
    let settings = settings::load_settings(settings_path)?;

    let input = input.unwrap_or_default();
    if input.is_empty() {
        return Err(AnalyzerError::EmptyInput.into());
    }
    let key = providers::resolve_key(config.key.as_deref())?;

    let resolved = resolver::resolve(&input, &settings).await?;
    if let ResolvedSource::Url(url) = &resolved.source {
        tracing::info!(url = %url, chars = resolved.text.chars().count(), "resolved page content");
    }

    let model = config
        .model
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| settings.model.clone());
    let provider = OpenAI::new(key).with_model(model);
    let analyzer = Analyzer::new(provider, settings);
    let report = analyzer.analyze(&resolved.text).await;

    if let (Some(dir), Ok(table)) = (config.out_dir.as_deref(), &report.vocabulary) {
        write_csv_files(Path::new(dir), table)?;
    }

    Ok(format_report(&resolved, &report))
}

fn format_report(resolved: &resolver::ResolvedContent, report: &AnalysisReport) -> String {
    let mut sections = Vec::new();

    if let ResolvedSource::Url(url) = &resolved.source {
        sections.push(format!("# Content ({})\n{}", url, resolved.text));
    }

    match &report.translation {
        Ok(output) => sections.push(format!("# Translation\n{}", output.text)),
        Err(err) => sections.push(format!("# Translation\n{}", err)),
    }

    match &report.vocabulary {
        Ok(table) => {
            for level in JlptLevel::ALL {
                sections.push(format_tier(table, level));
            }
        }
        Err(err) => sections.push(format!("# Vocabulary\n{}", err)),
    }

    sections.join("\n\n")
}

fn format_tier(table: &VocabularyTable, level: JlptLevel) -> String {
    let entries = table.entries(level);
    if entries.is_empty() {
        return format!("# Vocabulary {}\nno entries", level.as_str());
    }
    let lines = entries
        .iter()
        .map(|entry| entry.fields.join("\t"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("# Vocabulary {}\n{}", level.as_str(), lines)
}

fn write_csv_files(dir: &Path, table: &VocabularyTable) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
    for level in JlptLevel::ALL {
        let Some(csv) = tier_csv(table, level) else {
            continue;
        };
        let path = dir.join(csv_file_name(level));
        fs::write(&path, csv)
            .with_context(|| format!("failed to write csv: {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote vocabulary csv");
    }
    Ok(())
}
