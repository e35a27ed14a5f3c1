use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

#[derive(Debug, Clone)]
pub struct Settings {
    pub model: String,
    pub target_language: String,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            target_language: "Thai".to_string(),
            fetch_timeout_secs: 30,
            fetch_user_agent: "jp-content-analyzer/0.1".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    analysis: Option<AnalysisSettings>,
    fetch: Option<FetchSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalysisSettings {
    model: Option<String>,
    target_language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FetchSettings {
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    let embedded: SettingsFile = toml::from_str(DEFAULT_SETTINGS_TOML)
        .with_context(|| "failed to parse embedded settings")?;
    settings.merge(embedded);

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
        }
    }

    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(analysis) = incoming.analysis {
            if let Some(model) = analysis.model {
                if !model.trim().is_empty() {
                    self.model = model;
                }
            }
            if let Some(language) = analysis.target_language {
                if !language.trim().is_empty() {
                    self.target_language = language;
                }
            }
        }
        if let Some(fetch) = incoming.fetch {
            if let Some(timeout) = fetch.timeout_secs {
                if timeout > 0 {
                    self.fetch_timeout_secs = timeout;
                }
            }
            if let Some(agent) = fetch.user_agent {
                if !agent.trim().is_empty() {
                    self.fetch_user_agent = agent;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overrides_only_present_fields() {
        let mut settings = Settings::default();
        let parsed: SettingsFile = toml::from_str(
            r#"
            [analysis]
            model = "gpt-4"
            "#,
        )
        .unwrap();
        settings.merge(parsed);
        assert_eq!(settings.model, "gpt-4");
        assert_eq!(settings.target_language, "Thai");
        assert_eq!(settings.fetch_timeout_secs, 30);
    }

    #[test]
    fn merge_ignores_blank_values() {
        let mut settings = Settings::default();
        let parsed: SettingsFile = toml::from_str(
            r#"
            [analysis]
            model = "  "
            [fetch]
            timeout_secs = 0
            "#,
        )
        .unwrap();
        settings.merge(parsed);
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.fetch_timeout_secs, 30);
    }
}
