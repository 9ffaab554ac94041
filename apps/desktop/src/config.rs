use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "classifier.toml";
pub const DEFAULT_CLASSIFIER_URL: &str = "https://api.imageaibysaamer.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub classifier_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            classifier_url: DEFAULT_CLASSIFIER_URL.into(),
        }
    }
}

/// Defaults, then the config file, then the environment, then `--server-url`.
///
/// A missing default config file is fine; an explicitly named one must exist.
pub fn load_settings(
    config_path: Option<&Path>,
    server_url: Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                apply_file(&mut settings, &raw)
                    .with_context(|| format!("invalid config file '{DEFAULT_CONFIG_FILE}'"))?;
            }
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    apply_cli(&mut settings, server_url);
    debug!(classifier_url = %settings.classifier_url, "settings loaded");
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg = toml::from_str::<HashMap<String, String>>(raw)?;
    if let Some(v) = file_cfg.get("classifier_url") {
        settings.classifier_url = v.clone();
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("CLASSIFIER_URL") {
        settings.classifier_url = v;
    }
    if let Some(v) = var("APP__CLASSIFIER_URL") {
        settings.classifier_url = v;
    }
}

fn apply_cli(settings: &mut Settings, server_url: Option<String>) {
    if let Some(v) = server_url {
        settings.classifier_url = v;
    }
}
