use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::InMemoryOptions;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "talking_heads.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_filter: String,
    pub failure_probability: f64,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    pub seed_demo_talks: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            failure_probability: 0.5,
            min_latency_ms: 500,
            max_latency_ms: 1900,
            seed_demo_talks: true,
        }
    }
}

impl Settings {
    pub fn store_options(&self) -> InMemoryOptions {
        InMemoryOptions {
            failure_probability: self.failure_probability,
            latency_ms: self.min_latency_ms..=self.max_latency_ms,
        }
    }
}

/// Keys accepted in the config file; anything missing keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    log_filter: Option<String>,
    failure_probability: Option<f64>,
    min_latency_ms: Option<u64>,
    max_latency_ms: Option<u64>,
    seed_demo_talks: Option<bool>,
}

/// Defaults, then the config file, then `APP__*` environment variables.
///
/// An explicitly given file must exist; the default file is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if let Some(file_cfg) = read_file_settings(&path, required)? {
        apply_file_settings(&mut settings, file_cfg);
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn read_file_settings(path: &Path, required: bool) -> anyhow::Result<Option<FileSettings>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound && !required => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };
    let file_cfg = toml::from_str::<FileSettings>(&raw)
        .with_context(|| format!("invalid config file '{}'", path.display()))?;
    Ok(Some(file_cfg))
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.failure_probability {
        settings.failure_probability = v;
    }
    if let Some(v) = file_cfg.min_latency_ms {
        settings.min_latency_ms = v;
    }
    if let Some(v) = file_cfg.max_latency_ms {
        settings.max_latency_ms = v;
    }
    if let Some(v) = file_cfg.seed_demo_talks {
        settings.seed_demo_talks = v;
    }
}

fn apply_env_overrides(
    settings: &mut Settings,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = var("APP__FAILURE_PROBABILITY") {
        settings.failure_probability = v
            .parse()
            .with_context(|| format!("APP__FAILURE_PROBABILITY must be a number, got '{v}'"))?;
    }
    if let Some(v) = var("APP__MIN_LATENCY_MS") {
        settings.min_latency_ms = v
            .parse()
            .with_context(|| format!("APP__MIN_LATENCY_MS must be an integer, got '{v}'"))?;
    }
    if let Some(v) = var("APP__MAX_LATENCY_MS") {
        settings.max_latency_ms = v
            .parse()
            .with_context(|| format!("APP__MAX_LATENCY_MS must be an integer, got '{v}'"))?;
    }
    if let Some(v) = var("APP__SEED_DEMO_TALKS") {
        settings.seed_demo_talks = v
            .parse()
            .with_context(|| format!("APP__SEED_DEMO_TALKS must be true or false, got '{v}'"))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
