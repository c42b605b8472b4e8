use crate::service::types::AnalysisMode;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const ENV_FILE: &str = ".env";
const BASE_URL_VAR: &str = "PREDICTOR_BASE_URL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    #[serde(default = "default_predict_path")]
    pub predict_path: String,
    #[serde(default = "default_teams_path")]
    pub teams_path: String,
    /// Transport-level timeout. Unset means reqwest's default (none).
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_predict_path() -> String {
    "/api/predict".to_string()
}

fn default_teams_path() -> String {
    "/api/teams".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            predict_path: default_predict_path(),
            teams_path: default_teams_path(),
            request_timeout_ms: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FormConfig {
    #[serde(default)]
    pub default_mode: AnalysisMode,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Ask the service for its team list, falling back to the built-in one.
    #[default]
    Service,
    Builtin,
    /// Free-text entry, no catalog check.
    None,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub source: CatalogSource,
    /// Explicit team list; wins over `source` when present.
    #[serde(default)]
    pub teams: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    #[serde(default = "default_sim_latency")]
    pub latency_ms: u64,
}

fn default_sim_latency() -> u64 {
    600
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_sim_latency(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config TOML")
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        for (key, value) in parse_env_lines(&content) {
            if std::env::var(&key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }

    /// Environment overrides applied on top of the TOML values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_VAR) {
            let url = url.trim();
            if !url.is_empty() {
                self.service.base_url = url.to_string();
            }
        }
    }
}

fn parse_env_lines(content: &str) -> Vec<(String, String)> {
    // Strip BOM if present (common on Windows-created files)
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .map(|line| line.trim().trim_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let value = value.trim().trim_matches('"').trim_matches('\'');
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}
