//! Configuration management and environment variable loading

use crate::normalizer::NormalizerConfig;
use crate::{ClauseError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Agent base URL
pub const ENDPOINT_VAR: &str = "CLAUSE_AGENT_ENDPOINT";
/// Bearer token sent with every agent request
pub const API_KEY_VAR: &str = "CLAUSE_AGENT_API_KEY";
/// Comma-separated health check paths
pub const HEALTH_PATHS_VAR: &str = "CLAUSE_HEALTH_PATHS";
/// `|`-separated internal-monologue marker phrases
pub const MONOLOGUE_MARKERS_VAR: &str = "CLAUSE_MONOLOGUE_MARKERS";
/// Directory transcript exports are written to
pub const EXPORT_DIR_VAR: &str = "CLAUSE_EXPORT_DIR";
/// Enables the redacted log tail in the terminal
pub const SHOW_LOGS_VAR: &str = "CLAUSE_SHOW_LOGS";

/// Health paths tried in order when no override is configured
pub const DEFAULT_HEALTH_PATHS: &[&str] = &["/health", "/api/health", "/status", "/ping", "/"];

/// Load environment variables from .env file
///
/// This function loads variables from a .env file in the current directory
/// or a parent directory. A missing file is not an error.
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("✓ Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(ClauseError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::debug!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(ClauseError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Load environment variables from a specific file
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    match dotenvy::from_path(path.as_ref()) {
        Ok(_) => {
            tracing::info!("✓ Loaded environment from: {}", path.as_ref().display());
            Ok(())
        }
        Err(e) => Err(ClauseError::config(format!(
            "Failed to load {} environment file: {}",
            path.as_ref().display(),
            e
        ))),
    }
}

/// Get required environment variable
///
/// Returns an error if the variable is not set or blank
pub fn get_required_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ClauseError::config(format!(
            "Required environment variable '{}' is not set. \
             Check your .env file or system environment.",
            key
        ))),
    }
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as boolean
pub fn get_env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Validate that required environment variables are set
pub fn validate_env(required_vars: &[&str]) -> Result<()> {
    let missing: Vec<&str> = required_vars
        .iter()
        .copied()
        .filter(|var| env::var(var).map(|v| v.trim().is_empty()).unwrap_or(true))
        .collect();

    if !missing.is_empty() {
        return Err(ClauseError::config(format!(
            "Missing required environment variables: {}\n\
             Set them in your shell or in a .env file next to the binary",
            missing.join(", ")
        )));
    }

    Ok(())
}

fn split_list(raw: &str, sep: char) -> Vec<String> {
    raw.split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Runtime configuration for one chat client
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Agent base URL without trailing slash
    pub endpoint: String,
    /// Static bearer token
    pub api_key: String,
    /// Health check path suffixes, tried in order
    pub health_paths: Vec<String>,
    /// Reply normalizer settings
    pub normalizer: NormalizerConfig,
    /// Where transcript exports land
    pub export_dir: PathBuf,
    /// Print redacted log events in the terminal
    pub show_logs: bool,
}

impl ChatConfig {
    /// Create a config with defaults for everything but the connection
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = normalize_endpoint(&endpoint.into())?;
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClauseError::config("Agent API key cannot be empty"));
        }

        Ok(Self {
            endpoint,
            api_key,
            health_paths: DEFAULT_HEALTH_PATHS.iter().map(|p| p.to_string()).collect(),
            normalizer: NormalizerConfig::default(),
            export_dir: PathBuf::from("."),
            show_logs: false,
        })
    }

    /// Build the config from `CLAUSE_*` environment variables
    pub fn from_env() -> Result<Self> {
        validate_env(&[ENDPOINT_VAR, API_KEY_VAR])?;
        let mut config = Self::new(get_required_env(ENDPOINT_VAR)?, get_required_env(API_KEY_VAR)?)?;

        if let Ok(raw) = env::var(HEALTH_PATHS_VAR) {
            config = config.with_health_paths(split_list(&raw, ','))?;
        }
        if let Ok(raw) = env::var(MONOLOGUE_MARKERS_VAR) {
            config.normalizer.monologue_markers = split_list(&raw, '|');
        }
        config.export_dir = PathBuf::from(get_env_or(EXPORT_DIR_VAR, "."));
        config.show_logs = get_env_bool(SHOW_LOGS_VAR, false);

        tracing::debug!(
            endpoint = %config.endpoint,
            health_paths = config.health_paths.len(),
            "Loaded chat configuration"
        );
        Ok(config)
    }

    /// Replace the health path list
    pub fn with_health_paths(mut self, paths: Vec<String>) -> Result<Self> {
        if paths.is_empty() {
            return Err(ClauseError::config("At least one health path is required"));
        }
        self.health_paths = paths
            .into_iter()
            .map(|p| if p.starts_with('/') { p } else { format!("/{}", p) })
            .collect();
        Ok(self)
    }

    /// Join a path suffix onto the endpoint
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Loggable description of the key that never reveals its contents
    pub fn api_key_summary(&self) -> String {
        format!("Present ({} chars)", self.api_key.chars().count())
    }
}

/// Validate an endpoint URL and strip any trailing slash
pub fn normalize_endpoint(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClauseError::config("Agent endpoint cannot be empty"));
    }

    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ClauseError::config(format!("Invalid agent endpoint '{}': {}", trimmed, e)))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ClauseError::config(format!(
                "Agent endpoint must use http or https, got '{}'",
                other
            )))
        }
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
