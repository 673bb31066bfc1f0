//! Configuration for the otto CLI.
//!
//! Built once at startup from environment variables and passed by reference
//! into every component that needs it. There is no global mutable state:
//! components that need a setting take `&OttoConfig`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Immutable runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OttoConfig {
    /// LLM provider label (informational; the wire contract is fixed)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name passed through to the LLM endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the LLM endpoint
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Sampling temperature for plan/summarize requests
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Application data directory; managed tool binaries live in `bin/` below it
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "qwen3:4b".to_string()
}

fn default_api_base() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("otto")
}

impl Default for OttoConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_base: default_api_base(),
            temperature: default_temperature(),
            data_dir: default_data_dir(),
        }
    }
}

impl OttoConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `OTTO_AI_PROVIDER`, `OTTO_AI_MODEL`,
    /// `OTTO_API_BASE`, `OTTO_TEMPERATURE`, `OTTO_DATA_DIR`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("OTTO_AI_PROVIDER") {
            cfg.provider = v;
        }
        if let Ok(v) = std::env::var("OTTO_AI_MODEL") {
            cfg.model = v;
        }
        if let Ok(v) = std::env::var("OTTO_API_BASE") {
            cfg.api_base = v;
        }
        if let Ok(v) = std::env::var("OTTO_TEMPERATURE") {
            match v.parse::<f32>() {
                Ok(t) => cfg.temperature = t,
                Err(_) => warn!("Ignoring unparseable OTTO_TEMPERATURE: {}", v),
            }
        }
        if let Ok(v) = std::env::var("OTTO_DATA_DIR") {
            cfg.data_dir = PathBuf::from(v);
        }

        cfg
    }

    /// The managed local tool directory. Binaries installed by `otto install`
    /// land here and are found ahead of system tools.
    pub fn local_bin_dir(&self) -> PathBuf {
        self.data_dir.join("bin")
    }

    /// Create the managed tool directory if missing. Called once at startup.
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.local_bin_dir())?;
        Ok(())
    }

    /// PATH value for spawned commands: managed bin dir first, then the
    /// inherited search path.
    pub fn search_path(&self) -> String {
        let inherited = std::env::var("PATH").unwrap_or_default();
        format!("{}:{}", self.local_bin_dir().display(), inherited)
    }
}
