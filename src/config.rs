//! Service configuration loaded from runbeat.toml
//!
//! All options have defaults matching the behavior of an unconfigured
//! scheduled run: bind on 0.0.0.0:8000, auto-run the task 2 seconds after
//! startup, and exit 5 seconds after a successful run.

use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Top-level configuration for the runbeat service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunbeatConfig {
    /// HTTP listener configuration
    pub server: ServerConfig,
    /// Auto-run and shutdown behavior
    pub runner: RunnerConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default: all interfaces)
    pub host: String,
    /// Bind port (default: 8000)
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Auto-run scheduling and self-termination behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Run the task automatically after startup (default: true)
    pub auto_run: bool,
    /// Delay before the auto-run, letting the listener finish binding (default: 2)
    pub warmup_delay_secs: u64,
    /// Delay between a successful auto-run and shutdown, letting logs flush (default: 5)
    pub flush_delay_secs: u64,
    /// Request graceful shutdown after a successful auto-run (default: true)
    pub exit_after_run: bool,
    /// Milliseconds per simulated work step weight unit (default: 1000)
    pub step_unit_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            auto_run: true,
            warmup_delay_secs: 2,
            flush_delay_secs: 5,
            exit_after_run: true,
            step_unit_ms: 1000,
        }
    }
}

/// Load configuration from a TOML file.
///
/// Returns defaults if the file doesn't exist or can't be parsed; a bad
/// config file degrades the service to defaults rather than stopping it.
pub fn load_config(path: &Path) -> RunbeatConfig {
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("Failed to parse {}: {e}", path.display());
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
            }
        }
    }
    RunbeatConfig::default()
}
