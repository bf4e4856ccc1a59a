// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory to serve; defaults to the directory holding the executable
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    #[serde(default)]
    pub access_log_format: AccessLogFormat,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Per-request log line layout
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessLogFormat {
    /// `✓ [200] /index.html`
    #[default]
    Compact,
    /// Common Log Format
    Common,
    /// One JSON object per line
    Json,
}

/// Files expected in the served directory, checked once at startup
#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    #[serde(default = "default_required_assets")]
    pub required: Vec<String>,
}

fn default_required_assets() -> Vec<String> {
    // wasm-bindgen names the module "<crate>_bg.wasm"
    ["index.html", "demo.html", "pkg/msx2_processor_bg.wasm"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            required: default_required_assets(),
        }
    }
}
