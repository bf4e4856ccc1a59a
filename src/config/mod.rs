// Configuration module entry point
// Layered loading (defaults, file, environment, CLI) and startup resolution

mod settings;
mod types;

pub use settings::ServerSettings;
pub use types::{AccessLogFormat, Config, LoggingConfig};

use crate::error::ServeError;

pub const DEFAULT_PORT: u16 = 8080;

/// Config file looked up in the working directory (any extension `config` understands)
const DEFAULT_CONFIG_FILE: &str = "wasm-devserver";
/// Overrides the config file path
const CONFIG_PATH_VAR: &str = "WASM_DEVSERVER_CONFIG";
/// `WASM_DEVSERVER_SERVER__PORT=9000` sets `server.port`
const ENV_PREFIX: &str = "WASM_DEVSERVER";

impl Config {
    /// Load configuration from the default file location and the environment
    pub fn load(port_override: Option<u16>) -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path, port_override)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// A port given on the command line wins over every other source.
    pub fn load_from(
        config_path: &str,
        port_override: Option<u16>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("logging.access_log", true)?;

        if let Some(port) = port_override {
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        builder.build()?.try_deserialize()
    }
}

/// Parse the optional positional port argument
pub fn parse_port_arg(arg: Option<&str>) -> Result<Option<u16>, ServeError> {
    match arg {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|_| ServeError::InvalidPort(raw.to_string())),
    }
}
