// Resolved server settings
// Built once from `Config` at startup and shared read-only with every connection

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use super::types::{AccessLogFormat, Config};
use crate::error::ServeError;

/// Immutable runtime view of the configuration
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    /// Canonical absolute path of the served directory
    pub root: PathBuf,
    pub required_assets: Vec<String>,
    pub workers: Option<usize>,
    pub access_log: bool,
    pub access_log_format: AccessLogFormat,
}

impl ServerSettings {
    pub fn from_config(cfg: &Config) -> Result<Self, ServeError> {
        let ip: IpAddr = cfg
            .server
            .host
            .parse()
            .map_err(|_| ServeError::InvalidAddress(cfg.server.host.clone()))?;

        Ok(Self {
            addr: SocketAddr::new(ip, cfg.server.port),
            root: resolve_root(cfg.server.root.as_deref())?,
            required_assets: cfg.assets.required.clone(),
            workers: cfg.server.workers,
            access_log: cfg.logging.access_log,
            access_log_format: cfg.logging.access_log_format,
        })
    }

    /// Settings for a given root with logging disabled
    #[cfg(test)]
    pub fn for_root(root: &std::path::Path) -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            root: root.canonicalize().unwrap(),
            required_assets: Vec::new(),
            workers: None,
            access_log: false,
            access_log_format: AccessLogFormat::Compact,
        }
    }
}

/// Resolve the served directory to a canonical absolute path
///
/// Without an explicit setting the directory containing the running
/// executable is used.
pub fn resolve_root(configured: Option<&str>) -> Result<PathBuf, ServeError> {
    let candidate = match configured {
        Some(path) => PathBuf::from(path),
        None => executable_dir()?,
    };

    let root = candidate.canonicalize().map_err(|source| ServeError::Root {
        path: candidate.clone(),
        source,
    })?;

    if root.is_dir() {
        Ok(root)
    } else {
        Err(ServeError::Root {
            path: candidate,
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        })
    }
}

fn executable_dir() -> Result<PathBuf, ServeError> {
    let exe = std::env::current_exe()?;
    match exe.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Err(ServeError::Root {
            source: io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"),
            path: exe,
        }),
    }
}
