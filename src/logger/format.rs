//! Access log format module
//!
//! Supports three layouts:
//! - `compact` (status icon, code and path)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)

use chrono::Local;
use std::net::SocketAddr;

use crate::config::AccessLogFormat;

/// Marker shown in front of each compact access line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Ok,
    NotFound,
    Info,
}

impl StatusIcon {
    pub const fn for_status(status: u16) -> Self {
        match status {
            200 => Self::Ok,
            404 => Self::NotFound,
            _ => Self::Info,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::NotFound => "✗",
            Self::Info => "ℹ",
        }
    }
}

/// Access log entry containing request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: SocketAddr,
    pub time: chrono::DateTime<Local>,
    pub method: String,
    /// Request target as sent by the client (path and query)
    pub path: String,
    pub status: u16,
    pub body_bytes: u64,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: SocketAddr, method: String, path: String, status: u16) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            status,
            body_bytes: 0,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Compact => self.format_compact(),
            AccessLogFormat::Common => self.format_common(),
            AccessLogFormat::Json => self.format_json(),
        }
    }

    fn format_compact(&self) -> String {
        format!(
            "  {} [{}] {}",
            StatusIcon::for_status(self.status).symbol(),
            self.status,
            self.path
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
            self.remote_addr.ip(),
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr.ip().to_string(),
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "status": self.status,
            "icon": StatusIcon::for_status(self.status).symbol(),
            "body_bytes": self.body_bytes,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }
}
