//! Logger module
//!
//! Provides logging utilities for the dev server including:
//! - Startup and shutdown messages
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{AccessLogFormat, LoggingConfig};
use crate::error::ServeError;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_info(message: &str) {
    write_info(message);
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_connection_error(err: &hyper::Error) {
    // Clients dropping a keep-alive connection is routine for browsers
    if err.is_incomplete_message() {
        return;
    }
    write_error(&format!("[ERROR] Failed to serve connection: {err}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    write_info(&entry.format(format));
}

pub fn log_shutdown() {
    write_info("\n\n⏹️  Server stopped.");
    write_info("👋 Goodbye!");
}

/// Report a fatal startup error with remediation hints where we have them
pub fn log_startup_error(err: &ServeError) {
    match err {
        ServeError::InvalidPort(value) => {
            write_error(&format!("❌ Invalid port: {value}"));
        }
        ServeError::AddrInUse { port } => {
            let next = port.checked_add(1).unwrap_or(8081);
            write_error(&format!("❌ Port {port} is already in use."));
            write_error("   Alternatives:");
            write_error("   • Close the application that is using it");
            write_error(&format!("   • Or try: wasm-devserver {next}"));
        }
        other => {
            write_error(&format!("[ERROR] {other}"));
            let mut source = std::error::Error::source(other);
            while let Some(cause) = source {
                write_error(&format!("  caused by: {cause}"));
                source = cause.source();
            }
        }
    }
}
