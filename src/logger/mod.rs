//! Logging for the server: lifecycle notices, errors, and optional access
//! lines.
//!
//! The default configuration prints exactly the startup line and the
//! shutdown notices; everything else only appears when access logging is
//! switched on or something goes wrong.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;

/// Install the log writer from configuration. Called once at startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// The startup announcement: where the server can be reached.
pub fn log_server_start(url: &str) {
    write_info(&format!("Serving at {url}"));
}

/// Printed when the shutdown signal is observed.
pub fn log_shutdown_begin() {
    write_info("\nShutting down server...");
}

/// Printed after the listener has been released, just before exit.
pub fn log_server_stopped() {
    write_info("Server stopped.");
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// A browser could not be opened; the server keeps running.
pub fn log_browser_error(err: &std::io::Error) {
    log_warning(&format!(
        "Could not open browser: {err}. Open the URL above manually."
    ));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

/// A request tried to reach outside the serving root via a symlink.
pub fn log_blocked_traversal(requested: &str, resolved: &std::path::Path) {
    log_warning(&format!(
        "Blocked path escaping the serving root: {requested} -> {}",
        resolved.display()
    ));
}

/// Emit one formatted access log line.
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    match writer::get() {
        Some(w) => w.write_access(&entry.format(format)),
        None => println!("{}", entry.format(format)),
    }
}
