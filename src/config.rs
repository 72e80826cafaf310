//! Configuration and resolved server state.
//!
//! Everything has a default; the server runs with no config file, no
//! environment variables, and no flags. An optional `config.toml` next to
//! the working directory or `TABSERVE__*` environment variables can
//! override the defaults.

use serde::Deserialize;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub browser: BrowserConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Bind host; all interfaces by default.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Serving root. Unset means the directory containing the executable.
    pub root: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    /// Open a browser tab at the advertised URL on startup.
    pub open: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit one log line per request.
    pub access_log: bool,
    /// Access line format: combined, common, or json.
    pub access_log_format: String,
    /// Access log file; stdout when unset.
    pub access_log_file: Option<String>,
    /// Error log file; stderr when unset.
    pub error_log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                root: None,
            },
            browser: BrowserConfig { open: true },
            logging: LoggingConfig {
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from the default `config` file name (if present),
    /// the environment, and built-in defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific file path (without extension).
    /// The file is optional; missing keys fall back to the defaults above.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("TABSERVE").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("browser.open", true)?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "combined")?
            .build()?;

        settings.try_deserialize()
    }

    /// The address the listener binds.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// The URL announced at startup and opened in the browser. Always
    /// `localhost`, whatever interface the listener binds.
    pub fn advertised_url(&self) -> String {
        format!("http://localhost:{}/", self.server.port)
    }

    /// Resolve the serving root: the configured directory, or the directory
    /// containing the running executable when none is configured.
    pub fn resolve_root(&self) -> io::Result<PathBuf> {
        let root = match &self.server.root {
            Some(path) => PathBuf::from(path),
            None => {
                let exe = std::env::current_exe()?;
                exe.parent().map(Path::to_path_buf).ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        "executable has no parent directory",
                    )
                })?
            }
        };
        root.canonicalize()
    }
}

/// Resolved state shared by the serve loop and the request handler.
///
/// The serving root is canonicalized exactly once, here; the process
/// working directory is never touched, so several servers with different
/// roots can coexist in one process (which the tests rely on).
pub struct ServerState {
    pub config: Config,
    pub root: PathBuf,
}

impl ServerState {
    /// State with the root taken from the configuration.
    pub fn new(config: &Config) -> io::Result<Self> {
        let root = config.resolve_root()?;
        Ok(Self {
            config: config.clone(),
            root,
        })
    }

    /// State serving an explicit root directory.
    pub fn with_root(config: &Config, root: &Path) -> io::Result<Self> {
        Ok(Self {
            config: config.clone(),
            root: root.canonicalize()?,
        })
    }
}
