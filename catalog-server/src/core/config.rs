use std::path::{Path, PathBuf};

/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Working directory (database, media, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | DEFAULT_CURRENCY | EUR | Currency used when a request names none |
/// | MEDIA_PUBLIC_PREFIX | /media | Public URL prefix for stored media |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_LEVEL | info | Log level when RUST_LOG is unset |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/var/lib/catalog HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding database, media and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Currency assumed when the request does not specify one
    pub default_currency: String,
    /// URL prefix under which stored media is served
    pub media_public_prefix: String,
    /// development | staging | production
    pub environment: String,
    /// Default log level
    pub log_level: String,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            default_currency: std::env::var("DEFAULT_CURRENCY").unwrap_or_else(|_| "EUR".into()),
            media_public_prefix: std::env::var("MEDIA_PUBLIC_PREFIX")
                .unwrap_or_else(|_| "/media".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    /// Override the directory and port. Used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn database_path(&self) -> PathBuf {
        Path::new(&self.work_dir).join("database").join("catalog.db")
    }

    pub fn media_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("media")
    }

    pub fn log_dir(&self) -> PathBuf {
        Path::new(&self.work_dir).join("logs")
    }

    /// Make sure the working directory skeleton exists.
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(Path::new(&self.work_dir).join("database"))?;
        std::fs::create_dir_all(self.media_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
