//! Catalog Server: storefront product/variant catalog service
//!
//! # Architecture
//!
//! - **Catalog** (`catalog`): pricing resolution, variant matching, the
//!   product/variant write lifecycle and multipart form decoding
//! - **Database** (`db`): embedded SQLite storage (sqlx)
//! - **Media** (`media`): filesystem media store behind a public URL prefix
//! - **HTTP API** (`api`): RESTful endpoints
//!
//! # Module structure
//!
//! ```text
//! catalog-server/src/
//! ├── core/          # config, state, server
//! ├── catalog/       # domain logic
//! ├── media/         # media byte storage
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # database layer
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod db;
pub mod media;
pub mod utils;

pub use catalog::{CatalogService, ProductWithVariants};
pub use core::{Config, Server, ServerState};
pub use media::MediaStore;
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{AppError, AppResult};

/// Initialize logging from the loaded configuration. Called once at
/// process start, after `.env` has been read.
pub fn setup_environment(config: &Config) {
    if config.is_production() {
        let log_dir = config.log_dir();
        let _ = std::fs::create_dir_all(&log_dir);
        init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    } else {
        init_logger_with_file(Some(&config.log_level), None);
    }
}
