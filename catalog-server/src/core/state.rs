use crate::catalog::CatalogService;
use crate::core::Config;
use crate::db::DbService;
use crate::media::MediaStore;
use crate::utils::AppError;

/// Server state: shared, clone-cheap handle to every service.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite database service
    pub db: DbService,
    /// Filesystem media store
    pub media: MediaStore,
    /// Product/variant catalog service
    pub catalog: CatalogService,
}

impl ServerState {
    /// Initialize the working directory, database and services.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        let media = MediaStore::new(config.media_dir(), config.media_public_prefix.clone());
        let catalog = CatalogService::new(
            db.pool.clone(),
            media.clone(),
            config.default_currency.clone(),
        );

        Ok(Self {
            config: config.clone(),
            db,
            media,
            catalog,
        })
    }
}
