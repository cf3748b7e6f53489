use std::sync::Arc;

use sqlx::SqlitePool;
use tera::Tera;

use crate::api::templates;
use crate::auth::JwtService;
use crate::core::Config;
use crate::core::bootstrap;
use crate::db::DbService;
use crate::utils::AppError;

/// Server state, shared by every request
///
/// Cloning is cheap: the pool and the services are reference counted.
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Arc<Config> | configuration (immutable) |
/// | db | DbService | SQLite pool |
/// | jwt_service | Arc<JwtService> | token signing |
/// | templates | Arc<Tera> | compiled HTML pages |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub templates: Arc<Tera>,
}

impl ServerState {
    pub fn new(config: Config, db: DbService) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let templates = templates::load()
            .map_err(|e| AppError::internal(format!("Failed to compile templates: {e}")))?;
        Ok(Self {
            config: Arc::new(config),
            db,
            jwt_service,
            templates: Arc::new(templates),
        })
    }

    /// Open the database, apply migrations and create the bootstrap data
    pub async fn initialize(config: Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_url).await?;
        bootstrap::ensure_groups(&db.pool, &config.groups).await?;
        if let Some(admin) = &config.admin {
            bootstrap::ensure_admin(&db.pool, admin).await?;
        }
        Self::new(config, db)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn templates(&self) -> &Tera {
        &self.templates
    }
}
