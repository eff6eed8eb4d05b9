pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod usecases;

use std::sync::Arc;
use tracing::{info, warn};

use repository::{EventRepository, InMemoryEventRepository, PgEventRepository};
use services::partner::{DefaultPartnerFactory, PartnerFactory};

// Shared state for the whole application
pub struct AppState {
    pub repo: Arc<dyn EventRepository>,
    pub partners: Arc<dyn PartnerFactory>,
    pub db: Option<database::Database>,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let partners = DefaultPartnerFactory::new(&config.partners, &config.circuit_breaker)?;
        info!(partners = ?partners.registered_ids(), "Partners ready");

        let (repo, db) = match &config.database.url {
            Some(url) => {
                let db = database::Database::new(url, config.database.pool_size).await?;
                info!("Database connected");
                db.run_migrations().await?;
                let repo: Arc<dyn EventRepository> = Arc::new(PgEventRepository::new(db.clone()));
                (repo, Some(db))
            }
            None => {
                warn!("DATABASE_URL is not set, keeping data in memory");
                let repo: Arc<dyn EventRepository> = Arc::new(InMemoryEventRepository::new());
                (repo, None)
            }
        };

        Ok(Arc::new(Self {
            repo,
            partners: Arc::new(partners),
            db,
            config,
        }))
    }

    /// Assembles state from ready-made collaborators, without a database.
    pub fn with_parts(
        repo: Arc<dyn EventRepository>,
        partners: Arc<dyn PartnerFactory>,
        config: config::Config,
    ) -> Arc<Self> {
        Arc::new(Self {
            repo,
            partners,
            db: None,
            config,
        })
    }
}
