//! One-time construction of the external collaborator clients.
//!
//! [`Services::init`] is called exactly once, from `main`, and its result is
//! moved into [`AppState`](crate::state::AppState). Nothing else constructs
//! store, generator or analytics clients; handlers receive them through state.

use std::sync::Arc;

use anyhow::Context;
use mockview_core::generator::TextGenerator;
use mockview_core::store::InterviewStore;
use mockview_db::{MemoryInterviewStore, PgInterviewStore};
use mockview_gemini::{GeminiClient, GeminiConfig};

use crate::analytics::{Analytics, AnalyticsConfig};

/// Which document-store implementation to run against.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

impl StoreBackend {
    /// | Env Var         | Default    |
    /// |-----------------|------------|
    /// | `STORE_BACKEND` | `postgres` |
    /// | `DATABASE_URL`  | required for `postgres` |
    ///
    /// # Panics
    ///
    /// Panics on an unknown backend name or a missing `DATABASE_URL`.
    pub fn from_env() -> Self {
        let backend = std::env::var("STORE_BACKEND").unwrap_or_else(|_| "postgres".into());
        match backend.trim().to_ascii_lowercase().as_str() {
            "postgres" => StoreBackend::Postgres {
                database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            },
            "memory" => StoreBackend::Memory,
            other => panic!("Unknown STORE_BACKEND '{other}' (expected 'postgres' or 'memory')"),
        }
    }
}

/// Settings for every collaborator client.
#[derive(Debug, Clone)]
pub struct ServicesConfig {
    pub store: StoreBackend,
    pub gemini: GeminiConfig,
    pub analytics: AnalyticsConfig,
}

impl ServicesConfig {
    pub fn from_env() -> Self {
        Self {
            store: StoreBackend::from_env(),
            gemini: GeminiConfig::from_env(),
            analytics: AnalyticsConfig::from_env(),
        }
    }
}

/// Shared, read-only collaborator handles.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn InterviewStore>,
    pub generator: Arc<dyn TextGenerator>,
    /// `None` when analytics is unsupported or failed to initialize.
    pub analytics: Option<Arc<Analytics>>,
}

impl Services {
    /// Connect every collaborator. Store failures are fatal; analytics
    /// failures are not.
    pub async fn init(config: &ServicesConfig) -> anyhow::Result<Self> {
        let store = connect_store(&config.store).await?;

        let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(config.gemini.clone()));
        tracing::info!(model = %config.gemini.model, "Gemini generator configured");

        let analytics = Analytics::try_init(&config.analytics);

        Ok(Self {
            store,
            generator,
            analytics,
        })
    }
}

async fn connect_store(backend: &StoreBackend) -> anyhow::Result<Arc<dyn InterviewStore>> {
    match backend {
        StoreBackend::Postgres { database_url } => {
            let pool = mockview_db::create_pool(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            mockview_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");

            mockview_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgInterviewStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory interview store; data is lost on restart");
            Ok(Arc::new(MemoryInterviewStore::new()))
        }
    }
}
