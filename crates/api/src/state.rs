use std::sync::Arc;

use mockview_core::authoring::Authoring;
use mockview_core::store::InterviewStore;

use crate::analytics::Analytics;
use crate::config::ServerConfig;
use crate::services::Services;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (token settings, limits).
    pub config: Arc<ServerConfig>,
    /// Interview document store, for reads.
    pub store: Arc<dyn InterviewStore>,
    /// Authoring flow; owns the per-form in-flight tracking.
    pub authoring: Arc<Authoring>,
    /// Best-effort analytics, absent when unsupported.
    pub analytics: Option<Arc<Analytics>>,
}

impl AppState {
    pub fn new(config: ServerConfig, services: Services) -> Self {
        let authoring = Authoring::new(Arc::clone(&services.store), services.generator)
            .with_question_count(config.question_count);

        Self {
            config: Arc::new(config),
            store: services.store,
            authoring: Arc::new(authoring),
            analytics: services.analytics,
        }
    }
}
