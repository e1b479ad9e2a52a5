//! Best-effort product analytics.
//!
//! Analytics is initialized only when the environment declares support for
//! it (`ANALYTICS_ENABLED=true` plus an endpoint). Initialization and delivery
//! failures are logged at debug level and otherwise ignored; they never affect
//! the request that produced the event.

use std::sync::Arc;
use std::time::Duration;

use mockview_core::types::{InterviewId, Timestamp, UserId};
use serde::Serialize;

/// HTTP timeout for a single event delivery.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

pub const EVENT_INTERVIEW_CREATED: &str = "interview_created";
pub const EVENT_INTERVIEW_UPDATED: &str = "interview_updated";

/// Analytics settings.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    /// Whether the deployment supports analytics at all.
    pub enabled: bool,
    /// Collector URL that accepts JSON events via POST.
    pub endpoint: Option<String>,
}

impl AnalyticsConfig {
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `ANALYTICS_ENABLED`  | `false` |
    /// | `ANALYTICS_ENDPOINT` | unset   |
    pub fn from_env() -> Self {
        let enabled = std::env::var("ANALYTICS_ENABLED")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let endpoint = std::env::var("ANALYTICS_ENDPOINT")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self { enabled, endpoint }
    }
}

/// A single analytics event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub name: &'static str,
    pub user_id: UserId,
    pub interview_id: Option<InterviewId>,
    pub timestamp: Timestamp,
}

impl AnalyticsEvent {
    pub fn new(name: &'static str, user_id: &str, interview_id: Option<&str>) -> Self {
        Self {
            name,
            user_id: user_id.to_string(),
            interview_id: interview_id.map(str::to_string),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Fire-and-forget event sender.
pub struct Analytics {
    client: reqwest::Client,
    endpoint: String,
}

impl Analytics {
    /// Initialize analytics if supported. Returns `None` when disabled,
    /// unconfigured, or when the HTTP client cannot be built.
    pub fn try_init(config: &AnalyticsConfig) -> Option<Arc<Self>> {
        if !config.enabled {
            tracing::debug!("Analytics not supported in this environment");
            return None;
        }
        let Some(endpoint) = config.endpoint.clone() else {
            tracing::debug!("Analytics enabled but ANALYTICS_ENDPOINT is not set");
            return None;
        };

        match reqwest::Client::builder().timeout(DELIVERY_TIMEOUT).build() {
            Ok(client) => {
                tracing::info!(%endpoint, "Analytics initialized");
                Some(Arc::new(Self { client, endpoint }))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Analytics initialization failed");
                None
            }
        }
    }

    /// Queue `event` for delivery on a background task.
    pub fn track(self: &Arc<Self>, event: AnalyticsEvent) {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.send(&event).await {
                tracing::debug!(event = event.name, error = %e, "Analytics delivery failed");
            }
        });
    }

    /// Deliver `event` now.
    pub async fn send(&self, event: &AnalyticsEvent) -> Result<(), reqwest::Error> {
        self.client
            .post(&self.endpoint)
            .json(event)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Track `event` when analytics is available; no-op otherwise.
pub fn track(analytics: Option<&Arc<Analytics>>, event: AnalyticsEvent) {
    if let Some(analytics) = analytics {
        analytics.track(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_yields_no_client() {
        assert!(Analytics::try_init(&AnalyticsConfig::default()).is_none());
    }

    #[test]
    fn enabled_without_endpoint_yields_no_client() {
        let config = AnalyticsConfig {
            enabled: true,
            endpoint: None,
        };
        assert!(Analytics::try_init(&config).is_none());
    }

    #[test]
    fn enabled_with_endpoint_initializes() {
        let config = AnalyticsConfig {
            enabled: true,
            endpoint: Some("http://127.0.0.1:9/collect".into()),
        };
        assert!(Analytics::try_init(&config).is_some());
    }

    #[tokio::test]
    async fn delivery_failure_is_an_error_not_a_panic() {
        let analytics = Analytics::try_init(&AnalyticsConfig {
            enabled: true,
            endpoint: Some("http://127.0.0.1:9/collect".into()),
        })
        .unwrap();
        let event = AnalyticsEvent::new(EVENT_INTERVIEW_CREATED, "user_1", Some("doc_1"));
        assert!(analytics.send(&event).await.is_err());
    }

    #[test]
    fn event_serializes_name_and_ids() {
        let event = AnalyticsEvent::new(EVENT_INTERVIEW_UPDATED, "user_1", Some("doc_1"));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["name"], "interview_updated");
        assert_eq!(value["userId"], "user_1");
        assert_eq!(value["interviewId"], "doc_1");
        assert!(value["timestamp"].is_string());
        assert!(value.get("user_id").is_none());
    }
}
