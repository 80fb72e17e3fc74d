use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use promise_api::{
    config::AppConfig,
    events::{self, EventSender},
    seed,
    services::promising::{PromisingPolicy, PromisingService},
    AppState,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Configuration suitable for tests.
pub fn test_config() -> AppConfig {
    AppConfig::new("127.0.0.1".to_string(), 18_080, "test".to_string())
}

/// Helper harness for exercising the promising API over its demo supply
/// positions.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a test application with default configuration.
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Construct a test application with a caller-tuned configuration.
    pub async fn with_config(cfg: AppConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let promising_service =
            PromisingService::new(PromisingPolicy::from_config(&cfg), event_sender.clone());

        let state = AppState {
            config: cfg,
            event_sender,
            promising_service,
            seed_contexts: Arc::new(seed::demo_contexts()),
        };

        let router = Router::new()
            .nest("/api/v1", promise_api::api_v1_routes())
            .nest("/health", promise_api::health::health_routes())
            .layer(axum::middleware::from_fn(
                promise_api::middleware_helpers::request_id::request_id_middleware,
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    /// Send a request with extra headers.
    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}
