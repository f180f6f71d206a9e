pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod template;
pub mod validate;
pub mod webhook;

use axum::{Router, extract::DefaultBodyLimit, routing};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

use config::ConfigStore;
use dispatch::{Dispatcher, ProcessDispatcher};

/// Largest request body accepted; bigger bodies get 413 before the pipeline runs.
pub const MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// State shared by every request. Nothing in it is written after startup.
pub struct AppState {
    pub config: ConfigStore,
    pub dispatcher: Arc<dyn Dispatcher>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ConfigStore) -> Self {
        Self::with_dispatcher(config, Arc::new(ProcessDispatcher))
    }

    pub fn with_dispatcher(config: ConfigStore, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            config,
            dispatcher,
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<AppState>;

/// `GET /status`, and the webhook handler for POSTs on every other path.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/status", routing::get(api::status))
        .fallback(api::handle_webhook)
        .layer(DefaultBodyLimit::max(MAX_PAYLOAD_BYTES))
        .with_state(state)
}
