use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelInvoker;
use crate::review::session_store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once in `main`; every submission shares the same client.
    pub llm: Arc<dyn ModelInvoker>,
    pub config: Config,
    pub sessions: SessionStore,
}
