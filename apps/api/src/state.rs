use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::retrieval::RoleLibrary;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Every evaluator, cleaner and reader call goes through this generator.
    pub llm: Arc<dyn TextGenerator>,
    pub roles: Arc<RoleLibrary>,
    pub config: Config,
}
