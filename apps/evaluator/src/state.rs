use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::requester::CandidateEvaluator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend. Default: `LlmEvaluator` over the chat-completions client.
    pub evaluator: Arc<dyn CandidateEvaluator>,
    pub config: Config,
}
