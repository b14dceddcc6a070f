use std::sync::Arc;

use glance_core::{FollowUpAnswerer, SummaryService};

use crate::config::Config;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub summaries: Arc<SummaryService>,
    pub answerer: Arc<FollowUpAnswerer>,
}

impl AppState {
    pub fn new(config: Config, summaries: SummaryService, answerer: FollowUpAnswerer) -> Self {
        Self {
            config: Arc::new(config),
            summaries: Arc::new(summaries),
            answerer: Arc::new(answerer),
        }
    }
}
