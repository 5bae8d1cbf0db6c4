use std::sync::Arc;

use resume_parser::ResumeParser;

use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Stateless and `Send + Sync`; one instance serves every request.
    pub parser: Arc<ResumeParser>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let parser = Arc::new(ResumeParser::new(config.parser.clone()));
        AppState { config, parser }
    }
}
