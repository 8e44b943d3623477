//! Application state management

use std::sync::Arc;

use crate::analysis::PhotoAnalyzer;
use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub config: Config,
    pub analyzer: PhotoAnalyzer,
}

impl AppState {
    /// Create a new application state around already-built clients
    pub fn new(config: Config, analyzer: PhotoAnalyzer) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, analyzer }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the photo analyzer
    pub fn analyzer(&self) -> &PhotoAnalyzer {
        &self.inner.analyzer
    }
}
