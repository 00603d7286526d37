//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::dashboard::DEFAULT_REFRESH_SECS;
use crate::tracker::TrackerState;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Latest reports and analysis, written by the ingest listener
    pub tracker: Arc<TrackerState>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(tracker: Arc<TrackerState>, config: ApiConfig) -> Self {
        Self {
            tracker,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Dashboard reload interval in seconds
    pub refresh_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
            refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

impl ApiConfig {
    /// Build from the loaded configuration file
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            host: config.api.host.clone(),
            port: config.api.port,
            refresh_secs: config.dashboard.refresh_secs,
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
