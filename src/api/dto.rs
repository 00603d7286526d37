//! Data Transfer Objects
//!
//! Response types for the API endpoints.

use serde::Serialize;

use crate::tracker::TrackerSnapshot;

/// GET /api/v1/status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub snapshot: TrackerSnapshot,
    /// Page reload interval the dashboard uses
    pub refresh_secs: u64,
}

/// Full health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, waiting
    pub status: String,
    /// Number of configured room sensors
    pub sensors: usize,
    /// Analysis steps run so far
    pub total_time: u64,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
