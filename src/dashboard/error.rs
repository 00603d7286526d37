//! Dashboard error types

use thiserror::Error;

use crate::tracker::TrackerError;

/// Errors raised while reconciling or rendering the dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A referenced visual container does not exist on the stage
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// Invalid room code or distribution
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
