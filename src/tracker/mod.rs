//! Pet tracking
//!
//! Everything between raw sensor reports and the per-pet status shown on
//! the dashboard:
//!
//! - [`types`]: room codes, pets, time distributions
//! - [`report`]: sensor report and recording parsing
//! - [`hmm`]: forward-algorithm smoothing of room picks
//! - [`analyzer`]: strongest-signal pick, smoothing and time accounting
//! - [`state`]: shared latest-reports + analyzer state
//! - [`evaluation`]: offline accuracy evaluation over recordings

pub mod analyzer;
pub mod error;
pub mod evaluation;
pub mod hmm;
pub mod report;
pub mod state;
pub mod types;

pub use analyzer::{Analyzer, StepResult};
pub use error::{TrackerError, TrackerResult};
pub use evaluation::{evaluate, EvaluationReport, PetAccuracy, Trial};
pub use hmm::RoomModel;
pub use report::{parse_recording, read_recording, ReportSet, RssiReport};
pub use state::TrackerState;
pub use types::{
    PetId, PetStatus, RoomCode, RoomTimeDistribution, TrackerSnapshot, INDOOR_ROOMS, TOTAL_PETS,
};
