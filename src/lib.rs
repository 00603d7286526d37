//! # Pettrack
//!
//! Home pet tracker. Room sensors report the Bluetooth signal strength of
//! each pet's tag; the server works out which room every pet is in, keeps a
//! tally of time spent per room, and serves a floor-plan dashboard.
//!
//! ## Modules
//!
//! - [`tracker`]: room codes, report parsing, HMM smoothing, time accounting
//! - [`dashboard`]: room layout reconciler, pie charts, status page
//! - [`ingest`]: TCP listener for room sensor reports
//! - [`api`]: HTTP server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use pettrack::dashboard::{Document, LayoutState, Reconciler, Stage};
//! use pettrack::tracker::{PetId, RoomCode};
//!
//! let mut doc = Document::with_pets();
//! let mut reconciler = Reconciler::new();
//!
//! reconciler.set_pet_room(&mut doc, PetId::Pet0, RoomCode::LivingRoom).unwrap();
//! assert_eq!(reconciler.layout(), LayoutState::SidePairing);
//!
//! reconciler.set_pet_room(&mut doc, PetId::Pet1, RoomCode::LivingRoom).unwrap();
//! assert!(doc.element("pet0").unwrap().contains("middle"));
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod ingest;
pub mod tracker;

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};

pub use dashboard::{
    render_dashboard, render_pie_chart, ClassList, DashboardError, Document, LayoutState,
    PieChart, Reconciler, Stage,
};

pub use tracker::{
    Analyzer, PetId, PetStatus, RoomCode, RoomTimeDistribution, RssiReport, TrackerError,
    TrackerSnapshot, TrackerState,
};
