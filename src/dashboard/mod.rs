//! Dashboard rendering
//!
//! - [`layout`]: room layout reconciler (position and layout classes)
//! - [`chart`]: per-pet pie chart of time spent per room
//! - [`page`]: the auto-refreshing status page

pub mod chart;
pub mod error;
pub mod layout;
pub mod page;

pub use chart::{render_pie_chart, PieChart, Segment};
pub use error::{DashboardError, DashboardResult};
pub use layout::{ClassList, Document, LayoutState, Reconciler, Stage};
pub use page::{render_dashboard, DEFAULT_REFRESH_SECS, FLOOR_PLAN_PATH, FLOOR_PLAN_SVG};
