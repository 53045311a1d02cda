//! TIANQI core library.
//! Data snapshot, loader, section renderers, tooltip registry and chart adapter for the dashboard.

pub mod chart;
pub mod config;
pub mod loader;
pub mod model;
pub mod page;
pub mod render;
pub mod theme;
pub mod tooltip;
pub mod view;

pub use chart::{chart_specs, ChartSpec};
pub use config::DashboardConfig;
pub use loader::{load_from_candidates, load_snapshot, source_for, DirSource, DocumentSource, HttpSource, LoadError};
pub use model::Snapshot;
pub use page::{failure_message, render_failure_page, render_page};
pub use theme::Theme;
pub use tooltip::{HoverRecord, TooltipContent, TooltipPanel, TooltipRegistry};
pub use view::{Fragment, Layout, Section, ViewState};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
