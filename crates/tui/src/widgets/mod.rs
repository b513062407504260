//! TUI widgets.
//!
//! Each widget renders one region of the monitor from [`TuiView`] state.
//!
//! [`TuiView`]: crate::view::TuiView

pub mod graph_view;
pub mod log_view;
pub mod query_input;
pub mod report_view;
pub mod status_bar;

pub use log_view::LogView;
pub use query_input::QueryInput;
