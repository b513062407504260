//! # rmon-tui
//!
//! Terminal front end for research-monitor.
//!
//! The engine in `rmon-core` draws through the [`ViewPort`] trait; this
//! crate implements it with [`TuiView`] and renders that state with
//! ratatui. [`run_app`] owns the terminal and the event loop.
//!
//! [`ViewPort`]: rmon_core::ViewPort

pub mod app;
pub mod event;
pub mod event_handler;
pub mod markdown;
pub mod tui;
pub mod view;
pub mod widgets;

pub use app::App;
pub use markdown::TerminalRenderer;
pub use tui::Tui;
pub use view::TuiView;

use rmon_core::config::AppConfig;
use rmon_core::Monitor;

/// Run the terminal UI until the user quits.
pub async fn run_app(config: &AppConfig) -> anyhow::Result<()> {
    let monitor = Monitor::new(config, TuiView::new(), Box::new(TerminalRenderer))?;
    let mut app = App::new(monitor);

    let mut tui = Tui::init()?;
    let result = app.run(&mut tui).await;
    tui.restore()?;
    result
}
