//! TUI application state and event loop.
//!
//! [`App`] owns the [`Monitor`] and multiplexes its signals with terminal
//! input in a single `tokio::select!` loop.

use anyhow::Result;
use crossterm::event::KeyEvent;
use rmon_core::Monitor;
use tokio::select;
use tokio_stream::StreamExt;

use crate::event_handler::{self, KeyAction};
use crate::tui::{Tui, TuiEvent};
use crate::view::TuiView;

pub struct App {
    monitor: Monitor<TuiView>,
    /// Set when the user asks to quit.
    pub should_exit: bool,
}

impl App {
    pub fn new(monitor: Monitor<TuiView>) -> Self {
        Self {
            monitor,
            should_exit: false,
        }
    }

    pub fn view(&self) -> &TuiView {
        self.monitor.coordinator().view()
    }

    fn view_mut(&mut self) -> &mut TuiView {
        self.monitor.coordinator_mut().view_mut()
    }

    pub fn monitor(&self) -> &Monitor<TuiView> {
        &self.monitor
    }

    /// Main event loop.
    ///
    /// Connects first, then redraws after every monitor signal and key press.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();
        let frames = tui.frame_requester();

        self.monitor.start().await;
        frames.schedule_frame();

        while !self.should_exit {
            select! {
                signal = self.monitor.next_signal() => {
                    self.monitor.handle_signal(signal).await;
                    frames.schedule_frame();
                }
                Some(tui_event) = tui_events.next() => {
                    match tui_event {
                        TuiEvent::Key(key) => {
                            self.handle_key_event(key).await;
                            frames.schedule_frame();
                        }
                        TuiEvent::Paste(text) => {
                            if self.view().submission_enabled() {
                                self.view_mut().input.insert_str(&text);
                                frames.schedule_frame();
                            }
                        }
                        TuiEvent::Draw => {
                            tui.draw(|frame| self.view().render(frame))?;
                        }
                    }
                }
            }
        }

        tracing::info!("monitor exiting");
        Ok(())
    }

    async fn handle_key_event(&mut self, key: KeyEvent) {
        match event_handler::handle_key_event(key, self.view_mut()) {
            KeyAction::None => {}
            KeyAction::Quit => self.should_exit = true,
            KeyAction::Submit => {
                let input = self.view().input.input().to_string();
                let outcome = self.monitor.submit(&input);
                tracing::debug!(?outcome, "query submitted");
            }
            KeyAction::Reconnect => {
                if !self.monitor.connection().is_open() {
                    self.monitor.reconnect().await;
                }
            }
        }
    }
}
