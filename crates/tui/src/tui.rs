//! Terminal setup and the merged input/redraw event stream.
//!
//! [`Tui`] puts the terminal in raw mode on the alternate screen and
//! restores it on drop (or panic). Redraws are requested through a
//! [`FrameRequester`]; requests that pile up between two frames are
//! coalesced into one draw.

use anyhow::Result;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyEvent;
use crossterm::execute;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::stdout;
use std::io::Stdout;
use std::pin::Pin;
use tokio::select;
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::StreamExt;

pub type TerminalBackend = CrosstermBackend<Stdout>;

/// Events coming out of [`Tui::event_stream`].
#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    /// Bracketed paste; inserted into the query field as-is.
    Paste(String),
    /// A redraw was requested or the terminal was resized.
    Draw,
}

pub struct Tui {
    terminal: Terminal<TerminalBackend>,
    frame_tx: mpsc::UnboundedSender<()>,
    frame_rx: Option<mpsc::UnboundedReceiver<()>>,
}

impl Tui {
    /// Enter raw mode and the alternate screen.
    pub fn init() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnableBracketedPaste, EnterAlternateScreen)?;
        set_panic_hook();

        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            frame_tx,
            frame_rx: Some(frame_rx),
        })
    }

    /// Leave raw mode and the alternate screen. Safe to call twice.
    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    pub fn frame_requester(&self) -> FrameRequester {
        FrameRequester {
            frame_tx: self.frame_tx.clone(),
        }
    }

    /// Keyboard, paste and redraw events as one stream.
    ///
    /// The redraw side can only be taken once; later calls yield input
    /// events only.
    pub fn event_stream(&mut self) -> Pin<Box<dyn Stream<Item = TuiEvent> + Send + 'static>> {
        let mut terminal_events = EventStream::new();
        let mut frame_rx = self.frame_rx.take();

        let stream = async_stream::stream! {
            loop {
                select! {
                    Some(Ok(event)) = terminal_events.next() => {
                        match event {
                            Event::Key(key) => yield TuiEvent::Key(key),
                            Event::Paste(text) => yield TuiEvent::Paste(text),
                            Event::Resize(_, _) => yield TuiEvent::Draw,
                            _ => {}
                        }
                    }
                    Some(()) = next_frame_request(&mut frame_rx) => {
                        if let Some(rx) = frame_rx.as_mut() {
                            while rx.try_recv().is_ok() {}
                        }
                        yield TuiEvent::Draw;
                    }
                    else => break,
                }
            }
        };

        Box::pin(stream)
    }

    pub fn draw<F>(&mut self, render: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

async fn next_frame_request(rx: &mut Option<mpsc::UnboundedReceiver<()>>) -> Option<()> {
    match rx.as_mut() {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Cloneable handle that asks for a redraw.
#[derive(Clone, Debug)]
pub struct FrameRequester {
    frame_tx: mpsc::UnboundedSender<()>,
}

impl FrameRequester {
    pub fn schedule_frame(&self) {
        let _ = self.frame_tx.send(());
    }
}

fn set_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_frame_requests_arrive() {
        let (frame_tx, rx) = mpsc::unbounded_channel();
        let requester = FrameRequester { frame_tx };
        let mut rx = Some(rx);

        requester.schedule_frame();
        requester.clone().schedule_frame();

        assert_eq!(next_frame_request(&mut rx).await, Some(()));
        assert_eq!(next_frame_request(&mut rx).await, Some(()));
    }
}
