//! Keyboard handling.
//!
//! Global shortcuts are matched first; anything left over goes to the
//! query input. The returned [`KeyAction`] tells the app what to do with
//! the monitor.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::view::TuiView;

/// Lines moved per PageUp/PageDown in the report panel.
const REPORT_PAGE: u16 = 10;

/// What the app should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    /// Submit the current query input.
    Submit,
    Reconnect,
}

/// Apply a key event to the view and return the follow-up action.
///
/// Any key press dismisses a pending notice.
pub fn handle_key_event(key: KeyEvent, view: &mut TuiView) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }
    view.dismiss_notice();

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('r') if ctrl => KeyAction::Reconnect,
        KeyCode::Enter if view.submission_enabled() => KeyAction::Submit,
        KeyCode::Enter => KeyAction::None,
        KeyCode::Up => {
            view.scroll_log_up(1);
            KeyAction::None
        }
        KeyCode::Down => {
            view.scroll_log_down(1);
            KeyAction::None
        }
        KeyCode::PageUp => {
            view.scroll_report_up(REPORT_PAGE);
            KeyAction::None
        }
        KeyCode::PageDown => {
            view.scroll_report_down(REPORT_PAGE);
            KeyAction::None
        }
        _ => {
            if view.submission_enabled() {
                view.input.handle_key_event(key);
            }
            KeyAction::None
        }
    }
}
