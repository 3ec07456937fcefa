// Keyboard input handling.
//
// Translates crossterm key events into either a UserCommand for the app loop
// (quit) or local ViewState mutations (panel focus, scrolling).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use lolwatch_core::protocol::UserCommand;

use super::ViewState;

/// Lines moved by PageUp/PageDown.
pub const PAGE_SCROLL: u16 = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app loop. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both Press and Release; only act on Press.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(UserCommand::Quit),
        KeyCode::Tab => {
            view_state.focused = view_state.focused.next();
            None
        }
        KeyCode::BackTab => {
            view_state.focused = view_state.focused.prev();
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_by(view_state, 1);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            scroll_by(view_state, -1);
            None
        }
        KeyCode::PageDown => {
            scroll_by(view_state, i32::from(PAGE_SCROLL));
            None
        }
        KeyCode::PageUp => {
            scroll_by(view_state, -i32::from(PAGE_SCROLL));
            None
        }
        KeyCode::Home | KeyCode::Char('g') => {
            view_state.scroll_offset[view_state.focused.index()] = 0;
            None
        }
        _ => None,
    }
}

/// Scroll the focused panel by `delta` lines, clamped to its content.
fn scroll_by(view_state: &mut ViewState, delta: i32) {
    let region = view_state.focused;
    let max = i32::from(view_state.max_scroll(region));
    let current = i32::from(view_state.scroll(region));
    let next = (current + delta).clamp(0, max);
    // `next` is within 0..=u16::MAX because `max` came from a u16.
    view_state.scroll_offset[region.index()] = next as u16;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
