//! Keyboard handling: navigation plus per-tool action routing.

use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Focus};
use crate::session::ToolKind;
use crate::tools::ToolAction;

/// Action returned from key handling
pub(crate) enum KeyAction {
    Continue,
    Quit,
}

pub(crate) fn handle_key_event(app: &mut App, key: KeyEvent, now: Instant) -> Result<KeyAction> {
    // Ctrl-q quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
        return Ok(KeyAction::Quit);
    }

    match app.focus {
        Focus::Dashboard => handle_dashboard_key(app, key, now),
        Focus::Tool => handle_tool_key(app, key, now),
    }

    Ok(KeyAction::Continue)
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.select_next_card(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev_card(),
        KeyCode::Enter => app.open_selected(now),
        KeyCode::Char(']') => app.cycle_session(1),
        KeyCode::Char('[') => app.cycle_session(-1),
        KeyCode::Char('x') => app.close_focused(now),
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab => {
            if app.focused_session.is_some() {
                app.focus = Focus::Tool;
            }
        }
        _ => {}
    }
}

fn handle_tool_key(app: &mut App, key: KeyEvent, now: Instant) {
    // Session-level keys first; everything else routes to the tool.
    match key.code {
        KeyCode::Esc => {
            app.focus = Focus::Dashboard;
            return;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.close_focused(now);
            return;
        }
        KeyCode::Char(']') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.cycle_session(1);
            return;
        }
        _ => {}
    }

    let Some(kind) = app.focused_kind() else {
        app.focus = Focus::Dashboard;
        return;
    };

    if let Some(action) = action_for(kind, key) {
        app.dispatch(action, now);
    }
}

/// Translate a key into the focused tool's action, if any.
fn action_for(kind: ToolKind, key: KeyEvent) -> Option<ToolAction> {
    // Ctrl-y copies the current result where a tool has one.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('y') => Some(ToolAction::Copy),
            _ => None,
        };
    }

    match kind {
        ToolKind::Notes => match key.code {
            KeyCode::Char(c) => Some(ToolAction::Input(c)),
            KeyCode::Enter => Some(ToolAction::Newline),
            KeyCode::Backspace => Some(ToolAction::Backspace),
            KeyCode::Tab => Some(ToolAction::Input('\t')),
            _ => None,
        },
        ToolKind::Timer => match key.code {
            KeyCode::Char('s') => Some(ToolAction::Start),
            KeyCode::Char('r') => Some(ToolAction::Reset),
            _ => None,
        },
        ToolKind::Monitor => None,
        ToolKind::PasswordGen => match key.code {
            KeyCode::Char('+' | '=') => Some(ToolAction::LengthDelta(1)),
            KeyCode::Char('-') => Some(ToolAction::LengthDelta(-1)),
            KeyCode::Char('g') | KeyCode::Enter => Some(ToolAction::Generate),
            KeyCode::Char('y') => Some(ToolAction::Copy),
            _ => None,
        },
        ToolKind::Base64Tool => match key.code {
            KeyCode::Tab => Some(ToolAction::ToggleMode),
            KeyCode::Enter => Some(ToolAction::Submit),
            KeyCode::Backspace => Some(ToolAction::Backspace),
            KeyCode::Char(c) => Some(ToolAction::Input(c)),
            _ => None,
        },
        ToolKind::UnitConverter | ToolKind::ColorPicker => match key.code {
            KeyCode::Enter => Some(ToolAction::Submit),
            KeyCode::Backspace => Some(ToolAction::Backspace),
            KeyCode::Char(c) => Some(ToolAction::Input(c)),
            _ => None,
        },
    }
}
