//! Keyboard handling for the chat input

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press does to the chat input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Send the input buffer
    Send,
    /// Insert a line break into the input buffer
    InsertNewline,
    InsertChar(char),
    DeleteCharBefore,
}

/// Map a key event to an input action
pub fn key_to_action(key: KeyEvent) -> Option<InputAction> {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, KeyModifiers::NONE) => Some(InputAction::Send),
        (KeyCode::Enter, KeyModifiers::SHIFT) => Some(InputAction::InsertNewline),
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            Some(InputAction::InsertChar(c))
        }
        (KeyCode::Backspace, _) => Some(InputAction::DeleteCharBefore),
        _ => None,
    }
}

/// A key event plus the "default prevented" flag a handler may set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub event: KeyEvent,
    pub default_prevented: bool,
}

impl KeyPress {
    pub fn new(event: KeyEvent) -> Self {
        Self {
            event,
            default_prevented: false,
        }
    }

    pub fn enter() -> Self {
        Self::new(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
    }

    pub fn shift_enter() -> Self {
        Self::new(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT))
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
