use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::constants::UI_SCROLL_LINES;

/// Maps key presses to chat actions
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Process a key event
    pub fn handle_key(&self, key: KeyEvent) -> InputAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('d') => InputAction::Quit,
                KeyCode::Char('u') => InputAction::Cancel,
                _ => InputAction::None,
            };
        }

        match key.code {
            KeyCode::Enter => InputAction::Submit,
            KeyCode::Esc => InputAction::Cancel,
            KeyCode::Char(c) => InputAction::Insert(c),
            KeyCode::Backspace => InputAction::Delete,
            KeyCode::Up => InputAction::ScrollUp(1),
            KeyCode::Down => InputAction::ScrollDown(1),
            KeyCode::PageUp => InputAction::ScrollUp(UI_SCROLL_LINES * 3),
            KeyCode::PageDown => InputAction::ScrollDown(UI_SCROLL_LINES * 3),
            KeyCode::Tab => InputAction::ToggleSlots,
            _ => InputAction::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Submit,
    Cancel,
    Insert(char),
    Delete,
    ScrollUp(u16),
    ScrollDown(u16),
    ToggleSlots,
    Quit,
    None,
}
