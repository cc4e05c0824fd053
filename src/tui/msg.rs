//! TEA Message Types for the TUI
//!
//! Messages describe what the user did; `update` decides what it means.

use crossterm::event::{KeyCode, KeyModifiers};

/// All possible messages/actions in the TUI
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    // === Navigation ===
    /// Move selection up by one
    MoveUp,
    /// Move selection down by one
    MoveDown,
    /// Move selection up by page
    PageUp,
    /// Move selection down by page
    PageDown,
    /// Jump to first item
    JumpToTop,
    /// Jump to last item
    JumpToBottom,

    // === Text Input ===
    /// Add character to the prompt input
    Input(char),
    /// Remove last character of the prompt input
    Backspace,

    // === Document Pane ===
    /// Scroll the rendered markdown up
    ScrollUp,
    /// Scroll the rendered markdown down
    ScrollDown,

    // === Decisions ===
    /// Enter: choose the highlighted command, or submit the prompt
    Confirm,
    /// Esc / Ctrl+c / q in the picker
    Cancel,

    // === Lifecycle ===
    /// Window resized
    Resize(u16, u16),
    /// No operation (for unhandled keys)
    Noop,
}

/// Which screen is receiving keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Choosing one command among several matches
    Picker,
    /// Typing a placeholder value
    Prompt,
}

/// Convert a key event to a message
///
/// Pure function: in `Prompt` mode printable keys are text, so vim-style
/// bindings only apply in the picker.
pub fn key_to_msg(code: KeyCode, modifiers: KeyModifiers, mode: Mode) -> Msg {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Msg::Cancel;
    }

    match mode {
        Mode::Prompt => match code {
            KeyCode::Enter => Msg::Confirm,
            KeyCode::Esc => Msg::Cancel,
            KeyCode::Backspace => Msg::Backspace,
            KeyCode::Up | KeyCode::PageUp => Msg::ScrollUp,
            KeyCode::Down | KeyCode::PageDown => Msg::ScrollDown,
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => Msg::Input(c),
            _ => Msg::Noop,
        },
        Mode::Picker => match code {
            KeyCode::Esc | KeyCode::Char('q') => Msg::Cancel,
            KeyCode::Enter => Msg::Confirm,

            KeyCode::Char('j') | KeyCode::Down => Msg::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => Msg::MoveUp,
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => Msg::PageDown,
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => Msg::PageUp,
            KeyCode::Char('g') | KeyCode::Home => Msg::JumpToTop,
            KeyCode::Char('G') | KeyCode::End => Msg::JumpToBottom,
            KeyCode::PageDown => Msg::PageDown,
            KeyCode::PageUp => Msg::PageUp,

            _ => Msg::Noop,
        },
    }
}

/// Check if a message is a navigation action
pub fn is_navigation(msg: &Msg) -> bool {
    matches!(
        msg,
        Msg::MoveUp | Msg::MoveDown | Msg::PageUp | Msg::PageDown | Msg::JumpToTop | Msg::JumpToBottom
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_navigation() {
        assert_eq!(
            key_to_msg(KeyCode::Char('j'), KeyModifiers::NONE, Mode::Picker),
            Msg::MoveDown
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('k'), KeyModifiers::NONE, Mode::Picker),
            Msg::MoveUp
        );
        assert_eq!(
            key_to_msg(KeyCode::Down, KeyModifiers::NONE, Mode::Picker),
            Msg::MoveDown
        );
        assert_eq!(
            key_to_msg(KeyCode::Up, KeyModifiers::NONE, Mode::Picker),
            Msg::MoveUp
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('d'), KeyModifiers::CONTROL, Mode::Picker),
            Msg::PageDown
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('G'), KeyModifiers::NONE, Mode::Picker),
            Msg::JumpToBottom
        );
        assert_eq!(
            key_to_msg(KeyCode::Home, KeyModifiers::NONE, Mode::Picker),
            Msg::JumpToTop
        );
    }

    #[test]
    fn test_picker_decisions() {
        assert_eq!(
            key_to_msg(KeyCode::Enter, KeyModifiers::NONE, Mode::Picker),
            Msg::Confirm
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('q'), KeyModifiers::NONE, Mode::Picker),
            Msg::Cancel
        );
        assert_eq!(
            key_to_msg(KeyCode::Esc, KeyModifiers::NONE, Mode::Picker),
            Msg::Cancel
        );
    }

    #[test]
    fn test_prompt_keys_are_text() {
        assert_eq!(
            key_to_msg(KeyCode::Char('j'), KeyModifiers::NONE, Mode::Prompt),
            Msg::Input('j')
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('q'), KeyModifiers::NONE, Mode::Prompt),
            Msg::Input('q')
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('A'), KeyModifiers::SHIFT, Mode::Prompt),
            Msg::Input('A')
        );
        assert_eq!(
            key_to_msg(KeyCode::Backspace, KeyModifiers::NONE, Mode::Prompt),
            Msg::Backspace
        );
        assert_eq!(
            key_to_msg(KeyCode::Enter, KeyModifiers::NONE, Mode::Prompt),
            Msg::Confirm
        );
        assert_eq!(
            key_to_msg(KeyCode::Down, KeyModifiers::NONE, Mode::Prompt),
            Msg::ScrollDown
        );
    }

    #[test]
    fn test_ctrl_c_cancels_everywhere() {
        assert_eq!(
            key_to_msg(KeyCode::Char('c'), KeyModifiers::CONTROL, Mode::Picker),
            Msg::Cancel
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('c'), KeyModifiers::CONTROL, Mode::Prompt),
            Msg::Cancel
        );
        assert_eq!(
            key_to_msg(KeyCode::Esc, KeyModifiers::NONE, Mode::Prompt),
            Msg::Cancel
        );
    }

    #[test]
    fn test_unhandled_keys() {
        assert_eq!(
            key_to_msg(KeyCode::Char('z'), KeyModifiers::NONE, Mode::Picker),
            Msg::Noop
        );
        assert_eq!(
            key_to_msg(KeyCode::Char('w'), KeyModifiers::CONTROL, Mode::Prompt),
            Msg::Noop
        );
        assert_eq!(
            key_to_msg(KeyCode::F(1), KeyModifiers::NONE, Mode::Prompt),
            Msg::Noop
        );
    }

    #[test]
    fn test_is_navigation() {
        assert!(is_navigation(&Msg::MoveUp));
        assert!(is_navigation(&Msg::PageDown));
        assert!(!is_navigation(&Msg::Confirm));
        assert!(!is_navigation(&Msg::Input('a')));
    }
}
