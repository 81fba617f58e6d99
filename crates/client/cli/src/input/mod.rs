//! Input sources for the CLI client.
//!
//! This module owns the translation from terminal events to engine input so
//! the engine can remain agnostic about `crossterm` and stdin specifics.

mod keypress;
mod line;

pub use keypress::KeypressInput;
pub use line::LineInput;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tile_core::{Key, KeyAction, NamedKey, RawInput};

/// Converts a terminal key event into engine input.
///
/// Auto-repeat counts as another press. Keys without an engine name (function
/// keys, media keys, ...) yield `None`.
pub fn translate(key: KeyEvent) -> Option<RawInput> {
    let action = match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => KeyAction::Press,
        KeyEventKind::Release => KeyAction::Release,
    };

    let key = match key.code {
        KeyCode::Char(c) => Key::from_char(c),
        KeyCode::Esc => Key::Named(NamedKey::Esc),
        KeyCode::Enter => Key::Named(NamedKey::Enter),
        KeyCode::Tab => Key::Named(NamedKey::Tab),
        KeyCode::Backspace => Key::Named(NamedKey::Backspace),
        KeyCode::Up => Key::Named(NamedKey::Up),
        KeyCode::Down => Key::Named(NamedKey::Down),
        KeyCode::Left => Key::Named(NamedKey::Left),
        KeyCode::Right => Key::Named(NamedKey::Right),
        _ => return None,
    };

    Some(RawInput::new(key, action))
}

/// Ctrl+C always leaves the game, even in raw mode.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn characters_and_named_keys() {
        assert_eq!(
            translate(key(KeyCode::Char('b'), KeyEventKind::Press)),
            Some(RawInput::press(Key::Char('b')))
        );
        assert_eq!(
            translate(key(KeyCode::Char(' '), KeyEventKind::Press)),
            Some(RawInput::press(Key::Named(NamedKey::Space)))
        );
        assert_eq!(
            translate(key(KeyCode::Esc, KeyEventKind::Press)),
            Some(RawInput::press(Key::Named(NamedKey::Esc)))
        );
        assert_eq!(translate(key(KeyCode::F(1), KeyEventKind::Press)), None);
    }

    #[test]
    fn repeat_is_press_and_release_is_kept() {
        assert_eq!(
            translate(key(KeyCode::Up, KeyEventKind::Repeat)),
            Some(RawInput::press(Key::Named(NamedKey::Up)))
        );
        assert_eq!(
            translate(key(KeyCode::Char('w'), KeyEventKind::Release)),
            Some(RawInput::release(Key::Char('w')))
        );
    }

    #[test]
    fn ctrl_c_interrupts() {
        let mut event = key(KeyCode::Char('c'), KeyEventKind::Press);
        assert!(!is_interrupt(&event));
        event.modifiers = KeyModifiers::CONTROL;
        assert!(is_interrupt(&event));
    }
}
