//! Keyboard input: key names, raw input events, and key bindings.
//!
//! The engine never talks to a terminal directly. Hosts feed it [`RawInput`]
//! values through an [`InputSource`]; the engine then resolves control keys to
//! movement and runs the callbacks bound to the exact `(key, action)` pair.
//!
//! # Design Principles
//!
//! - **Mode-aware naming**: keypress mode knows named special keys, line mode
//!   treats each lower-cased line as a key
//! - **Closed actions**: only `press` and `release` exist
//! - **Pull-based**: sources are polled once per dispatch attempt

mod bindings;
mod source;

pub use bindings::KeyBindings;
pub use source::{InputSource, ScriptedInput};

use std::fmt;
use std::str::FromStr;

use crate::config::InputMode;
use crate::error::{EngineError, Result};
use crate::types::Direction;

/// Key action reported by the input source.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum KeyAction {
    Press,
    Release,
}

impl KeyAction {
    pub const ALL: [KeyAction; 2] = [KeyAction::Press, KeyAction::Release];

    /// Parses an action name, rejecting anything but `press`/`release`.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| EngineError::UnknownAction(name.to_owned()))
    }
}

/// Special keys that have a name in keypress mode.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NamedKey {
    Esc,
    Enter,
    Space,
    Tab,
    Backspace,
    Up,
    Down,
    Left,
    Right,
}

/// A key as the engine sees it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    /// A single printable character.
    Char(char),
    /// A named special key (keypress mode).
    Named(NamedKey),
    /// A multi-character line (line mode).
    Line(String),
}

impl Key {
    /// Resolves a key name for the given input mode.
    ///
    /// Keypress mode accepts a single character or a [`NamedKey`] name. Line
    /// mode lower-cases the text; one character becomes [`Key::Char`], any
    /// other text becomes [`Key::Line`].
    pub fn parse(mode: InputMode, name: &str) -> Result<Self> {
        match mode {
            InputMode::Keypress => {
                if let Some(c) = single_char(name) {
                    return Ok(Self::from_char(c));
                }
                NamedKey::from_str(name)
                    .map(Self::Named)
                    .map_err(|_| EngineError::UnknownKey(name.to_owned()))
            }
            InputMode::Line => {
                let line = name.to_lowercase();
                Ok(match single_char(&line) {
                    Some(c) => Self::Char(c),
                    None => Self::Line(line),
                })
            }
        }
    }

    /// Keypress-mode key for a typed character; a space is [`NamedKey::Space`].
    pub fn from_char(c: char) -> Self {
        match c {
            ' ' => Self::Named(NamedKey::Space),
            c => Self::Char(c),
        }
    }
}

impl From<NamedKey> for Key {
    fn from(key: NamedKey) -> Self {
        Self::Named(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Named(key) => write!(f, "{key}"),
            Key::Line(line) => f.write_str(line),
        }
    }
}

/// One event pulled from an input source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawInput {
    pub key: Key,
    pub action: KeyAction,
}

impl RawInput {
    pub fn new(key: Key, action: KeyAction) -> Self {
        Self { key, action }
    }

    pub fn press(key: Key) -> Self {
        Self::new(key, KeyAction::Press)
    }

    pub fn release(key: Key) -> Self {
        Self::new(key, KeyAction::Release)
    }
}

impl fmt::Display for RawInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.key)
    }
}

/// Movement direction bound to a control key, if any.
///
/// `w`/`s`/`a`/`d` steer in every mode; the arrow keys only exist in
/// keypress mode.
pub fn control_direction(key: &Key) -> Option<Direction> {
    match key {
        Key::Char('w') | Key::Named(NamedKey::Up) => Some(Direction::Up),
        Key::Char('s') | Key::Named(NamedKey::Down) => Some(Direction::Down),
        Key::Char('a') | Key::Named(NamedKey::Left) => Some(Direction::Left),
        Key::Char('d') | Key::Named(NamedKey::Right) => Some(Direction::Right),
        _ => None,
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
