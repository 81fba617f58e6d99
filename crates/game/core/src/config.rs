use std::str::FromStr;

use crate::error::EngineError;
use crate::types::Position;

/// Where raw input comes from and how keys are named.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum InputMode {
    /// Individual key presses and releases, with named special keys.
    #[default]
    #[strum(to_string = "keypress", serialize = "pynput")]
    Keypress,
    /// One lower-cased line per poll, treated as a single press.
    #[strum(to_string = "line", serialize = "stdin")]
    Line,
}

impl InputMode {
    /// Accepts `keypress`/`pynput` and `line`/`stdin`, case-insensitively.
    pub fn parse(name: &str) -> Result<Self, EngineError> {
        Self::from_str(name.trim()).map_err(|_| EngineError::UnsupportedInput(name.to_owned()))
    }

    /// Picks keypress mode when stdin is a terminal, line mode otherwise.
    pub fn detect() -> Self {
        use std::io::IsTerminal;
        if std::io::stdin().is_terminal() {
            Self::Keypress
        } else {
            Self::Line
        }
    }
}


/// Engine construction parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Terminal cells per tile. Symbols are padded to this width.
    pub pixel_width: usize,
    pub character_symbol: String,
    /// Symbol drawn on empty or hidden tiles.
    pub map_filler: String,
    /// Character start position; the grid centre when unset.
    pub start: Option<Position>,
    pub input_mode: InputMode,
    pub debug: bool,
}

impl EngineConfig {
    pub const DEFAULT_WIDTH: usize = 40;
    pub const DEFAULT_HEIGHT: usize = 10;
    pub const DEFAULT_PIXEL_WIDTH: usize = 1;
    pub const DEFAULT_CHARACTER: &'static str = "x";
    pub const DEFAULT_FILLER: &'static str = " ";

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_pixel_width(mut self, pixel_width: usize) -> Self {
        self.pixel_width = pixel_width.max(1);
        self
    }

    #[must_use]
    pub fn with_character_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.character_symbol = symbol.into();
        self
    }

    #[must_use]
    pub fn with_map_filler(mut self, filler: impl Into<String>) -> Self {
        self.map_filler = filler.into();
        self
    }

    #[must_use]
    pub fn with_start(mut self, start: Position) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Character position at construction: `start` or `(height/2, width/2)`.
    pub fn start_position(&self) -> Position {
        self.start.unwrap_or_else(|| {
            Position::new(
                i32::try_from(self.height / 2).unwrap_or(i32::MAX),
                i32::try_from(self.width / 2).unwrap_or(i32::MAX),
            )
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            pixel_width: Self::DEFAULT_PIXEL_WIDTH,
            character_symbol: Self::DEFAULT_CHARACTER.to_owned(),
            map_filler: Self::DEFAULT_FILLER.to_owned(),
            start: None,
            input_mode: InputMode::default(),
            debug: false,
        }
    }
}
