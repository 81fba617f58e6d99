//! CLI configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use tile_core::{EngineConfig, InputMode};

/// Configuration required to build the demo engine and its terminal frontend.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub engine: EngineConfig,
    /// Raw input system name; applied to the live engine so an unsupported
    /// name ends the session. `None` picks by whether stdin is a terminal.
    pub input: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub message_capacity: usize,
}

impl CliConfig {
    pub const DEFAULT_MESSAGE_CAPACITY: usize = 64;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TILE_WIDTH` - Map columns (default: 40)
    /// - `TILE_HEIGHT` - Map rows (default: 10)
    /// - `TILE_PIXEL_WIDTH` - Terminal cells per tile (default: 1)
    /// - `TILE_CHARACTER` - Character symbol (default: `x`)
    /// - `TILE_FILLER` - Symbol for empty tiles (default: space)
    /// - `TILE_INPUT` - `keypress`/`pynput` or `line`/`stdin` (default: detected)
    /// - `TILE_DEBUG` - Enable debug logging (default: false)
    /// - `TILE_LOG_DIR` - Write logs to a daily file in this directory
    /// - `TILE_MESSAGE_CAPACITY` - Message log capacity (default: 64)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(width) = read_env::<usize>("TILE_WIDTH") {
            config.engine.width = width.max(1);
        }
        if let Some(height) = read_env::<usize>("TILE_HEIGHT") {
            config.engine.height = height.max(1);
        }
        if let Some(pixel_width) = read_env::<usize>("TILE_PIXEL_WIDTH") {
            config.engine = config.engine.with_pixel_width(pixel_width);
        }
        if let Ok(symbol) = env::var("TILE_CHARACTER") {
            config.engine.character_symbol = symbol;
        }
        if let Ok(filler) = env::var("TILE_FILLER") {
            config.engine.map_filler = filler;
        }

        config.input = env::var("TILE_INPUT").ok().filter(|s| !s.trim().is_empty());

        if let Some(debug) = env::var("TILE_DEBUG").ok().and_then(|v| parse_flag(&v)) {
            config.engine.debug = debug;
        }

        config.log_dir = env::var("TILE_LOG_DIR").ok().map(PathBuf::from);

        if let Some(capacity) = read_env::<usize>("TILE_MESSAGE_CAPACITY") {
            config.message_capacity = capacity.max(1);
        }

        config
    }

    /// Input mode the engine is built with before `input` is applied.
    pub fn initial_input_mode(&self) -> InputMode {
        self.input
            .as_deref()
            .and_then(|name| InputMode::parse(name).ok())
            .unwrap_or_else(InputMode::detect)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            input: None,
            log_dir: None,
            message_capacity: Self::DEFAULT_MESSAGE_CAPACITY,
        }
    }
}

/// Boolean switch from an environment value. A variable set without a value
/// counts as on; unrecognised values are ignored.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
