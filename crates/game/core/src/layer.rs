//! Named rendering layers.
//!
//! Exactly one layer is active at a time and the engine calls its renderer at
//! the start of every turn. The reserved [`MAP_LAYER`] is always registered;
//! only while it is active do control keys move the character.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

use crate::engine::Engine;
use crate::error::{EngineError, HandlerResult, Result};
use crate::types::Position;

/// Name of the built-in map layer.
pub const MAP_LAYER: &str = "map";

/// Draws the engine state. Receives the whole engine read-only.
pub trait Renderer {
    fn render(&mut self, engine: &Engine) -> HandlerResult;
}

impl<F> Renderer for F
where
    F: FnMut(&Engine) -> HandlerResult,
{
    fn render(&mut self, engine: &Engine) -> HandlerResult {
        self(engine)
    }
}

/// Options for [`Engine::switch_layer`](crate::Engine::switch_layer).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwitchOptions {
    /// Render the new layer immediately instead of waiting for the next turn.
    pub force_render: bool,
    /// Skip the enter/leave scan of the next turn advance.
    pub pause_event_check: bool,
}

impl Default for SwitchOptions {
    fn default() -> Self {
        Self {
            force_render: false,
            pause_event_check: true,
        }
    }
}

/// Options for [`Engine::add_layer`](crate::Engine::add_layer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddLayerOptions {
    pub switch_now: bool,
    pub force_render: bool,
}

/// Registry of renderers by layer name plus the active layer.
pub struct LayerManager {
    renderers: HashMap<String, Box<dyn Renderer>>,
    active: String,
    pause_once: bool,
}

impl LayerManager {
    /// Creates a manager with `map_renderer` registered and active as [`MAP_LAYER`].
    pub fn new(map_renderer: Box<dyn Renderer>) -> Self {
        let mut renderers = HashMap::new();
        renderers.insert(MAP_LAYER.to_owned(), map_renderer);
        Self {
            renderers,
            active: MAP_LAYER.to_owned(),
            pause_once: false,
        }
    }

    /// Swaps the renderer of the map layer without touching the active layer.
    pub fn replace_map(&mut self, renderer: Box<dyn Renderer>) {
        self.renderers.insert(MAP_LAYER.to_owned(), renderer);
    }

    /// Registers a renderer. Returns true when an existing layer was replaced.
    pub fn add(&mut self, name: impl Into<String>, renderer: Box<dyn Renderer>) -> bool {
        let name = name.into();
        let replaced = self.renderers.insert(name.clone(), renderer).is_some();
        if replaced {
            warn!(layer = %name, "layer already exists, renderer overwritten");
        } else {
            debug!(layer = %name, "layer added");
        }
        replaced
    }

    /// Makes `name` the active layer.
    pub fn switch(&mut self, name: &str, pause_event_check: bool) -> Result<()> {
        if !self.renderers.contains_key(name) {
            warn!(layer = name, available = ?self.names(), "layer not available");
            return Err(EngineError::LayerNotFound(name.to_owned()));
        }
        self.active = name.to_owned();
        if pause_event_check {
            self.pause_once = true;
        }
        debug!(layer = name, pause_event_check, "layer switched");
        Ok(())
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn is_map_active(&self) -> bool {
        self.active == MAP_LAYER
    }

    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Registered layer names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_paused(&self) -> bool {
        self.pause_once
    }

    /// Consumes the one-shot pause flag.
    pub fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause_once)
    }

    /// Detaches the active renderer so it can borrow the engine.
    pub(crate) fn take_active(&mut self) -> Option<(String, Box<dyn Renderer>)> {
        let name = self.active.clone();
        self.renderers.remove(&name).map(|r| (name, r))
    }

    /// Re-attaches a renderer detached by [`take_active`](Self::take_active).
    pub(crate) fn restore(&mut self, name: String, renderer: Box<dyn Renderer>) {
        self.renderers.entry(name).or_insert(renderer);
    }
}

impl fmt::Debug for LayerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerManager")
            .field("layers", &self.names())
            .field("active", &self.active)
            .field("pause_once", &self.pause_once)
            .finish()
    }
}

/// Pads `symbol` with spaces to `width` terminal cells.
pub fn pad_symbol(symbol: &str, width: usize) -> String {
    let used = symbol.width();
    if used >= width {
        return symbol.to_owned();
    }
    let mut padded = String::with_capacity(symbol.len() + width - used);
    padded.push_str(symbol);
    padded.extend(std::iter::repeat_n(' ', width - used));
    padded
}

/// The framed text view of the map, one line per entry.
///
/// ```text
/// time:   3
/// .----------.
/// |     x    |
/// '----------'
/// ```
pub fn map_frame(engine: &Engine) -> Vec<String> {
    let config = engine.config();
    let border = "-".repeat(config.width * config.pixel_width);
    let mut lines = Vec::with_capacity(config.height + 3);

    lines.push(format!("time: {:3}", engine.timestamp().0));
    lines.push(format!(".{border}."));
    for x in 0..config.height {
        let mut row = String::from("|");
        for y in 0..config.width {
            let position = Position::new(x as i32, y as i32);
            row.push_str(&engine.tile_symbol(position));
        }
        row.push('|');
        lines.push(row);
    }
    lines.push(format!("'{border}'"));
    lines
}

/// Default map renderer: prints [`map_frame`] to a writer.
pub struct TextMapRenderer {
    out: Box<dyn Write>,
}

impl TextMapRenderer {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self { out }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

impl Renderer for TextMapRenderer {
    fn render(&mut self, engine: &Engine) -> HandlerResult {
        writeln!(self.out)?;
        for line in map_frame(engine) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
