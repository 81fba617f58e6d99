//! Turn-based tile game engine for terminal games.
//!
//! `tile-core` owns the simulation: a fixed grid with one movable character,
//! items with their own events, lifespans, and timers, an engine-wide event
//! bus, key bindings, and swappable rendering layers. Everything runs on one
//! thread; the only suspension point is the timestamp handed back to the host
//! between turns (see [`Session`]).
//!
//! Terminal I/O is not part of this crate. Hosts supply an [`InputSource`] and
//! [`Renderer`]s; a plain stdout map renderer is provided as the default.
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod input;
pub mod item;
pub mod layer;
pub mod map;
pub mod timer;
pub mod types;

pub use config::{EngineConfig, InputMode};
pub use engine::{Engine, Phase, Session};
pub use error::{EngineError, ErrorKind, HandlerResult, Result};
pub use event::{EngineEvent, EventBus, EventKey, Handler, ItemEvent};
pub use input::{
    control_direction, InputSource, Key, KeyAction, KeyBindings, NamedKey, RawInput,
    ScriptedInput,
};
pub use item::{Item, ItemSpec};
pub use layer::{
    map_frame, pad_symbol, AddLayerOptions, LayerManager, Renderer, SwitchOptions,
    TextMapRenderer, MAP_LAYER,
};
pub use map::{ItemFilter, Removal, TileMap};
pub use timer::{TimerCallback, TimerId, TimerRegistry};
pub use types::{step_move, Direction, MoveFn, Position, Tick};
