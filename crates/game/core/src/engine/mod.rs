//! The engine: owner of the map, events, timers, layers, and key bindings.
//!
//! [`Engine`] is the single mutable root of a session. Callbacks of every kind
//! (event subscribers, key bindings, engine timers) receive `&mut Engine`, so
//! they can place items, start timers, switch layers, or end the session.
//! Item-level callbacks receive only their own item.
//!
//! The per-turn loop lives in [`turns`](self) and input dispatch in
//! [`dispatch`](self); [`Session`] wraps both into an iterator.

mod dispatch;
mod session;
mod turns;

pub use session::Session;

use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

use crate::config::{EngineConfig, InputMode};
use crate::error::{EngineError, HandlerResult, Result};
use crate::event::{EngineEvent, EventBus, EventKey, Handler};
use crate::input::KeyBindings;
use crate::item::{Item, ItemSpec};
use crate::layer::{
    pad_symbol, AddLayerOptions, LayerManager, Renderer, SwitchOptions, TextMapRenderer,
};
use crate::map::{ItemFilter, Removal, TileMap};
use crate::timer::{TimerId, TimerRegistry};
use crate::types::{step_move, Direction, MoveFn, Position, Tick};

/// Lifecycle of a session. `Ended` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Constructed, `onstart` not fired yet.
    Ready,
    Running,
    Ended,
}

/// Tile game engine.
///
/// # Example
///
/// ```
/// use tile_core::{Engine, EngineConfig, ItemSpec};
///
/// let mut engine = Engine::new(EngineConfig::default()).unwrap();
/// let star = engine.add_item(3, 20, ItemSpec::new("star", "*")).unwrap();
/// assert_eq!(star.name(), "star");
/// assert!(engine.remove_item(None, None, Some("star")).unwrap());
/// ```
pub struct Engine {
    config: EngineConfig,
    map: TileMap,
    events: EventBus<EventKey, Engine>,
    timers: TimerRegistry<Engine>,
    layers: LayerManager,
    bindings: KeyBindings<Engine>,
    move_fn: Rc<MoveFn>,
    timestamp: Tick,
    phase: Phase,
    backpack: Vec<String>,
}

impl Engine {
    /// Creates an engine with the default map renderer (stdout) and the
    /// one-step move function.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let start = config.start_position();
        let mut map = TileMap::new(config.width, config.height, start);
        map.set_character(start)?;

        if config.character_symbol.width() > config.pixel_width {
            warn!(
                symbol = %config.character_symbol,
                pixel_width = config.pixel_width,
                "character symbol is wider than a tile"
            );
        }

        debug!(
            width = config.width,
            height = config.height,
            character = %start,
            input = %config.input_mode,
            "engine created"
        );

        Ok(Self {
            map,
            events: EventBus::with_events(EngineEvent::ALL.map(EventKey::from)),
            timers: TimerRegistry::new(),
            layers: LayerManager::new(Box::new(TextMapRenderer::stdout())),
            bindings: KeyBindings::new(),
            move_fn: Rc::new(step_move),
            timestamp: Tick::ZERO,
            phase: Phase::Ready,
            backpack: Vec::new(),
            config,
        })
    }

    /// Replaces the move function.
    #[must_use]
    pub fn with_move<F>(mut self, move_fn: F) -> Self
    where
        F: Fn(Direction, i32, i32) -> (i32, i32) + 'static,
    {
        self.move_fn = Rc::new(move_fn);
        self
    }

    /// Replaces the renderer of the map layer. Other layers are kept.
    #[must_use]
    pub fn with_map_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.layers.replace_map(Box::new(renderer));
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn timestamp(&self) -> Tick {
        self.timestamp
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn input_mode(&self) -> InputMode {
        self.config.input_mode
    }

    pub fn backpack(&self) -> &[String] {
        &self.backpack
    }

    pub fn backpack_mut(&mut self) -> &mut Vec<String> {
        &mut self.backpack
    }

    // ===== events =====

    /// Registers a custom event name.
    pub fn add_event(&mut self, name: &str) -> Result<()> {
        self.events.register(EventKey::from(name))
    }

    pub fn has_event(&self, event: impl Into<EventKey>) -> bool {
        self.events.contains(&event.into())
    }

    pub fn subscribe(&mut self, event: impl Into<EventKey>, handler: Handler<Engine>) -> Result<()> {
        self.events.subscribe(&event.into(), handler)
    }

    /// Subscribes a closure and returns the handle needed to unsubscribe it.
    pub fn on<F>(&mut self, event: impl Into<EventKey>, callback: F) -> Result<Handler<Engine>>
    where
        F: Fn(&mut Engine) -> HandlerResult + 'static,
    {
        let handler: Handler<Engine> = Rc::new(callback);
        self.subscribe(event, handler.clone())?;
        Ok(handler)
    }

    pub fn unsubscribe(
        &mut self,
        event: impl Into<EventKey>,
        handler: &Handler<Engine>,
    ) -> Result<()> {
        self.events.unsubscribe(&event.into(), handler)
    }

    pub fn subscriber_count(&self, event: impl Into<EventKey>) -> usize {
        self.events.subscriber_count(&event.into())
    }

    /// Invokes every subscriber of `event` in order. The first failing
    /// subscriber aborts the dispatch.
    pub fn fire(&mut self, event: impl Into<EventKey>) -> Result<()> {
        let event = event.into();
        for handler in self.events.snapshot(&event)? {
            handler(self).map_err(|e| EngineError::handler(event.to_string(), e))?;
        }
        Ok(())
    }

    // ===== timers =====

    /// Starts an engine timer; the callback runs after `ticks` turn advances.
    pub fn start_timer<F>(&mut self, ticks: u32, callback: F) -> Result<TimerId>
    where
        F: FnOnce(&mut Engine) -> HandlerResult + 'static,
    {
        self.timers.start(ticks, callback).inspect_err(|e| {
            warn!(error = %e, "timer not started");
        })
    }

    pub fn cancel_timer(&mut self, id: TimerId) -> Result<()> {
        self.timers.cancel(id).inspect_err(|_| {
            warn!(timer = %id, "timer not found");
        })
    }

    pub fn timer_remaining(&self, id: TimerId) -> Option<u32> {
        self.timers.remaining(id)
    }

    // ===== items =====

    /// Creates an item at `(x, y)` stamped with the current tick and places it,
    /// replacing any previous occupant. Fires `update_map`.
    pub fn add_item(&mut self, x: i32, y: i32, spec: ItemSpec) -> Result<&mut Item> {
        let position = Position::new(x, y);
        if spec.symbol.width() > self.config.pixel_width {
            warn!(
                item = %spec.name,
                symbol = %spec.symbol,
                pixel_width = self.config.pixel_width,
                "item symbol is wider than a tile"
            );
        }

        let item = Item::new(spec, position, self.timestamp);
        self.map.place(item).inspect_err(|e| {
            warn!(error = %e, "item not added");
        })?;
        self.fire(EngineEvent::UpdateMap)?;

        self.map
            .get_mut(position)
            .ok_or(EngineError::ItemNotFound(position))
    }

    /// Removes items by position, by position and name, or by name.
    ///
    /// Giving only one of `x`/`y` is an error. Returns whether anything was
    /// removed; fires `update_map` when it was.
    pub fn remove_item(
        &mut self,
        x: Option<i32>,
        y: Option<i32>,
        name: Option<&str>,
    ) -> Result<bool> {
        match Removal::from_parts(x, y, name)? {
            Some(removal) => self.remove(&removal),
            None => {
                warn!("nothing to remove: neither position nor name given");
                Ok(false)
            }
        }
    }

    /// Typed form of [`remove_item`](Self::remove_item).
    pub fn remove(&mut self, removal: &Removal) -> Result<bool> {
        let removed = self.map.remove(removal)?;
        if removed {
            self.fire(EngineEvent::UpdateMap)?;
        }
        Ok(removed)
    }

    pub fn find_items(&self, filter: &ItemFilter) -> Vec<&Item> {
        self.map.find(filter)
    }

    pub fn item(&self, position: Position) -> Option<&Item> {
        self.map.get(position)
    }

    pub fn item_mut(&mut self, position: Position) -> Option<&mut Item> {
        self.map.get_mut(position)
    }

    // ===== character =====

    pub fn position(&self) -> Position {
        self.map.character()
    }

    /// Teleports the character. Blocking items are not checked.
    pub fn set_position(&mut self, position: Position) -> Result<()> {
        self.map.set_character(position)
    }

    /// Moves the character with the move function.
    ///
    /// Returns false when the destination is off the grid or blocked; the
    /// character then stays where it is.
    pub fn move_character(&mut self, direction: Direction) -> Result<bool> {
        let from = self.map.character();
        let (x, y) = (self.move_fn)(direction, from.x, from.y);
        let to = Position::new(x, y);

        if !self.map.contains(to) {
            warn!(%direction, from = %from, to = %to, "move rejected: outside of the map");
            return Ok(false);
        }
        if self.map.is_blocked(to) {
            debug!(%direction, to = %to, "move blocked");
            return Ok(false);
        }
        self.map.set_character(to)?;
        debug!(%direction, to = %to, "move to");
        Ok(true)
    }

    // ===== layers =====

    pub fn active_layer(&self) -> &str {
        self.layers.active()
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    /// Registers (or overwrites) a layer, optionally switching to it.
    ///
    /// Forcing a render implies switching: the new layer is the one drawn.
    pub fn add_layer(
        &mut self,
        name: &str,
        renderer: impl Renderer + 'static,
        options: AddLayerOptions,
    ) -> Result<()> {
        self.layers.add(name, Box::new(renderer));
        if options.switch_now || options.force_render {
            self.layers.switch(name, false)?;
        }
        if options.force_render {
            self.render()?;
        }
        Ok(())
    }

    /// Activates a registered layer.
    pub fn switch_layer(&mut self, name: &str, options: SwitchOptions) -> Result<()> {
        self.layers.switch(name, options.pause_event_check)?;
        if options.force_render {
            self.render()?;
        }
        Ok(())
    }

    /// Runs the active layer's renderer.
    pub fn render(&mut self) -> Result<()> {
        let Some((name, mut renderer)) = self.layers.take_active() else {
            return Err(EngineError::LayerNotFound(self.layers.active().to_owned()));
        };
        let result = renderer.render(self);
        self.layers.restore(name.clone(), renderer);
        result.map_err(|e| EngineError::handler(format!("render {name}"), e))
    }

    /// Display string of one tile, padded to the pixel width.
    ///
    /// The character wins over items; hidden items and empty tiles show the
    /// map filler.
    pub fn tile_symbol(&self, position: Position) -> String {
        let pixel_width = self.config.pixel_width;
        if position == self.map.character() {
            return pad_symbol(&self.config.character_symbol, pixel_width);
        }
        match self.map.get(position) {
            Some(item) if !item.is_hidden() => pad_symbol(item.symbol(), pixel_width),
            _ => pad_symbol(&self.config.map_filler, pixel_width),
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("timestamp", &self.timestamp)
            .field("phase", &self.phase)
            .field("character", &self.map.character())
            .field("items", &self.map.len())
            .field("events", &self.events)
            .field("timers", &self.timers)
            .field("layers", &self.layers)
            .field("bindings", &self.bindings)
            .field("backpack", &self.backpack)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ItemEvent;
    use std::cell::{Cell, RefCell};

    fn engine() -> Engine {
        Engine::new(EngineConfig::default())
            .unwrap()
            .with_map_renderer(|_: &Engine| -> HandlerResult { Ok(()) })
    }

    #[test]
    fn character_starts_in_the_centre() {
        assert_eq!(engine().position(), Position::new(5, 20));
    }

    #[test]
    fn start_outside_grid_is_rejected() {
        let config = EngineConfig::default().with_start(Position::new(10, 0));
        assert!(matches!(
            Engine::new(config),
            Err(EngineError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn custom_events_dispatch_in_order() {
        let mut engine = engine();
        let log = Rc::new(RefCell::new(Vec::new()));

        let noop: Handler<Engine> = Rc::new(|_: &mut Engine| -> HandlerResult { Ok(()) });
        assert!(engine.subscribe("itemfound", noop).is_err());
        engine.add_event("itemfound").unwrap();
        assert!(matches!(
            engine.add_event("itemfound"),
            Err(EngineError::DuplicateEvent(_))
        ));
        assert!(engine.add_event("onstart").is_err());

        for n in 1..=2 {
            let log = Rc::clone(&log);
            engine
                .on("itemfound", move |_| {
                    log.borrow_mut().push(n);
                    Ok(())
                })
                .unwrap();
        }
        engine.fire("itemfound").unwrap();
        assert_eq!(*log.borrow(), vec![1, 2]);
        assert!(engine.fire("missing").is_err());
    }

    #[test]
    fn handlers_can_mutate_the_engine() {
        let mut engine = engine();
        engine.add_event("spawn").unwrap();
        engine
            .on("spawn", |e| {
                e.add_item(0, 0, ItemSpec::new("coin", "o"))?;
                Ok(())
            })
            .unwrap();
        engine.fire("spawn").unwrap();
        assert_eq!(engine.item(Position::ORIGIN).unwrap().name(), "coin");
    }

    #[test]
    fn add_and_remove_fire_update_map() {
        let mut engine = engine();
        let updates = Rc::new(Cell::new(0));
        let seen = Rc::clone(&updates);
        engine
            .on(EngineEvent::UpdateMap, move |_| {
                seen.set(seen.get() + 1);
                Ok(())
            })
            .unwrap();

        engine.add_item(3, 20, ItemSpec::new("star", "*")).unwrap();
        assert_eq!(updates.get(), 1);
        assert!(!engine.remove_item(Some(3), Some(30), Some("not-star")).unwrap());
        assert_eq!(updates.get(), 1);
        assert!(engine.remove_item(Some(3), Some(20), None).unwrap());
        assert_eq!(updates.get(), 2);
    }

    #[test]
    fn remove_item_by_position_and_name() {
        let mut engine = engine();
        let removed = Rc::new(Cell::new(false));
        let seen = Rc::clone(&removed);
        engine
            .add_item(3, 20, ItemSpec::new("star", "*"))
            .unwrap()
            .on(ItemEvent::Removed, move |_| {
                seen.set(true);
                Ok(())
            })
            .unwrap();

        assert!(matches!(
            engine.remove_item(Some(3), None, None),
            Err(EngineError::PartialPosition { .. })
        ));
        assert!(!engine.remove_item(Some(3), Some(20), Some("moon")).unwrap());
        assert!(engine.remove_item(Some(3), Some(20), Some("star")).unwrap());
        assert!(removed.get());
        assert!(!engine.remove_item(None, None, None).unwrap());
    }

    #[test]
    fn blocked_and_off_grid_moves_are_rejected() {
        let mut engine = Engine::new(EngineConfig::new(3, 3)).unwrap();
        engine
            .add_item(0, 1, ItemSpec::new("wall", "#").blocking(true))
            .unwrap();

        assert_eq!(engine.position(), Position::new(1, 1));
        assert!(!engine.move_character(Direction::Up).unwrap());
        assert_eq!(engine.position(), Position::new(1, 1));

        assert!(engine.move_character(Direction::Right).unwrap());
        assert!(!engine.move_character(Direction::Right).unwrap());
        assert_eq!(engine.position(), Position::new(1, 2));
    }

    #[test]
    fn custom_move_function_is_used() {
        let mut engine = engine().with_move(|_, x, y| (x, y + 2));
        assert!(engine.move_character(Direction::Up).unwrap());
        assert_eq!(engine.position(), Position::new(5, 22));
    }

    #[test]
    fn tile_symbols_prefer_character_then_visible_items() {
        let mut engine = Engine::new(EngineConfig::default().with_pixel_width(2)).unwrap();
        engine.add_item(0, 0, ItemSpec::new("coin", "$")).unwrap();
        engine
            .add_item(0, 1, ItemSpec::new("ghost", "g").hidden(true))
            .unwrap();

        assert_eq!(engine.tile_symbol(Position::ORIGIN), "$ ");
        assert_eq!(engine.tile_symbol(Position::new(0, 1)), "  ");
        assert_eq!(engine.tile_symbol(engine.position()), "x ");
    }

    #[test]
    fn switch_to_unknown_layer_fails() {
        let mut engine = engine();
        assert!(matches!(
            engine.switch_layer("inventory", SwitchOptions::default()),
            Err(EngineError::LayerNotFound(_))
        ));
        assert_eq!(engine.active_layer(), "map");
    }

    #[test]
    fn add_layer_can_switch_and_render() {
        let mut engine = engine();
        let rendered = Rc::new(Cell::new(0));
        let seen = Rc::clone(&rendered);
        engine
            .add_layer(
                "backpack",
                move |e: &Engine| -> HandlerResult {
                    assert_eq!(e.active_layer(), "backpack");
                    seen.set(seen.get() + 1);
                    Ok(())
                },
                AddLayerOptions {
                    switch_now: true,
                    force_render: true,
                },
            )
            .unwrap();
        assert_eq!(rendered.get(), 1);
        assert!(!engine.layers().is_paused());
    }

    #[test]
    fn forced_render_draws_the_new_layer() {
        let drawn = Rc::new(RefCell::new(Vec::new()));
        let map_log = Rc::clone(&drawn);
        let mut engine = Engine::new(EngineConfig::default())
            .unwrap()
            .with_map_renderer(move |_: &Engine| -> HandlerResult {
                map_log.borrow_mut().push("map");
                Ok(())
            });
        let help_log = Rc::clone(&drawn);
        engine
            .add_layer(
                "help",
                move |_: &Engine| -> HandlerResult {
                    help_log.borrow_mut().push("help");
                    Ok(())
                },
                AddLayerOptions {
                    switch_now: false,
                    force_render: true,
                },
            )
            .unwrap();

        assert_eq!(*drawn.borrow(), vec!["help"]);
        assert_eq!(engine.active_layer(), "help");
        assert!(!engine.layers().is_paused());
    }
}
