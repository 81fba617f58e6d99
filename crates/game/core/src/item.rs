//! Map items: identity, display state, lifespan, private events and timers.

use std::rc::Rc;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{EngineError, HandlerResult, Result};
use crate::event::{EventBus, Handler, ItemEvent};
use crate::timer::{TimerId, TimerRegistry};
use crate::types::{Position, Tick};

/// Blueprint for an item before it is placed on the map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSpec {
    pub name: String,
    pub symbol: String,
    /// Number of turns the item survives after creation.
    pub life: Option<u64>,
    pub block: bool,
    pub hidden: bool,
}

impl ItemSpec {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            life: None,
            block: false,
            hidden: false,
        }
    }

    #[must_use]
    pub fn with_life(mut self, life: u64) -> Self {
        self.life = Some(life);
        self
    }

    #[must_use]
    pub fn blocking(mut self, block: bool) -> Self {
        self.block = block;
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// A single entity living on one map tile.
///
/// Items are owned by the map cell they occupy. Their event set is fixed to
/// [`ItemEvent`]; handlers and timer callbacks receive the item itself.
#[derive(Debug)]
pub struct Item {
    name: String,
    position: Position,
    symbol: String,
    created: Tick,
    life: Option<u64>,
    block: bool,
    hidden: bool,
    touched: bool,
    events: EventBus<ItemEvent, Item>,
    timers: TimerRegistry<Item>,
}

impl Item {
    /// Creates an item at `position`, stamped with the creation tick.
    ///
    /// An empty symbol is normalised to a single space.
    pub fn new(spec: ItemSpec, position: Position, created: Tick) -> Self {
        let ItemSpec {
            name,
            mut symbol,
            life,
            block,
            hidden,
        } = spec;

        if symbol.is_empty() {
            warn!(item = %name, "symbol is automatically transformed into space");
            symbol = " ".to_owned();
        }

        Self {
            name,
            position,
            symbol,
            created,
            life,
            block,
            hidden,
            touched: false,
            events: EventBus::with_events(ItemEvent::ALL),
            timers: TimerRegistry::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn created(&self) -> Tick {
        self.created
    }

    pub fn life(&self) -> Option<u64> {
        self.life
    }

    pub fn is_blocking(&self) -> bool {
        self.block
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// True while the character stood on this tile at the last lifecycle scan.
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.hidden = !visible;
        debug!(item = %self.name, visible, "visibility changed");
    }

    pub fn set_blocking(&mut self, block: bool) {
        self.block = block;
        debug!(item = %self.name, block, "blocking changed");
    }

    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        let symbol = symbol.into();
        self.symbol = if symbol.is_empty() {
            " ".to_owned()
        } else {
            symbol
        };
    }

    /// Subscribes a handler to one of the item's events.
    pub fn subscribe(&mut self, event: ItemEvent, handler: Handler<Item>) -> Result<()> {
        self.events.subscribe(&event, handler)
    }

    /// Subscribes a closure and returns the handle needed to unsubscribe it.
    pub fn on<F>(&mut self, event: ItemEvent, callback: F) -> Result<Handler<Item>>
    where
        F: Fn(&mut Item) -> HandlerResult + 'static,
    {
        let handler: Handler<Item> = Rc::new(callback);
        self.subscribe(event, handler.clone())?;
        Ok(handler)
    }

    pub fn unsubscribe(&mut self, event: ItemEvent, handler: &Handler<Item>) -> Result<()> {
        self.events.unsubscribe(&event, handler)
    }

    /// Subscribes by event name; unknown names are rejected.
    pub fn subscribe_named(&mut self, event: &str, handler: Handler<Item>) -> Result<()> {
        let event = parse_event(event)?;
        self.subscribe(event, handler)
    }

    pub fn subscriber_count(&self, event: ItemEvent) -> usize {
        self.events.subscriber_count(&event)
    }

    /// Starts an item-local timer. It only advances while the item is alive
    /// and on the map.
    pub fn start_timer<F>(&mut self, ticks: u32, callback: F) -> Result<TimerId>
    where
        F: FnOnce(&mut Item) -> HandlerResult + 'static,
    {
        self.timers.start(ticks, callback)
    }

    pub fn cancel_timer(&mut self, id: TimerId) -> Result<()> {
        self.timers.cancel(id).inspect_err(|_| {
            warn!(item = %self.name, timer = %id, "timer not found");
        })
    }

    pub fn timer_remaining(&self, id: TimerId) -> Option<u32> {
        self.timers.remaining(id)
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Fires one of the item's events.
    ///
    /// `Enter` and `Leave` update the touched flag before any handler runs.
    pub fn fire(&mut self, event: ItemEvent) -> Result<()> {
        match event {
            ItemEvent::Enter => self.touched = true,
            ItemEvent::Leave => self.touched = false,
            ItemEvent::Timeout | ItemEvent::Removed => {}
        }

        for handler in self.events.snapshot(&event)? {
            handler(self).map_err(|e| EngineError::handler(event.as_ref(), e))?;
        }
        Ok(())
    }

    /// Fires an event by name; unknown names are rejected without dispatch.
    pub fn fire_named(&mut self, event: &str) -> Result<()> {
        let event = parse_event(event)?;
        self.fire(event)
    }

    /// True once `now` is past the item's lifespan.
    pub fn is_expired(&self, now: Tick) -> bool {
        self.life
            .is_some_and(|life| now.0 > self.created.0.saturating_add(life))
    }

    /// Daily update.
    ///
    /// An expired item is hidden and reported dead; removing it is up to the
    /// map. A live item advances its timers by one tick: each expired timer
    /// runs its own callback, then the generic `timeout` subscribers.
    pub fn check_alive(&mut self, now: Tick) -> Result<bool> {
        if self.is_expired(now) {
            self.hidden = true;
            debug!(item = %self.name, created = %self.created, now = %now, "item expired");
            return Ok(false);
        }

        for (id, callback) in self.timers.tick() {
            debug!(item = %self.name, timer = %id, "timer fired");
            callback(self).map_err(|e| EngineError::handler(ItemEvent::Timeout.as_ref(), e))?;
            self.fire(ItemEvent::Timeout)?;
        }
        Ok(true)
    }
}

fn parse_event(name: &str) -> Result<ItemEvent> {
    ItemEvent::from_str(name).map_err(|_| {
        warn!(event = name, "action not allowed, available: enter, leave, timeout, removed");
        EngineError::UnknownEvent(name.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn star() -> Item {
        Item::new(ItemSpec::new("star", "*"), Position::new(2, 3), Tick(0))
    }

    fn counter(item: &mut Item, event: ItemEvent) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        item.on(event, move |_| {
            seen.set(seen.get() + 1);
            Ok(())
        })
        .unwrap();
        count
    }

    #[test]
    fn empty_symbol_becomes_space() {
        let item = Item::new(ItemSpec::new("blank", ""), Position::ORIGIN, Tick(0));
        assert_eq!(item.symbol(), " ");
    }

    #[test]
    fn enter_and_leave_toggle_touched_before_handlers() {
        let mut item = star();
        let touched_during_enter = Rc::new(Cell::new(false));
        let observed = Rc::clone(&touched_during_enter);
        item.on(ItemEvent::Enter, move |i| {
            observed.set(i.is_touched());
            Ok(())
        })
        .unwrap();

        item.fire(ItemEvent::Enter).unwrap();
        assert!(touched_during_enter.get());
        assert!(item.is_touched());

        item.fire(ItemEvent::Leave).unwrap();
        assert!(!item.is_touched());
    }

    #[test]
    fn lifespan_is_inclusive() {
        let mut item = Item::new(
            ItemSpec::new("dollar", "$").with_life(10),
            Position::new(4, 15),
            Tick(3),
        );
        for t in 3..=13 {
            assert!(item.check_alive(Tick(t)).unwrap(), "alive at {t}");
        }
        assert!(!item.check_alive(Tick(14)).unwrap());
        assert!(item.is_hidden());
    }

    #[test]
    fn timer_runs_callback_then_timeout_subscribers() {
        let mut item = star();
        item.set_visible(false);
        let timeouts = counter(&mut item, ItemEvent::Timeout);
        let id = item
            .start_timer(2, |i| {
                i.set_visible(true);
                Ok(())
            })
            .unwrap();

        item.check_alive(Tick(1)).unwrap();
        assert!(item.is_hidden());
        assert_eq!(item.timer_remaining(id), Some(1));

        item.check_alive(Tick(2)).unwrap();
        assert!(!item.is_hidden());
        assert_eq!(timeouts.get(), 1);
        assert_eq!(item.timer_count(), 0);
        assert!(item.cancel_timer(id).is_err());
    }

    #[test]
    fn expired_item_does_not_tick_timers() {
        let mut item = Item::new(ItemSpec::new("x", "x").with_life(0), Position::ORIGIN, Tick(0));
        let timeouts = counter(&mut item, ItemEvent::Timeout);
        item.start_timer(1, |_| Ok(())).unwrap();

        assert!(!item.check_alive(Tick(1)).unwrap());
        assert_eq!(timeouts.get(), 0);
        assert_eq!(item.timer_count(), 1);
    }

    #[test]
    fn named_events_are_validated() {
        let mut item = star();
        let removed = counter(&mut item, ItemEvent::Removed);
        item.fire_named("removed").unwrap();
        assert_eq!(removed.get(), 1);
        assert!(matches!(
            item.fire_named("explode"),
            Err(EngineError::UnknownEvent(_))
        ));
        assert!(item
            .subscribe_named("explode", Rc::new(|_: &mut Item| -> HandlerResult { Ok(()) }))
            .is_err());
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut item = star();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let handler = item
            .on(ItemEvent::Removed, move |_| {
                seen.set(seen.get() + 1);
                Ok(())
            })
            .unwrap();
        item.unsubscribe(ItemEvent::Removed, &handler).unwrap();
        item.fire(ItemEvent::Removed).unwrap();
        assert_eq!(count.get(), 0);
        assert!(item.unsubscribe(ItemEvent::Removed, &handler).is_err());
    }
}
