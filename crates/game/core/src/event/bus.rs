//! Ordered subscriber lists keyed by event name.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::{EngineError, HandlerResult, Result};

/// Subscriber callback, invoked with the object that owns the bus.
///
/// Handlers are compared by reference identity on unsubscribe, so keep a clone
/// of the `Rc` you subscribed if you intend to remove it later.
pub type Handler<O> = Rc<dyn Fn(&mut O) -> HandlerResult>;

/// Event bus mapping each event name to its subscribers in subscription order.
///
/// The bus does not dispatch by itself: handlers need `&mut O` while the bus
/// lives inside `O`, so the owner takes a [`snapshot`](Self::snapshot) and
/// invokes the handlers. Subscriptions made during a dispatch take effect on
/// the next fire.
pub struct EventBus<K, O> {
    subscribers: HashMap<K, Vec<Handler<O>>>,
}

impl<K, O> EventBus<K, O>
where
    K: Clone + Eq + Hash + fmt::Display,
{
    /// Creates a bus with an empty subscriber list for every given event.
    pub fn with_events(events: impl IntoIterator<Item = K>) -> Self {
        Self {
            subscribers: events.into_iter().map(|k| (k, Vec::new())).collect(),
        }
    }

    /// Adds a new event name with no subscribers.
    pub fn register(&mut self, event: K) -> Result<()> {
        if self.subscribers.contains_key(&event) {
            warn!(%event, "event already existed");
            return Err(EngineError::DuplicateEvent(event.to_string()));
        }
        debug!(%event, "event added");
        self.subscribers.insert(event, Vec::new());
        Ok(())
    }

    pub fn contains(&self, event: &K) -> bool {
        self.subscribers.contains_key(event)
    }

    /// Appends a handler to the event's subscriber list.
    pub fn subscribe(&mut self, event: &K, handler: Handler<O>) -> Result<()> {
        if !self.subscribers.contains_key(event) {
            warn!(%event, available = %self.describe(), "event not exists, callback not subscribed");
            return Err(EngineError::UnknownEvent(event.to_string()));
        }
        let list = self.subscribers.entry(event.clone()).or_default();
        list.push(handler);
        debug!(%event, subscribers = list.len(), "callback subscribed");
        Ok(())
    }

    /// Removes the first subscription of `handler` (by identity).
    pub fn unsubscribe(&mut self, event: &K, handler: &Handler<O>) -> Result<()> {
        let Some(list) = self.subscribers.get_mut(event) else {
            warn!(%event, "event not found");
            return Err(EngineError::UnknownEvent(event.to_string()));
        };
        let Some(index) = list.iter().position(|h| Rc::ptr_eq(h, handler)) else {
            warn!(%event, "callback not found");
            return Err(EngineError::CallbackNotFound(event.to_string()));
        };
        list.remove(index);
        debug!(%event, "callback unsubscribed");
        Ok(())
    }

    /// Clones the current subscriber list for dispatch.
    pub fn snapshot(&self, event: &K) -> Result<Vec<Handler<O>>> {
        match self.subscribers.get(event) {
            Some(list) => Ok(list.clone()),
            None => {
                warn!(%event, "event not exist, event not fired");
                Err(EngineError::UnknownEvent(event.to_string()))
            }
        }
    }

    pub fn subscriber_count(&self, event: &K) -> usize {
        self.subscribers.get(event).map_or(0, Vec::len)
    }

    pub fn events(&self) -> impl Iterator<Item = &K> + '_ {
        self.subscribers.keys()
    }

    fn describe(&self) -> String {
        let mut names: Vec<String> = self.subscribers.keys().map(ToString::to_string).collect();
        names.sort();
        names.join(", ")
    }
}

impl<K, O> fmt::Debug for EventBus<K, O>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.subscribers.iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Bus = EventBus<String, Vec<u8>>;

    fn push(value: u8) -> Handler<Vec<u8>> {
        Rc::new(move |log: &mut Vec<u8>| {
            log.push(value);
            Ok(())
        })
    }

    fn dispatch(bus: &Bus, event: &str, owner: &mut Vec<u8>) -> Result<()> {
        for handler in bus.snapshot(&event.to_string())? {
            handler(owner).map_err(|e| EngineError::handler(event, e))?;
        }
        Ok(())
    }

    #[test]
    fn handlers_run_in_subscription_order() {
        let mut bus = Bus::with_events(["tick".to_string()]);
        let key = "tick".to_string();
        bus.subscribe(&key, push(1)).unwrap();
        bus.subscribe(&key, push(2)).unwrap();

        let mut log = Vec::new();
        dispatch(&bus, "tick", &mut log).unwrap();
        assert_eq!(log, vec![1, 2]);
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut bus = Bus::with_events(["tick".to_string()]);
        assert!(matches!(
            bus.register("tick".into()),
            Err(EngineError::DuplicateEvent(_))
        ));
        bus.register("tock".into()).unwrap();
        assert!(bus.contains(&"tock".to_string()));
    }

    #[test]
    fn unsubscribe_uses_identity_and_removes_first_match() {
        let mut bus = Bus::with_events(["tick".to_string()]);
        let key = "tick".to_string();
        let handler = push(9);
        let lookalike = push(9);
        bus.subscribe(&key, handler.clone()).unwrap();
        bus.subscribe(&key, handler.clone()).unwrap();

        assert!(matches!(
            bus.unsubscribe(&key, &lookalike),
            Err(EngineError::CallbackNotFound(_))
        ));
        bus.unsubscribe(&key, &handler).unwrap();
        assert_eq!(bus.subscriber_count(&key), 1);
    }

    #[test]
    fn unknown_events_are_rejected() {
        let mut bus = Bus::with_events(Vec::new());
        let key = "missing".to_string();
        assert!(bus.subscribe(&key, push(1)).is_err());
        assert!(bus.snapshot(&key).is_err());
    }

    #[test]
    fn failing_handler_stops_dispatch() {
        let mut bus = Bus::with_events(["tick".to_string()]);
        let key = "tick".to_string();
        bus.subscribe(&key, push(1)).unwrap();
        bus.subscribe(
            &key,
            Rc::new(|_: &mut Vec<u8>| -> HandlerResult { anyhow::bail!("boom") }),
        )
        .unwrap();
        bus.subscribe(&key, push(3)).unwrap();

        let mut log = Vec::new();
        let err = dispatch(&bus, "tick", &mut log).unwrap_err();
        assert!(matches!(err, EngineError::Handler { .. }));
        assert_eq!(log, vec![1]);
    }
}
