//! Countdown timers owned by the engine or by an item.
//!
//! A [`TimerRegistry`] only does the bookkeeping. The callback needs mutable
//! access to the owner that also holds the registry, so [`TimerRegistry::tick`]
//! hands expired callbacks back to the owner to invoke.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::{EngineError, HandlerResult, Result};

/// One-shot timer callback, invoked with the owning object.
pub type TimerCallback<O> = Box<dyn FnOnce(&mut O) -> HandlerResult>;

/// Identifier of a live timer, unique within its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Timer<O> {
    remaining: u32,
    callback: TimerCallback<O>,
}

/// Timers keyed by id. Ids come from a monotonic counter and are never reused.
pub struct TimerRegistry<O> {
    timers: BTreeMap<TimerId, Timer<O>>,
    next_id: u64,
}

impl<O> TimerRegistry<O> {
    pub fn new() -> Self {
        Self {
            timers: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Starts a timer that fires after `ticks` calls to [`tick`](Self::tick).
    pub fn start<F>(&mut self, ticks: u32, callback: F) -> Result<TimerId>
    where
        F: FnOnce(&mut O) -> HandlerResult + 'static,
    {
        if ticks == 0 {
            return Err(EngineError::InvalidDuration(ticks));
        }

        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id,
            Timer {
                remaining: ticks,
                callback: Box::new(callback),
            },
        );
        debug!(timer = %id, ticks, "timer started");
        Ok(id)
    }

    /// Removes a live timer without firing it.
    pub fn cancel(&mut self, id: TimerId) -> Result<()> {
        match self.timers.remove(&id) {
            Some(_) => {
                debug!(timer = %id, "timer removed");
                Ok(())
            }
            None => Err(EngineError::TimerNotFound(id.0)),
        }
    }

    /// Ticks left before the timer fires.
    pub fn remaining(&self, id: TimerId) -> Option<u32> {
        self.timers.get(&id).map(|t| t.remaining)
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Decrements every live timer by one and removes the ones that reached
    /// zero, returning their callbacks in ascending id order.
    ///
    /// The caller is responsible for invoking the returned callbacks.
    pub fn tick(&mut self) -> Vec<(TimerId, TimerCallback<O>)> {
        let mut due = Vec::new();
        for (id, timer) in self.timers.iter_mut() {
            timer.remaining = timer.remaining.saturating_sub(1);
            if timer.remaining == 0 {
                due.push(*id);
            }
        }

        due.into_iter()
            .filter_map(|id| self.timers.remove(&id).map(|t| (id, t.callback)))
            .collect()
    }
}

impl<O> Default for TimerRegistry<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for TimerRegistry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.timers.iter().map(|(id, t)| (id, t.remaining)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        fired: Vec<&'static str>,
    }

    fn run(registry: &mut TimerRegistry<Counter>, owner: &mut Counter) {
        for (_, callback) in registry.tick() {
            callback(owner).unwrap();
        }
    }

    #[test]
    fn fires_exactly_once_on_nth_tick() {
        let mut registry = TimerRegistry::new();
        let mut owner = Counter::default();
        registry
            .start(3, |c: &mut Counter| {
                c.fired.push("three");
                Ok(())
            })
            .unwrap();

        run(&mut registry, &mut owner);
        run(&mut registry, &mut owner);
        assert!(owner.fired.is_empty());

        run(&mut registry, &mut owner);
        assert_eq!(owner.fired, vec!["three"]);
        assert!(registry.is_empty());

        run(&mut registry, &mut owner);
        assert_eq!(owner.fired.len(), 1);
    }

    #[test]
    fn simultaneous_expiry_runs_in_id_order() {
        let mut registry = TimerRegistry::new();
        let mut owner = Counter::default();
        registry
            .start(1, |c: &mut Counter| {
                c.fired.push("first");
                Ok(())
            })
            .unwrap();
        registry
            .start(1, |c: &mut Counter| {
                c.fired.push("second");
                Ok(())
            })
            .unwrap();

        run(&mut registry, &mut owner);
        assert_eq!(owner.fired, vec!["first", "second"]);
    }

    #[test]
    fn ids_are_unique_and_cancel_checks_existence() {
        let mut registry: TimerRegistry<Counter> = TimerRegistry::new();
        let a = registry.start(5, |_| Ok(())).unwrap();
        let b = registry.start(5, |_| Ok(())).unwrap();
        assert_ne!(a, b);

        registry.cancel(a).unwrap();
        assert!(!registry.contains(a));
        assert!(matches!(
            registry.cancel(a),
            Err(EngineError::TimerNotFound(_))
        ));
        assert_eq!(registry.remaining(b), Some(5));
    }

    #[test]
    fn rejects_zero_ticks() {
        let mut registry: TimerRegistry<Counter> = TimerRegistry::new();
        assert!(matches!(
            registry.start(0, |_| Ok(())),
            Err(EngineError::InvalidDuration(0))
        ));
    }
}
