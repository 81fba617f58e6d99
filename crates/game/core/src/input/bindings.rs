use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use super::{Key, KeyAction};
use crate::error::{EngineError, Result};
use crate::event::Handler;

/// Callbacks bound to exact `(key, action)` pairs, in registration order.
pub struct KeyBindings<O> {
    table: HashMap<(Key, KeyAction), Vec<Handler<O>>>,
}

impl<O> KeyBindings<O> {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    pub fn bind(&mut self, key: Key, action: KeyAction, handler: Handler<O>) {
        debug!(%key, %action, "key event subscribed");
        self.table.entry((key, action)).or_default().push(handler);
    }

    /// Removes the first binding of `handler` (by identity) for this pair.
    pub fn unbind(&mut self, key: &Key, action: KeyAction, handler: &Handler<O>) -> Result<()> {
        let pair = (key.clone(), action);
        let index = self
            .table
            .get(&pair)
            .and_then(|list| list.iter().position(|h| Rc::ptr_eq(h, handler)));

        match (index, self.table.get_mut(&pair)) {
            (Some(index), Some(list)) => {
                list.remove(index);
                if list.is_empty() {
                    self.table.remove(&pair);
                }
                debug!(%key, %action, "key event unsubscribed");
                Ok(())
            }
            _ => {
                warn!(%key, %action, "callback not found");
                Err(EngineError::BindingNotFound {
                    key: key.to_string(),
                    action: action.to_string(),
                })
            }
        }
    }

    /// Clones the handlers bound to this pair for dispatch.
    pub fn snapshot(&self, key: &Key, action: KeyAction) -> Vec<Handler<O>> {
        self.table
            .get(&(key.clone(), action))
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, key: &Key, action: KeyAction) -> usize {
        self.table
            .get(&(key.clone(), action))
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<O> Default for KeyBindings<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for KeyBindings<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.table
                    .iter()
                    .map(|((key, action), list)| (format!("{action} {key}"), list.len())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerResult;

    fn noop() -> Handler<u32> {
        Rc::new(|n: &mut u32| -> HandlerResult {
            *n += 1;
            Ok(())
        })
    }

    #[test]
    fn bindings_are_per_key_and_action() {
        let mut bindings = KeyBindings::new();
        let handler = noop();
        bindings.bind(Key::Char('t'), KeyAction::Press, handler.clone());

        assert_eq!(bindings.count(&Key::Char('t'), KeyAction::Press), 1);
        assert!(bindings.snapshot(&Key::Char('t'), KeyAction::Release).is_empty());
        assert!(bindings.snapshot(&Key::Char('u'), KeyAction::Press).is_empty());

        let mut hits = 0;
        for h in bindings.snapshot(&Key::Char('t'), KeyAction::Press) {
            h(&mut hits).unwrap();
        }
        assert_eq!(hits, 1);
    }

    #[test]
    fn unbind_removes_by_identity() {
        let mut bindings = KeyBindings::new();
        let handler = noop();
        bindings.bind(Key::Char('t'), KeyAction::Press, handler.clone());

        assert!(matches!(
            bindings.unbind(&Key::Char('t'), KeyAction::Press, &noop()),
            Err(EngineError::BindingNotFound { .. })
        ));
        bindings
            .unbind(&Key::Char('t'), KeyAction::Press, &handler)
            .unwrap();
        assert!(bindings.is_empty());
        assert!(bindings
            .unbind(&Key::Char('t'), KeyAction::Press, &handler)
            .is_err());
    }
}
