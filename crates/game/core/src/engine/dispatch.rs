use std::rc::Rc;

use tracing::{debug, error, warn};

use super::Engine;
use crate::config::InputMode;
use crate::error::{EngineError, HandlerResult, Result};
use crate::event::Handler;
use crate::input::{control_direction, Key, KeyAction, RawInput};

/// Key binding and input dispatch methods for Engine.
impl Engine {
    /// Binds a callback to a key name and action name (`press`/`release`).
    ///
    /// Key names are resolved for the current input mode. Line mode has no
    /// releases, so every binding there is a press binding.
    pub fn bind<F>(&mut self, key: &str, action: &str, callback: F) -> Result<Handler<Engine>>
    where
        F: Fn(&mut Engine) -> HandlerResult + 'static,
    {
        let handler: Handler<Engine> = Rc::new(callback);
        let (key, action) = self.resolve_binding(key, action)?;
        self.bind_key(key, action, handler.clone());
        Ok(handler)
    }

    /// Typed form of [`bind`](Self::bind).
    pub fn bind_key(&mut self, key: Key, action: KeyAction, handler: Handler<Engine>) {
        let action = self.effective_action(action);
        self.bindings.bind(key, action, handler);
    }

    /// Removes the first binding of `handler` for this key and action.
    pub fn unbind(&mut self, key: &str, action: &str, handler: &Handler<Engine>) -> Result<()> {
        let (key, action) = self.resolve_binding(key, action)?;
        self.bindings.unbind(&key, action, handler)
    }

    pub fn binding_count(&self, key: &Key, action: KeyAction) -> usize {
        self.bindings.count(key, action)
    }

    /// Handles one raw input event.
    ///
    /// A press of a control key moves the character while the map layer is
    /// active. Then every callback bound to the exact key and action runs in
    /// registration order. Returns whether anything was triggered.
    pub fn dispatch_input(&mut self, input: RawInput) -> Result<bool> {
        debug!(%input, "received event");
        let RawInput { key, action } = input;
        let action = self.effective_action(action);
        let mut handled = false;

        if action == KeyAction::Press && self.layers.is_map_active() {
            if let Some(direction) = control_direction(&key) {
                self.move_character(direction)?;
                handled = true;
            }
        }

        for handler in self.bindings.snapshot(&key, action) {
            handler(self).map_err(|e| EngineError::handler(format!("{action} {key}"), e))?;
            handled = true;
        }
        Ok(handled)
    }

    /// Switches the input mode by name.
    ///
    /// An unsupported name is fatal for the session: the engine ends and the
    /// error is returned.
    pub fn set_input_mode(&mut self, name: &str) -> Result<()> {
        match InputMode::parse(name) {
            Ok(mode) => {
                self.config.input_mode = mode;
                debug!(input = %mode, "input mode set");
                Ok(())
            }
            Err(e) => {
                error!(input = name, "input system not supported, available: keypress, line");
                self.end()?;
                Err(e)
            }
        }
    }

    fn resolve_binding(&self, key: &str, action: &str) -> Result<(Key, KeyAction)> {
        let action = KeyAction::parse(action).inspect_err(|_| {
            warn!(action, "action not allowed, callback not subscribed");
        })?;
        let key = Key::parse(self.config.input_mode, key).inspect_err(|_| {
            warn!(key, "unknown key name, callback not subscribed");
        })?;
        Ok((key, self.effective_action(action)))
    }

    fn effective_action(&self, action: KeyAction) -> KeyAction {
        match self.config.input_mode {
            InputMode::Line => KeyAction::Press,
            InputMode::Keypress => action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::input::NamedKey;
    use crate::layer::{AddLayerOptions, SwitchOptions};
    use crate::types::Position;
    use std::cell::Cell;

    fn engine(mode: InputMode) -> Engine {
        Engine::new(EngineConfig::default().with_input_mode(mode))
            .unwrap()
            .with_map_renderer(|_: &Engine| -> HandlerResult { Ok(()) })
    }

    fn counter(engine: &mut Engine, key: &str, action: &str) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        engine
            .bind(key, action, move |_| {
                seen.set(seen.get() + 1);
                Ok(())
            })
            .unwrap();
        count
    }

    #[test]
    fn control_key_moves_on_map_layer() {
        let mut engine = engine(InputMode::Keypress);
        assert!(engine
            .dispatch_input(RawInput::press(Key::Named(NamedKey::Up)))
            .unwrap());
        assert_eq!(engine.position(), Position::new(4, 20));

        assert!(!engine
            .dispatch_input(RawInput::release(Key::Named(NamedKey::Up)))
            .unwrap());
        assert_eq!(engine.position(), Position::new(4, 20));
    }

    #[test]
    fn control_key_press_moves_and_runs_bindings_release_only_runs_bindings() {
        let mut engine = engine(InputMode::Keypress);
        let presses = counter(&mut engine, "w", "press");
        let releases = counter(&mut engine, "w", "release");

        assert!(engine.dispatch_input(RawInput::press(Key::Char('w'))).unwrap());
        assert_eq!(engine.position(), Position::new(4, 20));
        assert_eq!((presses.get(), releases.get()), (1, 0));

        assert!(engine.dispatch_input(RawInput::release(Key::Char('w'))).unwrap());
        assert_eq!(engine.position(), Position::new(4, 20));
        assert_eq!((presses.get(), releases.get()), (1, 1));
    }

    #[test]
    fn control_key_on_other_layer_only_runs_bindings() {
        let mut engine = engine(InputMode::Keypress);
        engine
            .add_layer(
                "backpack",
                |_: &Engine| -> HandlerResult { Ok(()) },
                AddLayerOptions::default(),
            )
            .unwrap();
        engine
            .switch_layer("backpack", SwitchOptions::default())
            .unwrap();
        let presses = counter(&mut engine, "w", "press");

        assert!(engine.dispatch_input(RawInput::press(Key::Char('w'))).unwrap());
        assert_eq!(presses.get(), 1);
        assert_eq!(engine.position(), Position::new(5, 20));
    }

    #[test]
    fn unbound_key_is_not_handled() {
        let mut engine = engine(InputMode::Keypress);
        assert!(!engine.dispatch_input(RawInput::press(Key::Char('q'))).unwrap());
    }

    #[test]
    fn bind_validates_names() {
        let mut engine = engine(InputMode::Keypress);
        assert!(matches!(
            engine.bind("t", "hold", |_| Ok(())),
            Err(EngineError::UnknownAction(_))
        ));
        assert!(matches!(
            engine.bind("hyper", "press", |_| Ok(())),
            Err(EngineError::UnknownKey(_))
        ));
    }

    #[test]
    fn unbind_stops_callback() {
        let mut engine = engine(InputMode::Keypress);
        let handler = engine.bind("t", "press", |_| Ok(())).unwrap();
        engine.unbind("t", "press", &handler).unwrap();
        assert!(!engine.dispatch_input(RawInput::press(Key::Char('t'))).unwrap());
        assert!(matches!(
            engine.unbind("t", "press", &handler),
            Err(EngineError::BindingNotFound { .. })
        ));
    }

    #[test]
    fn line_mode_forces_press() {
        let mut engine = engine(InputMode::Line);
        let hits = counter(&mut engine, "Quit", "release");
        assert_eq!(engine.binding_count(&Key::Line("quit".into()), KeyAction::Press), 1);

        assert!(engine
            .dispatch_input(RawInput::press(Key::Line("quit".into())))
            .unwrap());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn failing_binding_propagates() {
        let mut engine = engine(InputMode::Keypress);
        engine
            .bind("x", "press", |_| anyhow::bail!("exploded"))
            .unwrap();
        let err = engine
            .dispatch_input(RawInput::press(Key::Char('x')))
            .unwrap_err();
        assert!(matches!(err, EngineError::Handler { .. }));
    }

    #[test]
    fn unsupported_input_mode_ends_session() {
        let mut engine = engine(InputMode::Keypress);
        let ended = Rc::new(Cell::new(false));
        let seen = Rc::clone(&ended);
        engine
            .on(crate::event::EngineEvent::OnEnd, move |_| {
                seen.set(true);
                Ok(())
            })
            .unwrap();

        engine.set_input_mode("stdin").unwrap();
        assert_eq!(engine.input_mode(), InputMode::Line);

        assert!(matches!(
            engine.set_input_mode("curses"),
            Err(EngineError::UnsupportedInput(_))
        ));
        assert!(engine.is_ended());
        assert!(ended.get());
    }
}
