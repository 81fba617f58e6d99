use super::Engine;
use crate::error::Result;
use crate::input::InputSource;
use crate::types::Tick;

/// Iterator over the turns of a session.
///
/// The first item is the starting timestamp (after `onstart`); every further
/// item is the timestamp after one played turn. Iteration stops once the
/// engine ends or an error is yielded. Between items the host may reach the
/// engine through [`engine_mut`](Self::engine_mut):
///
/// ```
/// use tile_core::{Engine, EngineConfig, HandlerResult, InputMode, ScriptedInput};
///
/// let mut engine = Engine::new(EngineConfig::default())
///     .unwrap()
///     .with_map_renderer(|_: &Engine| -> HandlerResult { Ok(()) });
/// let input = ScriptedInput::presses(InputMode::Keypress, ["w", "a"]).unwrap();
///
/// let mut session = engine.session(input);
/// let mut days = Vec::new();
/// while let Some(day) = session.next() {
///     days.push(day.unwrap().0);
///     session.engine_mut().backpack_mut().push(format!("day {}", days.len()));
/// }
/// assert_eq!(days, vec![0, 1, 2]);
/// assert!(engine.is_ended());
/// ```
pub struct Session<'e, S> {
    engine: &'e mut Engine,
    input: S,
    started: bool,
    finished: bool,
}

impl<'e, S: InputSource> Session<'e, S> {
    pub fn new(engine: &'e mut Engine, input: S) -> Self {
        Self {
            engine,
            input,
            started: false,
            finished: false,
        }
    }

    pub fn engine(&self) -> &Engine {
        self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        self.engine
    }

    pub fn input_mut(&mut self) -> &mut S {
        &mut self.input
    }
}

impl<S: InputSource> Iterator for Session<'_, S> {
    type Item = Result<Tick>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = if self.started {
            self.engine.step(&mut self.input)
        } else {
            self.started = true;
            self.engine.start()
        };

        match result {
            Ok(Some(tick)) => Some(Ok(tick)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl Engine {
    /// Wraps the engine and an input source into a turn iterator.
    pub fn session<S: InputSource>(&mut self, input: S) -> Session<'_, S> {
        Session::new(self, input)
    }
}
