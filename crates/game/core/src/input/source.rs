use std::collections::VecDeque;
use std::io;

use super::{Key, RawInput};
use crate::config::InputMode;
use crate::error::Result;

/// Pull-based provider of raw input events.
///
/// `poll` may block until an event arrives. `Ok(None)` means the source is
/// exhausted (e.g. end of stdin) and the session should end.
pub trait InputSource {
    fn poll(&mut self) -> io::Result<Option<RawInput>>;
}

impl<S: InputSource + ?Sized> InputSource for &mut S {
    fn poll(&mut self) -> io::Result<Option<RawInput>> {
        (**self).poll()
    }
}

impl<S: InputSource + ?Sized> InputSource for Box<S> {
    fn poll(&mut self) -> io::Result<Option<RawInput>> {
        (**self).poll()
    }
}

/// Replays a fixed queue of events, then reports exhaustion.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    queue: VecDeque<RawInput>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = RawInput>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    /// Builds a script of presses from key names.
    pub fn presses<'a>(mode: InputMode, keys: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let queue = keys
            .into_iter()
            .map(|name| Key::parse(mode, name).map(RawInput::press))
            .collect::<Result<_>>()?;
        Ok(Self { queue })
    }

    pub fn push(&mut self, event: RawInput) {
        self.queue.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> io::Result<Option<RawInput>> {
        Ok(self.queue.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyAction, NamedKey};

    #[test]
    fn scripted_input_drains_in_order() {
        let mut input = ScriptedInput::presses(InputMode::Keypress, ["w", "esc"]).unwrap();
        input.push(RawInput::release(Key::Char('w')));

        assert_eq!(input.poll().unwrap(), Some(RawInput::press(Key::Char('w'))));
        assert_eq!(
            input.poll().unwrap(),
            Some(RawInput::press(Key::Named(NamedKey::Esc)))
        );
        let last = input.poll().unwrap().unwrap();
        assert_eq!(last.action, KeyAction::Release);
        assert_eq!(input.poll().unwrap(), None);
    }
}
