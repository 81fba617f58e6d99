use std::io;

use crossterm::event::{self as term_event, Event as TermEvent};
use tile_core::{InputSource, RawInput};
use tracing::debug;

use super::{is_interrupt, translate};

/// Blocking keypress source over `crossterm` events.
///
/// Release events only arrive when the terminal supports the keyboard
/// enhancement protocol (see [`crate::presentation::terminal::init`]).
#[derive(Debug, Default)]
pub struct KeypressInput;

impl KeypressInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for KeypressInput {
    fn poll(&mut self) -> io::Result<Option<RawInput>> {
        loop {
            let TermEvent::Key(key) = term_event::read()? else {
                continue;
            };
            if is_interrupt(&key) {
                debug!("interrupted from keyboard");
                return Ok(None);
            }
            if let Some(input) = translate(key) {
                return Ok(Some(input));
            }
        }
    }
}
