use std::io::{self, BufRead, StdinLock};

use tile_core::{InputMode, InputSource, Key, RawInput};

/// Line-based source: every line is one lower-cased key press.
#[derive(Debug)]
pub struct LineInput<R> {
    reader: R,
    buffer: String,
}

impl LineInput<StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
        }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn poll(&mut self) -> io::Result<Option<RawInput>> {
        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        let line = self.buffer.trim_end_matches(['\n', '\r']);
        let key = Key::parse(InputMode::Line, line).map_err(io::Error::other)?;
        Ok(Some(RawInput::press(key)))
    }
}
