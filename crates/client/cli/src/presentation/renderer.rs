//! Layer renderers installed on the engine by the demo.
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use tile_core::{Engine, HandlerResult, Renderer, map_frame};

use super::terminal::Tui;
use super::ui::{self, Screen};
use crate::messages::{MessageLog, format_message};

/// Draws the full ratatui view for one screen.
///
/// Both layers of the demo share one terminal, hence the shared handle.
pub struct TuiRenderer {
    terminal: Rc<RefCell<Tui>>,
    messages: MessageLog,
    screen: Screen,
}

impl TuiRenderer {
    pub fn new(terminal: Rc<RefCell<Tui>>, messages: MessageLog, screen: Screen) -> Self {
        Self {
            terminal,
            messages,
            screen,
        }
    }
}

impl Renderer for TuiRenderer {
    fn render(&mut self, engine: &Engine) -> HandlerResult {
        self.terminal
            .borrow_mut()
            .draw(|frame| ui::draw(frame, engine, &self.messages, self.screen))?;
        Ok(())
    }
}

/// Line-mode renderer: prints the screen, then flushes pending messages.
pub struct PlainRenderer {
    out: Box<dyn Write>,
    messages: MessageLog,
    screen: Screen,
}

impl PlainRenderer {
    pub fn new(out: Box<dyn Write>, messages: MessageLog, screen: Screen) -> Self {
        Self {
            out,
            messages,
            screen,
        }
    }

    pub fn stdout(messages: MessageLog, screen: Screen) -> Self {
        Self::new(Box::new(io::stdout()), messages, screen)
    }
}

impl Renderer for PlainRenderer {
    fn render(&mut self, engine: &Engine) -> HandlerResult {
        write_frame(&mut self.out, engine, &self.messages, self.screen)?;
        Ok(())
    }
}

/// Writes one plain-text frame and drains the message log into it.
pub fn write_frame<W: Write + ?Sized>(
    out: &mut W,
    engine: &Engine,
    messages: &MessageLog,
    screen: Screen,
) -> io::Result<()> {
    for entry in messages.drain() {
        writeln!(out, "{}", format_message(&entry))?;
    }

    match screen {
        Screen::Map => {
            writeln!(out)?;
            for line in map_frame(engine) {
                writeln!(out, "{line}")?;
            }
        }
        Screen::Backpack => {
            writeln!(out)?;
            writeln!(out, "---------------------------------")?;
            writeln!(out, "You are in your backpack!")?;
            writeln!(out, "{:?}", engine.backpack())?;
            writeln!(out, "---------------------------------")?;
            writeln!(out)?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_core::EngineConfig;

    fn engine() -> Engine {
        Engine::new(EngineConfig::new(3, 1))
            .unwrap()
            .with_map_renderer(|_: &Engine| -> HandlerResult { Ok(()) })
    }

    #[test]
    fn map_frame_follows_pending_messages() {
        let engine = engine();
        let messages = MessageLog::new(4);
        messages.push_text("*** Game start ***");

        let mut out = Vec::new();
        write_frame(&mut out, &engine, &messages, Screen::Map).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "*** Game start ***\n\ntime:   0\n.---.\n| x |\n'---'\n"
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn backpack_screen_prints_contents() {
        let mut engine = engine();
        engine.backpack_mut().push("key".into());

        let mut out = Vec::new();
        write_frame(&mut out, &engine, &MessageLog::new(1), Screen::Backpack).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("You are in your backpack!"));
        assert!(text.contains("[\"key\"]"));
    }
}
