//! Glue code tying the engine, input sources, and terminal UI together.
mod game;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use tile_core::{Engine, InputMode};
use tracing::info;

use crate::config::CliConfig;
use crate::input::{KeypressInput, LineInput};
use crate::messages::{MessageLog, format_message};
use crate::presentation::{PlainRenderer, Screen, TuiRenderer, terminal};

pub struct CliApp {
    config: CliConfig,
    messages: MessageLog,
}

impl CliApp {
    pub fn new(config: CliConfig) -> Self {
        let messages = MessageLog::new(config.message_capacity);
        Self { config, messages }
    }

    pub fn run(self) -> Result<()> {
        info!("tile demo starting...");

        let engine_config = self
            .config
            .engine
            .clone()
            .with_input_mode(self.config.initial_input_mode());
        let mut engine = Engine::new(engine_config)?;
        if let Some(name) = self.config.input.as_deref() {
            engine.set_input_mode(name)?;
        }

        match engine.input_mode() {
            InputMode::Keypress => self.run_terminal(engine)?,
            InputMode::Line => self.run_plain(engine)?,
        }

        if !self.messages.is_empty() {
            println!();
        }
        for entry in self.messages.drain() {
            println!("{}", format_message(&entry));
        }
        info!("tile demo exiting");
        Ok(())
    }

    fn run_terminal(&self, engine: Engine) -> Result<()> {
        let terminal = Rc::new(RefCell::new(terminal::init()?));
        let guard = terminal::TerminalGuard::new();

        let map = TuiRenderer::new(Rc::clone(&terminal), self.messages.clone(), Screen::Map);
        let backpack =
            TuiRenderer::new(Rc::clone(&terminal), self.messages.clone(), Screen::Backpack);

        let mut engine = engine.with_map_renderer(map);
        game::setup(&mut engine, &self.messages, backpack)?;
        game::play(&mut engine, KeypressInput::new(), &self.messages)?;

        guard.finish()
    }

    fn run_plain(&self, engine: Engine) -> Result<()> {
        let map = PlainRenderer::stdout(self.messages.clone(), Screen::Map);
        let backpack = PlainRenderer::stdout(self.messages.clone(), Screen::Backpack);

        let mut engine = engine.with_map_renderer(map);
        game::setup(&mut engine, &self.messages, backpack)?;
        game::play(&mut engine, LineInput::stdin(), &self.messages)
    }
}
