use tracing::{debug, info};

use super::{Engine, Phase};
use crate::error::{EngineError, Result};
use crate::event::{EngineEvent, ItemEvent};
use crate::input::InputSource;
use crate::types::Tick;

/// Turn loop methods for Engine.
impl Engine {
    /// Starts the session, firing `onstart` exactly once.
    ///
    /// Returns the current timestamp, or `None` once the session has ended.
    pub fn start(&mut self) -> Result<Option<Tick>> {
        match self.phase {
            Phase::Ended => return Ok(None),
            Phase::Running => return Ok(Some(self.timestamp)),
            Phase::Ready => {}
        }
        self.phase = Phase::Running;
        debug!("session started");
        self.fire(EngineEvent::OnStart)?;
        Ok(self.current())
    }

    /// Plays one turn: render, read input until something reacts, advance.
    ///
    /// Returns the new timestamp, or `None` when the session ended during the
    /// turn or the input source ran dry. A session that was not started yet
    /// is started first.
    pub fn step(&mut self, input: &mut dyn InputSource) -> Result<Option<Tick>> {
        if self.phase == Phase::Ready && self.start()?.is_none() {
            return Ok(None);
        }
        if self.is_ended() {
            return Ok(None);
        }

        self.render()?;

        loop {
            let Some(raw) = input.poll().map_err(EngineError::Input)? else {
                debug!("input exhausted");
                self.end()?;
                return Ok(None);
            };
            if self.dispatch_input(raw)? {
                break;
            }
        }

        if self.is_ended() {
            return Ok(None);
        }
        self.advance()?;
        Ok(self.current())
    }

    /// Advances the clock by one turn.
    ///
    /// Every item gets an enter/leave check against the character and then
    /// its daily update; expired items are removed. The whole item scan is
    /// skipped for one turn after a pausing layer switch. Engine timers tick
    /// last, then `step_end` fires.
    pub fn advance(&mut self) -> Result<Tick> {
        self.timestamp += 1;
        let now = self.timestamp;
        let paused = self.layers.take_pause();
        if paused {
            debug!(%now, "event check paused for this turn");
        }

        if !paused {
            self.scan_items(now)?;
        }

        for (id, callback) in self.timers.tick() {
            debug!(timer = %id, "timer fired");
            callback(self).map_err(|e| EngineError::handler(format!("timer {id}"), e))?;
        }

        self.fire(EngineEvent::StepEnd)?;
        Ok(now)
    }

    /// Lifecycle scan: enter/leave edge check, then the daily update, removing
    /// items that outlived their lifespan.
    fn scan_items(&mut self, now: Tick) -> Result<()> {
        let character = self.map.character();
        for position in self.map.occupied() {
            let Some(item) = self.map.get_mut(position) else {
                continue;
            };

            let here = position == character;
            if here && !item.is_touched() {
                item.fire(ItemEvent::Enter)?;
            } else if !here && item.is_touched() {
                item.fire(ItemEvent::Leave)?;
            }

            if !item.check_alive(now)? {
                self.map.clean_tile(position)?;
                self.fire(EngineEvent::UpdateMap)?;
            }
        }
        Ok(())
    }

    /// Ends the session: fires `onend` once and releases the loop.
    pub fn end(&mut self) -> Result<()> {
        if self.is_ended() {
            return Ok(());
        }
        self.phase = Phase::Ended;
        self.fire(EngineEvent::OnEnd)?;
        self.cleanup();
        Ok(())
    }

    fn cleanup(&mut self) {
        info!(timestamp = %self.timestamp, items = self.map.len(), "session ended");
    }

    fn current(&self) -> Option<Tick> {
        (!self.is_ended()).then_some(self.timestamp)
    }
}
