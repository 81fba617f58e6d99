//! Frame layout and panel composition for the ratatui view.
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use tile_core::Engine;

use super::widgets::{self, messages::MESSAGE_PANEL_HEIGHT};
use crate::messages::MessageLog;

/// Body shown between the header and the message panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Map,
    Backpack,
}

pub fn draw(frame: &mut Frame, engine: &Engine, messages: &MessageLog, screen: Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(MESSAGE_PANEL_HEIGHT),
            Constraint::Length(3),
        ])
        .split(frame.area());

    widgets::header::render(frame, chunks[0], engine);
    match screen {
        Screen::Map => widgets::map::render(frame, chunks[1], engine),
        Screen::Backpack => widgets::backpack::render(frame, chunks[1], engine),
    }
    widgets::messages::render(frame, chunks[2], messages);
    widgets::footer::render(frame, chunks[3], engine);
}
