//! Backpack widget listing the names the game stored on the engine.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem},
};
use tile_core::Engine;

pub fn render(frame: &mut Frame, area: Rect, engine: &Engine) {
    let items: Vec<ListItem> = if engine.backpack().is_empty() {
        vec![ListItem::new("(empty)").style(Style::default().fg(Color::DarkGray))]
    } else {
        engine
            .backpack()
            .iter()
            .map(|name| ListItem::new(format!("- {name}")))
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" You are in your backpack! "),
    );

    frame.render_widget(list, area);
}
