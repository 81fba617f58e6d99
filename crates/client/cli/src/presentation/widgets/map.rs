//! Map widget rendering the tile grid with the character and visible items.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tile_core::{Engine, Position};

/// Render the map panel.
///
/// Priority: Character > visible Item > filler. Each tile is padded to the
/// configured pixel width by the engine.
pub fn render(frame: &mut Frame, area: Rect, engine: &Engine) {
    let config = engine.config();
    let character = engine.position();
    let mut rows = Vec::with_capacity(config.height);

    for x in 0..config.height {
        let spans: Vec<Span> = (0..config.width)
            .map(|y| {
                let position = Position::new(x as i32, y as i32);
                Span::styled(engine.tile_symbol(position), tile_style(engine, position, character))
            })
            .collect();
        rows.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(rows).block(Block::default().borders(Borders::ALL).title("Map"));

    frame.render_widget(paragraph, area);
}

fn tile_style(engine: &Engine, position: Position, character: Position) -> Style {
    if position == character {
        return Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
    }
    match engine.item(position) {
        Some(item) if !item.is_hidden() && item.is_blocking() => Style::default().fg(Color::Gray),
        Some(item) if !item.is_hidden() => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::DarkGray),
    }
}
