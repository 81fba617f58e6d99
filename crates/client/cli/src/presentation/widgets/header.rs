//! Header widget: clock, active layer, character position.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tile_core::Engine;

pub fn render(frame: &mut Frame, area: Rect, engine: &Engine) {
    let line = Line::from(vec![
        Span::styled(
            format!("time: {:3}", engine.timestamp().0),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | layer: "),
        Span::styled(engine.active_layer().to_owned(), Style::default().fg(Color::Cyan)),
        Span::raw(format!(" | position: {}", engine.position())),
    ]);

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}
