//! Footer widget displaying the key bindings of the demo.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tile_core::{Engine, MAP_LAYER};

/// Render the footer panel with key bindings help.
///
/// Movement keys are only listed while the map layer is active.
pub fn render(frame: &mut Frame, area: Rect, engine: &Engine) {
    let mut spans = Vec::new();
    if engine.active_layer() == MAP_LAYER {
        spans.push(Span::raw("[WASD/Arrows] Move | "));
        spans.push(Span::raw("[b] Backpack | "));
    } else {
        spans.push(Span::raw("[m] Map | "));
    }
    spans.push(Span::raw("[ESC] Quit"));

    let paragraph =
        Paragraph::new(vec![Line::from(spans)]).block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}
