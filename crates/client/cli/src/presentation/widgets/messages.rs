//! Message panel: the newest entries of the shared log, newest at the bottom.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListDirection, ListItem},
};

use crate::messages::{MessageEntry, MessageLevel, MessageLog, format_message};

/// Height of message panel in lines, borders included.
pub const MESSAGE_PANEL_HEIGHT: u16 = 5;

pub fn render(frame: &mut Frame, area: Rect, messages: &MessageLog) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = messages.recent(visible).iter().map(entry_item).collect();

    let title = format!("Messages ({})", messages.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .direction(ListDirection::BottomToTop);

    frame.render_widget(list, area);
}

fn entry_item(entry: &MessageEntry) -> ListItem<'static> {
    let line = match entry.level {
        MessageLevel::Info => Line::from(format_message(entry)),
        MessageLevel::Warning => Line::from(vec![
            Span::styled("! ", Style::default().fg(Color::Red)),
            Span::styled(format_message(entry), Style::default().fg(Color::Yellow)),
        ]),
    };
    ListItem::new(line)
}
