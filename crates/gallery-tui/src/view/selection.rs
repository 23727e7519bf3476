use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::app::{App, Focus};
use crate::view::{one_line, truncate};

/// Side panel listing every selected artwork, across all pages.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let width = (area.width as usize).saturating_sub(4);

    let items: Vec<ListItem> = app
        .selection
        .items()
        .iter()
        .map(|r| {
            let mut lines = vec![Line::from(Span::styled(
                truncate(&r.title, width),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ))];
            let artist = one_line(&r.artist_display);
            if !artist.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", truncate(&artist, width.saturating_sub(2))),
                    Style::default().fg(theme.dim),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let focused = app.focus == Focus::Panel;
    let border_style = if focused {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!(" Selected Artworks ({}) ", app.selection.len())),
        )
        .highlight_style(theme.highlight_style())
        .highlight_symbol("\u{25b8} ");

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.panel_cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}
