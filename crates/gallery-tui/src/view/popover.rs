use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;

const WIDTH: u16 = 38;
const HEIGHT: u16 = 10;

/// Count-entry popover, anchored under the Title column header.
pub fn render(f: &mut Frame, table_area: Rect, app: &App) {
    let theme = &app.theme;

    // Title column starts after the border and the checkbox column.
    let x = table_area.x.saturating_add(5);
    let y = table_area.y.saturating_add(2);
    let popup = Rect {
        x,
        y,
        width: WIDTH.min(table_area.right().saturating_sub(x)),
        height: HEIGHT.min(table_area.bottom().saturating_sub(y)),
    };
    if popup.width < 10 || popup.height < 3 {
        return;
    }

    let total = app.pager.total;
    let valid = app.popover.valid_count(total).is_some();
    let entry_style = if valid || app.popover.buffer.is_empty() {
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    };

    let hint = if total == 0 {
        Span::styled("waiting for the catalog size", Style::default().fg(theme.warning))
    } else if valid || app.popover.buffer.is_empty() {
        Span::styled(format!("1\u{2013}{total}"), Style::default().fg(theme.dim))
    } else {
        Span::styled(
            format!("enter a number from 1 to {total}"),
            Style::default().fg(theme.error),
        )
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(" Select first: ", Style::default().fg(theme.dim)),
            Span::styled(app.popover.buffer.clone(), entry_style),
            Span::styled("\u{2588}", Style::default().fg(theme.active)),
        ]),
        Line::from(vec![Span::raw(" "), hint]),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", app.strategy.description()),
            Style::default().fg(theme.dim),
        )),
        Line::from(vec![
            Span::styled(
                " Enter",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": submit  ", Style::default().fg(theme.dim)),
            Span::styled(
                "Esc",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": close", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Select rows "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
