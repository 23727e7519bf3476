use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use gallery_core::Record;

use crate::app::{App, Focus};
use crate::view::{one_line, spinner_char, truncate};

/// Title bar: app name, page indicator, catalog total and load spinner.
pub fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(" Artworks Gallery ", theme.header_style()),
        Span::styled(
            format!(" Page {} / {}", app.pager.page, app.pager.page_count()),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];

    if app.pager.total > 0 {
        spans.push(Span::styled(
            format!("  {} artworks", app.pager.total),
            Style::default().fg(theme.dim),
        ));
    }
    if app.pager.loading {
        spans.push(Span::styled(
            format!("  {} loading", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    }
    if let Some(count) = app.bulk_in_flight {
        spans.push(Span::styled(
            format!("  {} selecting {count}", spinner_char(app.tick)),
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(
        format!("  [{}]", app.strategy.label()),
        Style::default().fg(theme.dim),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Header checkbox glyph for the page: all, some or none checked.
fn page_checkbox(app: &App) -> &'static str {
    let checked = app
        .rows
        .iter()
        .filter(|r| app.selection.contains(r.id))
        .count();
    match checked {
        0 => "[ ]",
        n if n == app.rows.len() => "[x]",
        _ => "[-]",
    }
}

fn year(y: Option<i64>) -> String {
    y.map(|v| v.to_string())
        .unwrap_or_else(|| "\u{2014}".to_string())
}

fn record_row<'a>(record: &Record, checked: bool, app: &'a App, text_width: usize) -> Row<'a> {
    let theme = &app.theme;
    let (mark, mark_style) = if checked {
        ("[x]", Style::default().fg(theme.checked))
    } else {
        ("[ ]", Style::default().fg(theme.dim))
    };
    let title_style = if checked {
        Style::default().fg(theme.checked)
    } else {
        Style::default().fg(theme.text)
    };

    Row::new(vec![
        Cell::from(mark).style(mark_style),
        Cell::from(truncate(&record.title, text_width)).style(title_style),
        Cell::from(truncate(&record.place_of_origin, text_width / 2)),
        Cell::from(truncate(&one_line(&record.artist_display), text_width)),
        Cell::from(truncate(&one_line(&record.inscriptions), text_width))
            .style(Style::default().fg(theme.dim)),
        Cell::from(year(record.date_start)),
        Cell::from(year(record.date_end)),
    ])
}

/// The paged artworks table with a checkbox column.
pub fn render_table(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text_width = (area.width as usize).saturating_sub(30) / 3;

    let popover_marker = if app.popover.is_open() { "\u{25b4}" } else { "\u{25be}" };
    let header_style = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from(page_checkbox(app)).style(header_style),
        Cell::from(format!("Title {popover_marker}")).style(header_style),
        Cell::from("Place of Origin").style(header_style),
        Cell::from("Artist").style(header_style),
        Cell::from("Inscriptions").style(header_style),
        Cell::from("Start").style(header_style),
        Cell::from("End").style(header_style),
    ])
    .height(1);

    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|r| record_row(r, app.selection.contains(r.id), app, text_width))
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(16),
        Constraint::Min(12),
        Constraint::Min(10),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let border_style = if app.focus == Focus::Table {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };
    let title = if app.rows.is_empty() && !app.pager.loading {
        " No artworks ".to_string()
    } else {
        format!(
            " {} of {} checked on this page ",
            app.visible_selection().len(),
            app.rows.len()
        )
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default();
    if app.focus == Focus::Table && !app.rows.is_empty() {
        state.select(Some(app.table_cursor));
    }
    f.render_stateful_widget(table, area, &mut state);
}

/// Status message if one is live, otherwise key hints for the focused pane.
pub fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let line = if let Some(status) = &app.status {
        Line::from(Span::styled(
            format!(" {}", status.text),
            Style::default().fg(theme.status_color(status.level)),
        ))
    } else {
        let hints = match app.focus {
            Focus::Table => {
                " Space:toggle  a:page  h/l:prev/next  v:select N  Tab:panel  ?:help  q:quit"
            }
            Focus::Panel => " x:remove  X:clear all  j/k:move  Tab/Esc:table  ?:help  q:quit",
        };
        Line::from(Span::styled(hints, theme.footer_style()))
    };

    f.render_widget(Paragraph::new(line), area);
}
