use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup = centered_rect(66, 34, f.area());

    let lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Browsing", theme),
        key_line("j / \u{2193}", "Move down", theme),
        key_line("k / \u{2191}", "Move up", theme),
        key_line("g / G", "First / last row", theme),
        key_line("l / \u{2192} / PgDn", "Next page", theme),
        key_line("h / \u{2190} / PgUp", "Previous page", theme),
        key_line("Home / End", "First / last page", theme),
        key_line("r", "Reload page", theme),
        Line::from(""),
        section_header("Selecting", theme),
        key_line("Space / Enter", "Toggle the artwork under the cursor", theme),
        key_line("a", "Toggle every artwork on the page", theme),
        key_line("v", "Select the first N artworks", theme),
        key_line("Esc", "Cancel a running bulk selection", theme),
        Line::from(""),
        section_header("Selected panel", theme),
        key_line("Tab", "Switch between table and panel", theme),
        key_line("x / Del", "Remove the highlighted artwork", theme),
        key_line("X", "Clear the whole selection", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q / Ctrl+c", "Quit", theme),
        Line::from(""),
        section_header("Bulk selection", theme),
        Line::from(vec![
            Span::styled(
                format!("    {}: ", app.strategy.label()),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(app.strategy.description(), Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("    {key:<20}"),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
