// ui rendering

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::core::LogLevel;
use crate::core::markup::{self, MarkupLine};
use crate::tui::app::{App, Mode, Panel, Popup};
use crate::tui::theme::{Theme, ThemeKind};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn render(frame: &mut Frame, app: &mut App) {
    let theme = &app.theme;

    frame.render_widget(Clear, frame.area());
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Min(8),    // content
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, main[0]);
    render_content(frame, app, main[1]);
    render_footer(frame, app, main[2]);

    if app.popup == Popup::Themes {
        render_theme_popup(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border())
        .style(theme.base());

    let mode_str = match app.mode {
        Mode::Normal => "normal",
        Mode::Insert => "insert",
    };

    let status = if app.is_loading() {
        Span::styled(
            format!("{} loading...", SPINNER[app.tick % SPINNER.len()]),
            theme.warning(),
        )
    } else {
        Span::styled("idle", theme.muted())
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("| ", theme.muted()),
            Span::styled("ankiform", theme.accent()),
            Span::styled("  | Endpoint: ", theme.muted()),
            Span::styled(&app.endpoint, theme.base()),
        ]),
        Line::from(vec![
            Span::styled("| Mode: ", theme.muted()),
            Span::styled(mode_str, theme.accent()),
            Span::styled("  | Sent: ", theme.muted()),
            Span::styled(app.submitted.to_string(), theme.base()),
            Span::styled("  | ", theme.muted()),
            status,
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(block).style(theme.base());
    frame.render_widget(paragraph, area);
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.fullscreen {
        match app.panel {
            Panel::Query => render_query(frame, app, area),
            Panel::Output => render_output(frame, app, area),
            Panel::Logs => render_logs(frame, app, area),
        }
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    render_query(frame, app, top[0]);
    render_output(frame, app, top[1]);
    render_logs(frame, app, rows[1]);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let line = Line::from(vec![
        Span::styled(" Enter ", theme.base().bg(theme.accent).fg(theme.bg)),
        Span::styled(" Submit ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("i ", theme.accent()),
        Span::styled("Edit ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("y ", theme.accent()),
        Span::styled("Copy ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("x ", theme.accent()),
        Span::styled("Export ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("f ", theme.accent()),
        Span::styled(
            if app.fullscreen { "Exit Full " } else { "Full " },
            theme.muted(),
        ),
        Span::styled("| ", theme.border()),
        Span::styled("t ", theme.accent()),
        Span::styled("Theme ", theme.muted()),
        Span::styled("| ", theme.border()),
        Span::styled("q ", theme.accent()),
        Span::styled("Quit ", theme.muted()),
    ]);

    let paragraph = Paragraph::new(line)
        .style(theme.base())
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn panel_block<'a>(theme: &Theme, title: &'a str, active: bool) -> Block<'a> {
    let border_style = if active {
        theme.accent()
    } else {
        theme.border()
    };

    Block::default()
        .title(Span::styled(title, theme.title()))
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(theme.base())
}

fn render_query(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let active = app.panel == Panel::Query;
    let block = panel_block(theme, " Text ", active);

    let content = if app.prompt.is_empty() && app.mode != Mode::Insert {
        vec![Line::styled("press 'i' to type your text...", theme.muted())]
    } else {
        vec![Line::styled(app.prompt.clone(), theme.base())]
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .style(theme.base())
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);

    if app.mode == Mode::Insert && active {
        let inner = area.inner(Margin {
            horizontal: 1,
            vertical: 1,
        });
        let width = inner.width.max(1) as usize;
        let cursor_x = inner.x + (app.prompt_cursor % width) as u16;
        let cursor_y = inner.y + (app.prompt_cursor / width) as u16;

        if cursor_x < inner.right() && cursor_y < inner.bottom() {
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

fn render_output(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = panel_block(theme, " Output ", app.panel == Panel::Output);

    let markup = app.output_markup();
    let content = if markup.is_empty() {
        vec![Line::styled("submit some text to get questions", theme.muted())]
    } else {
        markup_lines(&markup::render(&markup), theme)
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .style(theme.base())
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn markup_lines(lines: &[MarkupLine], theme: &Theme) -> Vec<Line<'static>> {
    lines
        .iter()
        .map(|line| {
            Line::from(
                line.iter()
                    .map(|f| Span::styled(f.text.clone(), theme.markup(f.emphasis)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn render_logs(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = panel_block(theme, " Logs ", app.panel == Panel::Logs);

    let lines: Vec<Line> = app
        .logs()
        .into_iter()
        .map(|entry| {
            let (prefix, style) = match entry.level {
                LogLevel::Ok => ("[OK]", theme.success()),
                LogLevel::Info => ("[--]", theme.muted()),
                LogLevel::Warn => ("[!!]", theme.warning()),
                LogLevel::Error => ("[ERR]", theme.error()),
            };
            Line::from(vec![
                Span::styled(format!("{prefix} "), style),
                Span::styled(entry.message, theme.base()),
            ])
        })
        .collect();

    // follow the tail unless the user scrolled
    let visible = area.height.saturating_sub(2) as usize;
    let tail = lines.len().saturating_sub(visible);
    let scroll = if app.panel == Panel::Logs {
        app.log_scroll.min(tail)
    } else {
        tail
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(theme.base())
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_theme_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = centered_rect(40, 50, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" select theme ", theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.accent())
        .style(theme.base());

    let mut lines: Vec<Line> = ThemeKind::ALL
        .iter()
        .enumerate()
        .map(|(i, &kind)| {
            if i == app.theme_scroll {
                Line::from(vec![
                    Span::styled(" > ", theme.accent()),
                    Span::styled(kind.name(), theme.selected().fg(theme.accent)),
                ])
            } else {
                Line::styled(format!("   {}", kind.name()), theme.base())
            }
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" j/k ", theme.accent()),
        Span::styled("navigate  ", theme.muted()),
        Span::styled("enter ", theme.accent()),
        Span::styled("select  ", theme.muted()),
        Span::styled("esc ", theme.accent()),
        Span::styled("close", theme.muted()),
    ]));

    let paragraph = Paragraph::new(lines).block(block).style(theme.base());
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Client, DEFAULT_ENDPOINT, Diagnostics, Document, FormHandler};
    use ratatui::{Terminal, backend::TestBackend, style::Modifier};

    #[test]
    fn output_markup_renders_bold() {
        let theme = Theme::from_kind(ThemeKind::Dark);
        let lines = markup_lines(&markup::render("<b>hi</b>"), &theme);

        assert_eq!(lines.len(), 1);
        let span = &lines[0].spans[0];
        assert_eq!(span.content, "hi");
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn draws_output_text_not_tags() {
        let handler = FormHandler::bind(
            &Document::form_page(),
            Client::new(DEFAULT_ENDPOINT).unwrap(),
            Diagnostics::new(),
        )
        .unwrap();
        handler.output().set_inner_html("<b>hi</b> there");
        let mut app = App::new(&handler, ThemeKind::Dark);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("hi there"));
        assert!(!screen.contains("<b>"));
    }
}
