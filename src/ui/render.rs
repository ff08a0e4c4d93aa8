use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use super::app::{App, InputMode, Notice, Screen};
use super::commands;
use super::theme;
use super::util::centered_rect;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
    if let Some(notice) = &app.notice {
        render_notice(f, f.area(), notice);
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = format!("{}", i + 1);
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), theme::dim_style()),
                    Span::styled(
                        format!("{s}"),
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(format!("{num}:{s}"), theme::dim_style()))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::HEADER_BG));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Products => super::screens::products::render(f, area, app),
        Screen::Categories => super::screens::categories::render(f, area, app),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command | InputMode::Form => theme::GREEN,
        InputMode::Search => theme::YELLOW,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = format!(
        " {} | {} products | {} categories",
        app.screen,
        app.product_count,
        app.categories.len()
    );

    let right = match (app.screen, app.input_mode) {
        (_, InputMode::Form) => " Tab/Up/Down field | Esc done ",
        (Screen::Products, _) => " e edit | a add | u update | D delete | ? help ",
        (Screen::Categories, _) => " Enter use in form | :category add | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.len() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Search => (
            Line::from(vec![
                Span::styled("/", Style::default().fg(theme::YELLOW)),
                Span::styled(&app.search_input, theme::command_bar_style()),
                Span::styled("  (Enter to search, empty shows all)", theme::dim_style()),
            ]),
            Some(1 + app.search_input.chars().count() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal | InputMode::Form => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, / to search, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn render_notice(f: &mut Frame, area: Rect, notice: &Notice) {
    let color = theme::notice_color(&notice.title);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(&notice.message, theme::normal_style())),
        Line::from(""),
        Line::from(Span::styled(" Press any key to close ", theme::dim_style())),
    ];

    let width = (notice.message.chars().count() as u16 + 6).clamp(30, 70);
    let popup_area = centered_rect(area, width, 7);

    f.render_widget(Clear, popup_area);
    let popup = Paragraph::new(text)
        .centered()
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Span::styled(
                    format!(" {} ", notice.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .style(Style::default().bg(theme::HEADER_BG)),
        );
    f.render_widget(popup, popup_area);
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    ))
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " StockTUI Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Navigation"),
        Line::from(Span::styled(
            "  j/k or Up/Down   Move cursor           1-2        Switch tabs",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  Tab/Shift-Tab    Cycle tabs            g/G        Top/Bottom",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  Ctrl-d/u         Page Down/Up          Ctrl-q     Quit",
            theme::normal_style(),
        )),
        Line::from(""),
        section(" Products"),
        Line::from(Span::styled(
            "  e               Edit form              x          Clear form",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  a               Add product            u          Update product",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  D               Delete selected        X          Delete all",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  c               Add form category      Enter      Load row into form",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  /               Search by ID or name   Esc        Show all",
            theme::normal_style(),
        )),
        Line::from(""),
        section(" Commands"),
    ];

    // Build command list dynamically from COMMANDS registry
    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 2 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<14} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));

    let popup_area = centered_rect(area, 76, help_text.len() as u16 + 2);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
