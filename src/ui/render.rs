use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::form::{FieldKind, Form};
use super::theme::Theme;

const LABEL_WIDTH: usize = 13;

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

    if let Some(form) = &app.form {
        render_form(f, f.area(), form, app);
    }
    if app.show_help {
        render_help_overlay(f, f.area(), &app.theme);
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = format!("{}", i + 1);
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), theme.dim_style()),
                    Span::styled(
                        format!("{s}"),
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(format!("{num}:{s}"), theme.dim_style()))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme.overlay)))
        .style(Style::default().bg(theme.header_bg));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Clients => super::screens::clients::render(f, area, app),
        Screen::Budgets => super::screens::budgets::render(f, area, app),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme.accent,
        InputMode::Command | InputMode::Form => theme.green,
        InputMode::Search => theme.yellow,
        InputMode::Confirm => theme.red,
    };
    let mode_style = Style::default()
        .fg(theme.header_bg)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = format!(
        " {} | {} clients | {} budgets",
        app.screen,
        app.clients.len(),
        app.budgets.len()
    );

    let right = match app.input_mode {
        InputMode::Form => " Tab next | Enter save | Esc cancel ",
        _ => match app.screen {
            Screen::Clients => " a add | e edit | D delete | / search | ? help ",
            Screen::Budgets => " a add | e edit | D delete | s sort | ? help ",
        },
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme.status_bar_style()),
        Span::styled(" ".repeat(pad), theme.status_bar_style()),
        Span::styled(right, theme.status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme.accent)),
                Span::styled(&app.command_input, theme.command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Search => {
            let match_info = if app.search_input.is_empty() {
                String::new()
            } else {
                format!("  ({} matches)", app.clients.len())
            };
            (
                Line::from(vec![
                    Span::styled("/", Style::default().fg(theme.yellow)),
                    Span::styled(&app.search_input, theme.command_bar_style()),
                    Span::styled(match_info, theme.dim_style()),
                ]),
                Some(1 + app.search_input.chars().count() as u16),
            )
        }
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme.yellow)),
                Span::styled(" [y/N] ", Style::default().fg(theme.red)),
            ]),
            None,
        ),
        InputMode::Normal | InputMode::Form => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, / to search, ? for help",
                    theme.dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme.command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme.command_bg));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn render_form(f: &mut Frame, area: Rect, form: &Form, app: &App) {
    let theme = &app.theme;
    let mut lines = vec![Line::from("")];
    let mut cursor = None;

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let marker = if field.required { "*" } else { " " };
        let label = format!("  {:<width$}", format!("{}{marker}", field.label), width = LABEL_WIDTH);
        let label_style = if focused {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            theme.dim_style()
        };
        let value_style = if focused {
            Style::default().fg(theme.text).bg(theme.surface)
        } else {
            theme.normal_style()
        };

        if focused {
            cursor = Some((
                (label.chars().count() + field.value.chars().count()) as u16,
                lines.len() as u16,
            ));
        }
        lines.push(Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(field.value.as_str(), value_style),
        ]));

        if focused && field.kind == FieldKind::ClientRef {
            let pad = " ".repeat(LABEL_WIDTH + 2);
            for (n, name) in form.suggestions(&app.client_names).iter().enumerate() {
                let hint = if n == 0 { "  (→ to complete)" } else { "" };
                lines.push(Line::from(vec![
                    Span::styled(format!("{pad}{name}"), theme.dim_style()),
                    Span::styled(hint, Style::default().fg(theme.overlay)),
                ]));
            }
        }
    }

    lines.push(Line::from(""));
    match &form.error {
        Some(err) => lines.push(Line::from(Span::styled(format!("  {err}"), theme.error_style()))),
        None => lines.push(Line::from(Span::styled(
            "  * required",
            theme.dim_style(),
        ))),
    }

    let popup_height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 64.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(Span::styled(form.title(), theme.title_style()))
            .style(Style::default().bg(theme.header_bg)),
    );
    f.render_widget(paragraph, popup_area);

    if let Some((col, row)) = cursor {
        let col = (popup_area.x + 1 + col).min(popup_area.right().saturating_sub(2));
        let row = popup_area.y + 1 + row;
        if row < popup_area.bottom() {
            f.set_cursor_position((col, row));
        }
    }
}

fn render_help_overlay(f: &mut Frame, area: Rect, theme: &Theme) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme.yellow)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let text = |s: &'static str| Line::from(Span::styled(s, theme.normal_style()));

    let mut help_text = vec![
        Line::from(Span::styled(
            " Cervus Help ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Navigation"),
        text("  j/k or Up/Down   Move cursor           1-2        Switch tabs"),
        text("  Tab/Shift-Tab    Cycle tabs            g/G        Top/Bottom"),
        text("  Ctrl-d/u         Page Down/Up          Ctrl-q     Quit"),
        Line::from(""),
        section(" Records"),
        text("  a               Add                    e/Enter    Edit selected"),
        text("  D               Delete selected        B          Budget for client"),
        text("  s               Cycle sort column      S          Flip sort order"),
        text("  /               Search clients (live)  Esc        Clear/Cancel"),
        Line::from(""),
        section(" Form"),
        text("  Tab/Down        Next field             Shift-Tab  Previous field"),
        text("  Enter           Save                   Right      Complete client"),
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
            theme.normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        theme.dim_style(),
    )));

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 72.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.header_bg)),
    );
    f.render_widget(help, popup_area);
}
