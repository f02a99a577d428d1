use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let search = if app.search_input.is_empty() {
        String::new()
    } else {
        format!("search: '{}' ", app.search_input)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(
            format!(
                " Clients ({}) {search}[{}] ",
                app.clients.len(),
                app.client_sort
            ),
            theme.title_style(),
        ));

    if app.clients.is_empty() {
        let msg = if app.search_input.is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled("No clients yet", theme.dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Press a or use :add-client to register one",
                    theme.dim_style(),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("No clients matching '{}'", app.search_input),
                    theme.dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Esc to clear the search",
                    theme.dim_style(),
                )),
            ]
        };
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["ID", "Name", "Email", "Phone", "Observation", "Added"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .clients
        .iter()
        .enumerate()
        .skip(app.client_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, client)| {
            let style = if i == app.client_index {
                theme.selected_style()
            } else if i % 2 == 1 {
                theme.alt_row_style()
            } else {
                theme.normal_style()
            };

            Row::new(vec![
                Cell::from(client.client_id.as_str()),
                Cell::from(truncate(&client.name, 30)),
                Cell::from(truncate(&client.email, 30)),
                Cell::from(client.phone.as_str()),
                Cell::from(truncate(&client.observation, 40)),
                Cell::from(client.date_added.as_str()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Min(16),
        Constraint::Min(16),
        Constraint::Length(17),
        Constraint::Min(12),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
