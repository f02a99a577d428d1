use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(
            format!(" Budgets ({}) [{}] ", app.budgets.len(), app.budget_sort),
            theme.title_style(),
        ));

    if app.budgets.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No budgets yet", theme.dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press a or use :add-budget <client> to create one",
                theme.dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["ID", "Client", "Date", "Type", "Completion", "Deadline", "Service"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .budgets
        .iter()
        .enumerate()
        .skip(app.budget_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, budget)| {
            let style = if i == app.budget_index {
                theme.selected_style()
            } else if i % 2 == 1 {
                theme.alt_row_style()
            } else {
                theme.normal_style()
            };

            // Budgets whose client was deleted show the bare identifier
            let client = match budget.client_name {
                Some(_) => Cell::from(truncate(budget.client_label(), 28)),
                None => Cell::from(Span::styled(
                    budget.client_label().to_string(),
                    Style::default().fg(theme.yellow),
                )),
            };

            Row::new(vec![
                Cell::from(budget.budget_id.as_str()),
                client,
                Cell::from(budget.date.as_str()),
                Cell::from(truncate(&budget.kind, 20)),
                Cell::from(truncate(&budget.completion, 14)),
                Cell::from(truncate(&budget.deadline, 14)),
                Cell::from(truncate(&budget.service, 40)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Min(14),
        Constraint::Length(11),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Min(16),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
