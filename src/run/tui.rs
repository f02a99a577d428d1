use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::error::RecordError;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands::{self, cycle_sort, start_add, start_delete, start_edit, switch_screen};
use crate::ui::form::FieldKind;
use crate::ui::theme::Theme;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &Database) -> Result<()> {
    let mut app = App::new(Theme::default());
    if let Err(e) = app.refresh_all(db) {
        app.set_status(format!("Error: {e}"));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // Tab, status and command bars, table borders and header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if app.show_help {
            app.show_help = false;
            continue;
        }

        let handled = match app.input_mode {
            InputMode::Normal => handle_normal_input(key, app, db),
            InputMode::Command => handle_command_input(key, app, db),
            InputMode::Search => handle_search_input(key, app, db),
            InputMode::Form => handle_form_input(key, app, db),
            InputMode::Confirm => handle_confirm_input(key, app, db),
        };
        // Record errors end the action, never the session
        if let Err(e) = handled {
            app.set_status(format!("Error: {e}"));
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_input.clear();
            app.client_index = 0;
            app.client_scroll = 0;
            switch_screen(app, db, Screen::Clients)?;
        }
        KeyCode::Char('q') | KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('1') => switch_screen(app, db, Screen::Clients)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Budgets)?,
        KeyCode::Tab | KeyCode::BackTab => {
            let next = match app.screen {
                Screen::Clients => Screen::Budgets,
                Screen::Budgets => Screen::Clients,
            };
            switch_screen(app, db, next)?;
        }
        KeyCode::Char('a') => start_add(app),
        KeyCode::Char('e') | KeyCode::Enter => start_edit(app),
        KeyCode::Char('D') => start_delete(app),
        KeyCode::Char('B') if app.screen == Screen::Clients => {
            commands::handle_command("add-budget", app, db)?;
        }
        KeyCode::Char('s') => cycle_sort(app, false),
        KeyCode::Char('S') => cycle_sort(app, true),
        KeyCode::Char('r') => commands::handle_command("reload", app, db)?,
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Esc => {
            app.status_message.clear();
            if !app.search_input.is_empty() {
                app.search_input.clear();
                app.refresh_clients(db)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.refresh_clients(db)?;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            // Live search: filter as you type
            app.client_index = 0;
            app.client_scroll = 0;
            app.refresh_clients(db)?;
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.client_index = 0;
            app.client_scroll = 0;
            app.refresh_clients(db)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_form_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    let Some(form) = app.form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return Ok(());
    };
    match key.code {
        KeyCode::Esc => {
            app.close_form();
            app.set_status("Cancelled");
        }
        KeyCode::Enter => submit_form(app, db)?,
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Right
            if form
                .focused()
                .is_some_and(|f| f.kind == FieldKind::ClientRef) =>
        {
            form.accept_suggestion(&app.client_names);
        }
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
    Ok(())
}

/// Save the open form. Validation errors keep it open with the message;
/// anything else closes it and lands in the status line.
fn submit_form(app: &mut App, db: &Database) -> Result<()> {
    let Some(form) = app.form.as_ref() else {
        return Ok(());
    };
    let is_client = form.is_client_form();

    match form.submit(db) {
        Ok(status) => {
            app.close_form();
            refresh_after_write(app, db, is_client)?;
            app.set_status(status);
        }
        Err(e) if e.is_validation() => {
            focus_failed_field(app, &e);
            if let Some(form) = app.form.as_mut() {
                form.error = Some(e.to_string());
            }
        }
        Err(e) => {
            app.close_form();
            refresh_after_write(app, db, is_client)?;
            app.set_status(format!("Error: {e}"));
        }
    }
    Ok(())
}

fn focus_failed_field(app: &mut App, err: &RecordError) {
    let label = match err {
        RecordError::MissingField(field) | RecordError::FieldTooLong { field, .. } => *field,
        RecordError::InvalidEmail(_) => "Email",
        RecordError::UnknownClient(_) => "Client",
        _ => return,
    };
    if let Some(form) = app.form.as_mut() {
        if let Some(pos) = form.fields.iter().position(|f| f.label == label) {
            form.focus = pos;
        }
    }
}

fn refresh_after_write(app: &mut App, db: &Database, is_client: bool) -> Result<()> {
    if is_client {
        app.refresh_clients(db)?;
    }
    // Budgets show client names, so they follow client edits too
    app.refresh_budgets(db)?;
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    let confirmed = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
    let action = app.pending_action.take();
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();

    // Any other key = cancel
    let Some(action) = action.filter(|_| confirmed) else {
        app.set_status("Cancelled");
        return Ok(());
    };

    match action {
        PendingAction::DeleteClient { client_id, name } => {
            let removed = db.delete_client(&client_id)?;
            app.refresh_clients(db)?;
            app.refresh_budgets(db)?;
            if removed == 0 {
                app.set_status(format!("Client {client_id} was already gone"));
            } else {
                app.set_status(format!("Deleted client: {name}"));
            }
        }
        PendingAction::DeleteBudget { budget_id, .. } => {
            let removed = db.delete_budget(&budget_id)?;
            app.refresh_budgets(db)?;
            if removed == 0 {
                app.set_status(format!("Budget {budget_id} was already gone"));
            } else {
                app.set_status(format!("Deleted budget: {budget_id}"));
            }
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Clients => scroll_down(
            &mut app.client_index,
            &mut app.client_scroll,
            app.clients.len(),
            page,
        ),
        Screen::Budgets => scroll_down(
            &mut app.budget_index,
            &mut app.budget_scroll,
            app.budgets.len(),
            page,
        ),
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Clients => scroll_up(&mut app.client_index, &mut app.client_scroll),
        Screen::Budgets => scroll_up(&mut app.budget_index, &mut app.budget_scroll),
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Clients => scroll_to_top(&mut app.client_index, &mut app.client_scroll),
        Screen::Budgets => scroll_to_top(&mut app.budget_index, &mut app.budget_scroll),
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Clients => scroll_to_bottom(
            &mut app.client_index,
            &mut app.client_scroll,
            app.clients.len(),
            page,
        ),
        Screen::Budgets => scroll_to_bottom(
            &mut app.budget_index,
            &mut app.budget_scroll,
            app.budgets.len(),
            page,
        ),
    }
}
