use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction, Screen};
use super::form::Form;
use super::util::{Sort, SortKey};
use crate::db::Database;
use crate::ids;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit Cervus", cmd_quit, r);
    register_command!("quit", "Quit Cervus", cmd_quit, r);
    register_command!("c", "Go to Clients", cmd_clients, r);
    register_command!("clients", "Go to Clients", cmd_clients, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "search",
        "Search clients (e.g. :search maria)",
        cmd_search,
        r
    );
    register_command!("s", "Search clients (e.g. :s maria)", cmd_search, r);
    register_command!("add", "Add a record to the current screen", cmd_add, r);
    register_command!("a", "Add a record to the current screen", cmd_add, r);
    register_command!("add-client", "Add a client", cmd_add_client, r);
    register_command!(
        "add-budget",
        "Add a budget (e.g. :add-budget Maria Silva)",
        cmd_add_budget,
        r
    );
    register_command!("edit", "Edit the selected record", cmd_edit, r);
    register_command!("e", "Edit the selected record", cmd_edit, r);
    register_command!("delete", "Delete the selected record", cmd_delete, r);
    register_command!("del", "Delete the selected record", cmd_delete, r);
    register_command!(
        "show",
        "Show a client by identifier (e.g. :show AUT-1234)",
        cmd_show,
        r
    );
    register_command!(
        "sort",
        "Sort by added, id, name or date (e.g. :sort date desc)",
        cmd_sort,
        r
    );
    register_command!("reload", "Reload records from disk", cmd_reload, r);
    register_command!("r", "Reload records from disk", cmd_reload, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Shared actions (keys and commands) ───────────────────────

pub(crate) fn switch_screen(app: &mut App, db: &Database, screen: Screen) -> anyhow::Result<()> {
    app.screen = screen;
    match screen {
        Screen::Clients => app.refresh_clients(db)?,
        Screen::Budgets => app.refresh_budgets(db)?,
    }
    Ok(())
}

pub(crate) fn start_add(app: &mut App) {
    match app.screen {
        Screen::Clients => app.open_form(Form::add_client()),
        Screen::Budgets => app.open_form(Form::add_budget("")),
    }
}

pub(crate) fn start_edit(app: &mut App) {
    let form = match app.screen {
        Screen::Clients => app.selected_client().map(Form::edit_client),
        Screen::Budgets => app.selected_budget().map(Form::edit_budget),
    };
    match form {
        Some(form) => app.open_form(form),
        None => app.set_status("Nothing selected"),
    }
}

pub(crate) fn start_delete(app: &mut App) {
    let action = match app.screen {
        Screen::Clients => app.selected_client().map(|c| PendingAction::DeleteClient {
            client_id: c.client_id.clone(),
            name: c.name.clone(),
        }),
        Screen::Budgets => app.selected_budget().map(|b| PendingAction::DeleteBudget {
            budget_id: b.budget_id.clone(),
            client: b.client_label().to_string(),
        }),
    };
    let Some(action) = action else {
        app.set_status("Nothing selected");
        return;
    };

    app.confirm_message = match &action {
        PendingAction::DeleteClient { client_id, name } => {
            format!("Delete client {name} ({client_id})? Their budgets are kept.")
        }
        PendingAction::DeleteBudget { budget_id, client } => {
            format!("Delete budget {budget_id} for {client}?")
        }
    };
    app.pending_action = Some(action);
    app.input_mode = InputMode::Confirm;
}

/// Advance the current screen's sort key, or flip its direction.
pub(crate) fn cycle_sort(app: &mut App, flip: bool) {
    let sort = app.current_sort_mut();
    if flip {
        sort.descending = !sort.descending;
    } else {
        sort.key = sort.key.next();
    }
    let label = sort.to_string();
    app.resort();
    app.set_status(format!("Sorted by {label}"));
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_clients(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Clients)
}

fn cmd_budgets(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Budgets)
}

fn cmd_help(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.client_index = 0;
    app.client_scroll = 0;
    switch_screen(app, db, Screen::Clients)?;
    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("{} clients matching '{args}'", app.clients.len()));
    }
    Ok(())
}

fn cmd_add(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    start_add(app);
    Ok(())
}

fn cmd_add_client(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Clients)?;
    app.open_form(Form::add_client());
    Ok(())
}

fn cmd_add_budget(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    // Without an argument, budget the client under the cursor
    let client_ref = if args.is_empty() && app.screen == Screen::Clients {
        app.selected_client()
            .map(|c| c.client_id.clone())
            .unwrap_or_default()
    } else {
        args.to_string()
    };
    switch_screen(app, db, Screen::Budgets)?;
    app.open_form(Form::add_budget(&client_ref));
    Ok(())
}

fn cmd_edit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    start_edit(app);
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    start_delete(app);
    Ok(())
}

fn cmd_show(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    if !ids::is_identifier(ids::CLIENT_PREFIX, args) {
        app.set_status(format!("Usage: :show {}-1234", ids::CLIENT_PREFIX));
        return Ok(());
    }

    let Some(client) = db.get_client(args)? else {
        app.set_status(format!("Client {args} not found"));
        return Ok(());
    };

    app.search_input.clear();
    switch_screen(app, db, Screen::Clients)?;
    if let Some(pos) = app
        .clients
        .iter()
        .position(|c| c.client_id == client.client_id)
    {
        app.client_index = pos;
        app.client_scroll = pos.saturating_sub(app.visible_rows.saturating_sub(1));
    }
    app.set_status(format!(
        "{client} | {} | {} | added {}",
        or_dash(&client.email),
        or_dash(&client.phone),
        or_dash(&client.date_added)
    ));
    Ok(())
}

fn cmd_sort(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let mut words = args.split_whitespace();
    let Some(key) = words.next().and_then(SortKey::parse) else {
        app.set_status("Usage: :sort <added|id|name|date> [desc]");
        return Ok(());
    };
    let descending = words.next().is_some_and(|w| w.eq_ignore_ascii_case("desc"));

    *app.current_sort_mut() = Sort { key, descending };
    app.resort();
    app.set_status(format!("Sorted by {}", Sort { key, descending }));
    Ok(())
}

fn cmd_reload(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.refresh_all(db)?;
    app.set_status(format!(
        "Loaded {} clients and {} budgets",
        app.clients.len(),
        app.budgets.len()
    ));
    Ok(())
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::Config;
    use crate::models::ClientDraft;
    use crate::ui::theme::Theme;

    fn setup() -> (tempfile::TempDir, Database, App) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&Config::in_dir(dir.path())).unwrap();
        (dir, db, App::new(Theme::default()))
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("budgets", "budgets"), 0);
        assert_eq!(levenshtein("budgts", "budgets"), 1);
    }

    #[test]
    fn test_unknown_command_suggests_closest() {
        let (_dir, db, mut app) = setup();
        handle_command("clinets", &mut app, &db).unwrap();
        assert_eq!(
            app.status_message,
            "Unknown command: :clinets. Did you mean :clients?"
        );
    }

    #[test]
    fn test_quit() {
        let (_dir, db, mut app) = setup();
        handle_command("q", &mut app, &db).unwrap();
        assert!(!app.running);
    }

    #[test]
    fn test_search_filters_clients() {
        let (_dir, db, mut app) = setup();
        db.add_client(&ClientDraft::new("Ana")).unwrap();
        db.add_client(&ClientDraft::new("Bruno")).unwrap();
        app.screen = Screen::Budgets;

        handle_command("search an", &mut app, &db).unwrap();
        assert_eq!(app.screen, Screen::Clients);
        assert_eq!(app.clients.len(), 1);
        assert_eq!(app.clients[0].name, "Ana");

        handle_command("search", &mut app, &db).unwrap();
        assert_eq!(app.clients.len(), 2);
    }

    #[test]
    fn test_add_budget_prefills_selected_client() {
        let (_dir, db, mut app) = setup();
        let client_id = db.add_client(&ClientDraft::new("Maria Silva")).unwrap();
        app.refresh_all(&db).unwrap();

        handle_command("add-budget", &mut app, &db).unwrap();
        assert_eq!(app.screen, Screen::Budgets);
        assert_eq!(app.input_mode, InputMode::Form);
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.fields[0].value, client_id);
    }

    #[test]
    fn test_delete_asks_for_confirmation() {
        let (_dir, db, mut app) = setup();
        db.add_client(&ClientDraft::new("Ana")).unwrap();
        app.refresh_all(&db).unwrap();

        handle_command("delete", &mut app, &db).unwrap();
        assert_eq!(app.input_mode, InputMode::Confirm);
        assert!(matches!(
            app.pending_action,
            Some(PendingAction::DeleteClient { ref name, .. }) if name == "Ana"
        ));
        // Nothing is removed until confirmed
        assert_eq!(db.list_clients(None).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_with_empty_list() {
        let (_dir, db, mut app) = setup();
        handle_command("delete", &mut app, &db).unwrap();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.pending_action.is_none());
        assert_eq!(app.status_message, "Nothing selected");
    }

    #[test]
    fn test_show_moves_cursor_to_client() {
        let (_dir, db, mut app) = setup();
        db.add_client(&ClientDraft::new("Ana")).unwrap();
        let bruno = db
            .add_client(&ClientDraft::new("Bruno").with_email("bruno@x.com"))
            .unwrap();
        app.refresh_all(&db).unwrap();

        handle_command(&format!("show {bruno}"), &mut app, &db).unwrap();
        assert_eq!(app.selected_client().unwrap().name, "Bruno");
        assert!(app.status_message.contains("bruno@x.com"));
    }

    #[test]
    fn test_show_accepts_lowercase_identifier() {
        let (_dir, db, mut app) = setup();
        db.add_client(&ClientDraft::new("Ana")).unwrap();
        let bruno = db.add_client(&ClientDraft::new("Bruno")).unwrap();
        app.refresh_all(&db).unwrap();

        handle_command(&format!("show {}", bruno.to_lowercase()), &mut app, &db).unwrap();
        assert_eq!(app.selected_client().unwrap().client_id, bruno);
    }

    #[test]
    fn test_show_unknown_client() {
        let (_dir, db, mut app) = setup();
        handle_command("show AUT-0001", &mut app, &db).unwrap();
        assert_eq!(app.status_message, "Client AUT-0001 not found");

        handle_command("show maria", &mut app, &db).unwrap();
        assert!(app.status_message.starts_with("Usage"));
    }

    #[test]
    fn test_sort_command() {
        let (_dir, db, mut app) = setup();
        db.add_client(&ClientDraft::new("bruno")).unwrap();
        db.add_client(&ClientDraft::new("Ana")).unwrap();
        app.refresh_all(&db).unwrap();

        handle_command("sort name", &mut app, &db).unwrap();
        assert_eq!(app.clients[0].name, "Ana");
        handle_command("sort name desc", &mut app, &db).unwrap();
        assert_eq!(app.clients[0].name, "bruno");

        handle_command("sort price", &mut app, &db).unwrap();
        assert!(app.status_message.starts_with("Usage"));
        assert_eq!(app.client_sort.key, SortKey::Name);
    }

    #[test]
    fn test_cycle_sort_flip() {
        let (_dir, db, mut app) = setup();
        db.add_client(&ClientDraft::new("Ana")).unwrap();
        db.add_client(&ClientDraft::new("Bruno")).unwrap();
        app.refresh_all(&db).unwrap();

        cycle_sort(&mut app, true);
        assert!(app.client_sort.descending);
        assert_eq!(app.clients[0].name, "Bruno");

        cycle_sort(&mut app, false);
        assert_eq!(app.client_sort.key, SortKey::Identifier);
    }
}
