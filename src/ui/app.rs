use crate::db::Database;
use crate::error::RecordResult;
use crate::models::{Budget, Client};

use super::form::Form;
use super::theme::Theme;
use super::util::{sort_budgets, sort_clients, Sort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Clients,
    Budgets,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Clients, Self::Budgets]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clients => write!(f, "Clients"),
            Self::Budgets => write!(f, "Budgets"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Form,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Form => write!(f, "FORM"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteClient { client_id: String, name: String },
    DeleteBudget { budget_id: String, client: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) theme: Theme,

    // Clients
    pub(crate) clients: Vec<Client>,
    pub(crate) client_index: usize,
    pub(crate) client_scroll: usize,
    pub(crate) client_sort: Sort,

    // Budgets
    pub(crate) budgets: Vec<Budget>,
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,
    pub(crate) budget_sort: Sort,
    pub(crate) client_names: Vec<String>,

    // Add/edit overlay
    pub(crate) form: Option<Form>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(theme: Theme) -> Self {
        Self {
            running: true,
            screen: Screen::Clients,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            theme,

            clients: Vec::new(),
            client_index: 0,
            client_scroll: 0,
            client_sort: Sort::default(),

            budgets: Vec::new(),
            budget_index: 0,
            budget_scroll: 0,
            budget_sort: Sort::default(),
            client_names: Vec::new(),

            form: None,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn refresh_clients(&mut self, db: &Database) -> RecordResult<()> {
        let search = if self.search_input.is_empty() {
            None
        } else {
            Some(self.search_input.as_str())
        };
        self.clients = db.list_clients(search)?;
        sort_clients(&mut self.clients, self.client_sort);
        clamp_cursor(&mut self.client_index, &mut self.client_scroll, self.clients.len());
        Ok(())
    }

    pub(crate) fn refresh_budgets(&mut self, db: &Database) -> RecordResult<()> {
        self.budgets = db.list_budgets()?;
        sort_budgets(&mut self.budgets, self.budget_sort);
        clamp_cursor(&mut self.budget_index, &mut self.budget_scroll, self.budgets.len());
        self.client_names = db.client_names()?;
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> RecordResult<()> {
        self.refresh_clients(db)?;
        self.refresh_budgets(db)?;
        Ok(())
    }

    /// Re-apply the current sort without reloading.
    pub(crate) fn resort(&mut self) {
        match self.screen {
            Screen::Clients => sort_clients(&mut self.clients, self.client_sort),
            Screen::Budgets => sort_budgets(&mut self.budgets, self.budget_sort),
        }
    }

    pub(crate) fn current_sort_mut(&mut self) -> &mut Sort {
        match self.screen {
            Screen::Clients => &mut self.client_sort,
            Screen::Budgets => &mut self.budget_sort,
        }
    }

    pub(crate) fn selected_client(&self) -> Option<&Client> {
        self.clients.get(self.client_index)
    }

    pub(crate) fn selected_budget(&self) -> Option<&Budget> {
        self.budgets.get(self.budget_index)
    }

    pub(crate) fn open_form(&mut self, form: Form) {
        self.form = Some(form);
        self.input_mode = InputMode::Form;
    }

    pub(crate) fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

fn clamp_cursor(index: &mut usize, scroll: &mut usize, len: usize) {
    if *index >= len {
        *index = len.saturating_sub(1);
    }
    if *scroll > *index {
        *scroll = *index;
    }
}
