use crate::db::Database;
use crate::error::RecordResult;
use crate::models::{Budget, BudgetDraft, Client, ClientDraft};
use crate::validate::format_phone;

const MAX_SUGGESTIONS: usize = 5;

/// What saving the form does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormKind {
    AddClient,
    EditClient { client_id: String },
    AddBudget,
    EditBudget { budget_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    /// Digits only, re-rendered with `format_phone` on every keystroke.
    Phone,
    /// Free text completed from the known client names.
    ClientRef,
}

#[derive(Debug, Clone)]
pub(crate) struct FormField {
    pub(crate) label: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) required: bool,
    pub(crate) value: String,
}

impl FormField {
    fn new(label: &'static str, kind: FieldKind, value: &str) -> Self {
        Self {
            label,
            kind,
            required: false,
            value: value.to_string(),
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Overlay for adding or editing one record. Field values are raw input;
/// validation happens in the record services on submit.
#[derive(Debug, Clone)]
pub(crate) struct Form {
    pub(crate) kind: FormKind,
    pub(crate) fields: Vec<FormField>,
    pub(crate) focus: usize,
    pub(crate) error: Option<String>,
}

impl Form {
    fn new(kind: FormKind, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            fields,
            focus: 0,
            error: None,
        }
    }

    fn client_fields(draft: &ClientDraft) -> Vec<FormField> {
        vec![
            FormField::new("Name", FieldKind::Text, &draft.name).required(),
            FormField::new("Email", FieldKind::Text, &draft.email),
            FormField::new("Phone", FieldKind::Phone, &draft.phone),
            FormField::new("Observation", FieldKind::Text, &draft.observation),
        ]
    }

    fn budget_fields(draft: &BudgetDraft) -> Vec<FormField> {
        vec![
            FormField::new("Client", FieldKind::ClientRef, &draft.client_ref).required(),
            FormField::new("Type", FieldKind::Text, &draft.kind),
            FormField::new("Completion", FieldKind::Text, &draft.completion),
            FormField::new("Deadline", FieldKind::Text, &draft.deadline),
            FormField::new("Service", FieldKind::Text, &draft.service),
        ]
    }

    pub(crate) fn add_client() -> Self {
        Self::new(FormKind::AddClient, Self::client_fields(&ClientDraft::default()))
    }

    pub(crate) fn edit_client(client: &Client) -> Self {
        Self::new(
            FormKind::EditClient {
                client_id: client.client_id.clone(),
            },
            Self::client_fields(&ClientDraft::from(client)),
        )
    }

    /// `client_ref` pre-fills the client field, e.g. from the selected client.
    pub(crate) fn add_budget(client_ref: &str) -> Self {
        Self::new(
            FormKind::AddBudget,
            Self::budget_fields(&BudgetDraft::new(client_ref)),
        )
    }

    pub(crate) fn edit_budget(budget: &Budget) -> Self {
        // The identifier, not the name: names need not be unique
        let draft = BudgetDraft::from(budget);
        Self::new(
            FormKind::EditBudget {
                budget_id: budget.budget_id.clone(),
            },
            Self::budget_fields(&draft),
        )
    }

    pub(crate) fn title(&self) -> String {
        match &self.kind {
            FormKind::AddClient => " New client ".into(),
            FormKind::EditClient { client_id } => format!(" Edit client {client_id} "),
            FormKind::AddBudget => " New budget ".into(),
            FormKind::EditBudget { budget_id } => format!(" Edit budget {budget_id} "),
        }
    }

    pub(crate) fn focused(&self) -> Option<&FormField> {
        self.fields.get(self.focus)
    }

    pub(crate) fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub(crate) fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = self
                .focus
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    pub(crate) fn push_char(&mut self, c: char) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match field.kind {
            FieldKind::Phone => {
                if c.is_ascii_digit() {
                    field.value.push(c);
                    field.value = format_phone(&field.value);
                }
            }
            FieldKind::Text | FieldKind::ClientRef => field.value.push(c),
        }
        self.error = None;
    }

    pub(crate) fn backspace(&mut self) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match field.kind {
            FieldKind::Phone => {
                // Drop the last digit, not the last punctuation mark
                let mut digits: String = field.value.chars().filter(char::is_ascii_digit).collect();
                digits.pop();
                field.value = format_phone(&digits);
            }
            FieldKind::Text | FieldKind::ClientRef => {
                field.value.pop();
            }
        }
        self.error = None;
    }

    /// Client names containing the focused client field's text, for completion.
    pub(crate) fn suggestions<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        let Some(field) = self.focused().filter(|f| f.kind == FieldKind::ClientRef) else {
            return Vec::new();
        };
        let typed = field.value.trim().to_lowercase();
        if typed.is_empty() {
            return Vec::new();
        }
        names
            .iter()
            .filter(|n| {
                let lower = n.to_lowercase();
                lower.contains(&typed) && lower != typed
            })
            .take(MAX_SUGGESTIONS)
            .map(String::as_str)
            .collect()
    }

    /// Replace the client field with the first suggestion. Returns whether
    /// anything changed.
    pub(crate) fn accept_suggestion(&mut self, names: &[String]) -> bool {
        let Some(first) = self.suggestions(names).first().map(|s| s.to_string()) else {
            return false;
        };
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value = first;
        }
        true
    }

    fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map_or("", |f| f.value.as_str())
    }

    pub(crate) fn client_draft(&self) -> ClientDraft {
        ClientDraft::new(self.value(0))
            .with_email(self.value(1))
            .with_phone(self.value(2))
            .with_observation(self.value(3))
    }

    pub(crate) fn budget_draft(&self) -> BudgetDraft {
        BudgetDraft::new(self.value(0))
            .with_kind(self.value(1))
            .with_completion(self.value(2))
            .with_deadline(self.value(3))
            .with_service(self.value(4))
    }

    /// Write the form through the record services, returning a status line.
    pub(crate) fn submit(&self, db: &Database) -> RecordResult<String> {
        match &self.kind {
            FormKind::AddClient => {
                let client_id = db.add_client(&self.client_draft())?;
                Ok(format!("Added client {client_id}"))
            }
            FormKind::EditClient { client_id } => {
                db.edit_client(client_id, &self.client_draft())?;
                Ok(format!("Updated client {client_id}"))
            }
            FormKind::AddBudget => {
                let budget_id = db.add_budget(&self.budget_draft())?;
                Ok(format!("Added budget {budget_id}"))
            }
            FormKind::EditBudget { budget_id } => {
                db.edit_budget(budget_id, &self.budget_draft())?;
                Ok(format!("Updated budget {budget_id}"))
            }
        }
    }

    pub(crate) fn is_client_form(&self) -> bool {
        matches!(
            self.kind,
            FormKind::AddClient | FormKind::EditClient { .. }
        )
    }
}
