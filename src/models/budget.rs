#[derive(Debug, Clone, Default)]
pub(crate) struct Budget {
    pub(crate) id: Option<i64>,
    /// Human-facing code, `ART-####`.
    pub(crate) budget_id: String,
    /// Identifier of the owning client. Not enforced by the store.
    pub(crate) client_id: String,
    /// Resolved on read; `None` once the client has been deleted.
    pub(crate) client_name: Option<String>,
    /// Format: "DD/MM/YYYY"
    pub(crate) date: String,
    pub(crate) kind: String,
    pub(crate) completion: String,
    pub(crate) deadline: String,
    pub(crate) service: String,
}

impl Budget {
    pub(crate) fn client_label(&self) -> &str {
        match self.client_name.as_deref() {
            Some(name) => name,
            None if self.client_id.is_empty() => "—",
            None => &self.client_id,
        }
    }

    pub(crate) fn date_parsed(&self) -> Option<chrono::NaiveDate> {
        super::parse_date(&self.date)
    }
}

/// Input for creating or editing a budget.
///
/// `client_ref` is either a client identifier or a client name; it is
/// resolved to an identifier when the budget is written.
#[derive(Debug, Clone, Default)]
pub(crate) struct BudgetDraft {
    pub(crate) client_ref: String,
    pub(crate) kind: String,
    pub(crate) completion: String,
    pub(crate) deadline: String,
    pub(crate) service: String,
}

impl BudgetDraft {
    pub(crate) fn new(client_ref: impl Into<String>) -> Self {
        Self {
            client_ref: client_ref.into(),
            ..Self::default()
        }
    }

    pub(crate) fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub(crate) fn with_completion(mut self, completion: impl Into<String>) -> Self {
        self.completion = completion.into();
        self
    }

    pub(crate) fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = deadline.into();
        self
    }

    pub(crate) fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }
}

impl From<&Budget> for BudgetDraft {
    fn from(budget: &Budget) -> Self {
        Self {
            client_ref: budget.client_id.clone(),
            kind: budget.kind.clone(),
            completion: budget.completion.clone(),
            deadline: budget.deadline.clone(),
            service: budget.service.clone(),
        }
    }
}
