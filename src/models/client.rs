#[derive(Debug, Clone, Default)]
pub(crate) struct Client {
    pub(crate) id: Option<i64>,
    /// Human-facing code, `AUT-####`.
    pub(crate) client_id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) observation: String,
    /// Format: "DD/MM/YYYY"
    pub(crate) date_added: String,
}

impl Client {
    /// Case-insensitive substring match over every displayed column.
    pub(crate) fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        [
            &self.client_id,
            &self.name,
            &self.email,
            &self.phone,
            &self.observation,
            &self.date_added,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    pub(crate) fn date_added_parsed(&self) -> Option<chrono::NaiveDate> {
        super::parse_date(&self.date_added)
    }
}

impl std::fmt::Display for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.client_id)
    }
}

/// Input for creating or editing a client. Fields are raw user input;
/// the record service sanitizes and validates them.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClientDraft {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) observation: String,
}

impl ClientDraft {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub(crate) fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub(crate) fn with_observation(mut self, observation: impl Into<String>) -> Self {
        self.observation = observation.into();
        self
    }
}

impl From<&Client> for ClientDraft {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            observation: client.observation.clone(),
        }
    }
}
