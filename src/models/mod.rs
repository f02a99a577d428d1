mod budget;
mod client;

pub(crate) use budget::{Budget, BudgetDraft};
pub(crate) use client::{Client, ClientDraft};

/// Which table a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordKind {
    Client,
    Budget,
}

impl RecordKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Budget => "Budget",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored date format (`DD/MM/YYYY`). Not sortable as text.
pub(crate) const DATE_FORMAT: &str = "%d/%m/%Y";

pub(crate) fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(s: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests;
