use crate::models::{Budget, Client};

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page - 1);
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

/// Jump cursor to the top of a list.
pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

/// Jump cursor to the bottom of a list.
pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

/// Column a table is ordered by. `Storage` is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortKey {
    #[default]
    Storage,
    Identifier,
    Name,
    Date,
}

impl SortKey {
    pub(crate) fn next(self) -> Self {
        match self {
            Self::Storage => Self::Identifier,
            Self::Identifier => Self::Name,
            Self::Name => Self::Date,
            Self::Date => Self::Storage,
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "added" | "storage" | "none" => Some(Self::Storage),
            "id" | "identifier" => Some(Self::Identifier),
            "name" | "client" => Some(Self::Name),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage => write!(f, "added"),
            Self::Identifier => write!(f, "id"),
            Self::Name => write!(f, "name"),
            Self::Date => write!(f, "date"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Sort {
    pub(crate) key: SortKey,
    pub(crate) descending: bool,
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arrow = if self.descending { "↓" } else { "↑" };
        write!(f, "{}{arrow}", self.key)
    }
}

/// Order clients in place. Dates are compared as dates; unparseable ones
/// sort before every valid date.
pub(crate) fn sort_clients(clients: &mut [Client], sort: Sort) {
    match sort.key {
        SortKey::Storage => clients.sort_by_key(|c| c.id),
        SortKey::Identifier => clients.sort_by(|a, b| a.client_id.cmp(&b.client_id)),
        SortKey::Name => clients.sort_by_cached_key(|c| c.name.to_lowercase()),
        SortKey::Date => clients.sort_by_key(|c| c.date_added_parsed()),
    }
    if sort.descending {
        clients.reverse();
    }
}

/// Order budgets in place. `Name` sorts by the displayed client label.
pub(crate) fn sort_budgets(budgets: &mut [Budget], sort: Sort) {
    match sort.key {
        SortKey::Storage => budgets.sort_by_key(|b| b.id),
        SortKey::Identifier => budgets.sort_by(|a, b| a.budget_id.cmp(&b.budget_id)),
        SortKey::Name => budgets.sort_by_cached_key(|b| b.client_label().to_lowercase()),
        SortKey::Date => budgets.sort_by_key(|b| b.date_parsed()),
    }
    if sort.descending {
        budgets.reverse();
    }
}
