pub(crate) const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id   TEXT,
    name        TEXT,
    email       TEXT,
    phone       TEXT,
    observation TEXT,
    date_added  TEXT
);

CREATE TABLE IF NOT EXISTS budgets (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    budget_id   TEXT,
    client_id   TEXT,
    date        TEXT,
    type        TEXT,
    completion  TEXT,
    deadline    TEXT,
    service     TEXT
);
"#;

/// Columns that older `clients` tables may lack. Added in place, never dropped.
pub(crate) const CLIENT_COLUMNS: &[(&str, &str)] = &[("client_id", "TEXT"), ("date_added", "TEXT")];

/// Columns that older `budgets` tables may lack. Tables from the first
/// release named the client by `name` and `email` instead of `client_id`.
pub(crate) const BUDGET_COLUMNS: &[(&str, &str)] = &[
    ("budget_id", "TEXT"),
    ("client_id", "TEXT"),
    ("date", "TEXT"),
    ("type", "TEXT"),
    ("completion", "TEXT"),
    ("deadline", "TEXT"),
    ("service", "TEXT"),
];
