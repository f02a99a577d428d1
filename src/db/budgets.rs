use rusqlite::{params, Connection, Row};

use super::{identifier_arg, unused_identifier, Database};
use crate::error::{RecordError, RecordResult};
use crate::ids;
use crate::models::{today, Budget, BudgetDraft, RecordKind};
use crate::validate::sanitize;

/// The client name is looked up per row rather than joined, so duplicate
/// client identifiers cannot multiply budget rows.
const SELECT_BUDGETS: &str = "SELECT b.id, b.budget_id, b.client_id,
        (SELECT c.name FROM clients c WHERE c.client_id = b.client_id ORDER BY c.id LIMIT 1),
        b.date, b.type, b.completion, b.deadline, b.service
     FROM budgets b";

struct CheckedBudget {
    client_ref: String,
    kind: String,
    completion: String,
    deadline: String,
    service: String,
}

fn check_budget(draft: &BudgetDraft) -> RecordResult<CheckedBudget> {
    let client_ref = sanitize(&draft.client_ref);
    if client_ref.is_empty() {
        return Err(RecordError::MissingField("Client"));
    }
    Ok(CheckedBudget {
        client_ref: client_ref.to_string(),
        kind: sanitize(&draft.kind).to_string(),
        completion: sanitize(&draft.completion).to_string(),
        deadline: sanitize(&draft.deadline).to_string(),
        service: sanitize(&draft.service).to_string(),
    })
}

fn budget_from_row(row: &Row) -> rusqlite::Result<Budget> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    Ok(Budget {
        id: Some(row.get(0)?),
        budget_id: text(1)?,
        client_id: text(2)?,
        client_name: row.get(3)?,
        date: text(4)?,
        kind: text(5)?,
        completion: text(6)?,
        deadline: text(7)?,
        service: text(8)?,
    })
}

/// Resolve a client reference to a stored client identifier: an exact
/// identifier match wins, otherwise a case-insensitive name match.
pub(super) fn resolve_client(conn: &Connection, client_ref: &str) -> RecordResult<String> {
    let mut stmt = conn.prepare(
        "SELECT client_id, name FROM clients
         WHERE client_id IS NOT NULL AND client_id != '' ORDER BY id",
    )?;
    let clients: Vec<(String, Option<String>)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<_, _>>()?;

    if ids::is_identifier(ids::CLIENT_PREFIX, client_ref) {
        if let Some((client_id, _)) = clients
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(client_ref))
        {
            return Ok(client_id.clone());
        }
    }

    let wanted = client_ref.to_lowercase();
    let mut by_name = clients
        .iter()
        .filter(|(_, name)| name.as_deref().is_some_and(|n| n.to_lowercase() == wanted));
    let (client_id, _) = by_name
        .next()
        .ok_or_else(|| RecordError::UnknownClient(client_ref.to_string()))?;
    if by_name.next().is_some() {
        tracing::warn!(name = client_ref, %client_id, "several clients share this name, using the oldest");
    }
    Ok(client_id.clone())
}

impl Database {
    /// Validate and insert a budget for an existing client, returning the new
    /// budget identifier. Only the client's identifier is stored.
    pub(crate) fn add_budget(&self, draft: &BudgetDraft) -> RecordResult<String> {
        let budget = check_budget(draft)?;
        self.with_connection(|conn| {
            let client_id = resolve_client(conn, &budget.client_ref)?;
            let budget_id = unused_identifier(conn, "budgets", "budget_id", ids::new_budget_id)?;
            conn.execute(
                "INSERT INTO budgets (budget_id, client_id, date, type, completion, deadline, service)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    budget_id,
                    client_id,
                    today(),
                    budget.kind,
                    budget.completion,
                    budget.deadline,
                    budget.service,
                ],
            )?;
            tracing::info!(%budget_id, %client_id, "budget added");
            Ok(budget_id)
        })
    }

    /// Overwrite the client reference and free-text fields. `date` is kept.
    pub(crate) fn edit_budget(&self, budget_id: &str, draft: &BudgetDraft) -> RecordResult<()> {
        let budget = check_budget(draft)?;
        let budget_id = identifier_arg(budget_id);
        self.with_connection(|conn| {
            let client_id = resolve_client(conn, &budget.client_ref)?;
            let changed = conn.execute(
                "UPDATE budgets SET client_id = ?1, type = ?2, completion = ?3, deadline = ?4, service = ?5
                 WHERE budget_id = ?6",
                params![
                    client_id,
                    budget.kind,
                    budget.completion,
                    budget.deadline,
                    budget.service,
                    budget_id,
                ],
            )?;
            if changed == 0 {
                return Err(RecordError::NotFound {
                    kind: RecordKind::Budget,
                    id: budget_id.clone(),
                });
            }
            tracing::info!(%budget_id, "budget updated");
            Ok(())
        })
    }

    /// Returns the number of rows removed; 0 when nothing matched.
    pub(crate) fn delete_budget(&self, budget_id: &str) -> RecordResult<usize> {
        let budget_id = identifier_arg(budget_id);
        self.with_connection(|conn| {
            let removed =
                conn.execute("DELETE FROM budgets WHERE budget_id = ?1", params![budget_id])?;
            tracing::info!(%budget_id, removed, "budget delete");
            Ok(removed)
        })
    }

    /// All budgets in storage order, with client names resolved.
    pub(crate) fn list_budgets(&self) -> RecordResult<Vec<Budget>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_BUDGETS} ORDER BY b.id"))?;
            let rows = stmt.query_map([], budget_from_row)?;
            Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
        })
    }
}
