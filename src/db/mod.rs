mod budgets;
mod clients;
mod schema;

use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::error::{RecordError, RecordResult};
use crate::ids;
use crate::validate::sanitize;

/// How many fresh identifiers to draw before accepting a duplicate.
const ID_ATTEMPTS: usize = 8;

/// Handle on the record store.
///
/// Holds no open connection: every operation opens its own through
/// [`Database::with_connection`] and closes it before returning.
pub(crate) struct Database {
    path: PathBuf,
    lock_timeout: Duration,
    max_field_len: usize,
    normalize_phone: bool,
}

impl Database {
    pub(crate) fn open(config: &Config) -> RecordResult<Self> {
        let db = Self {
            path: config.db_path.clone(),
            lock_timeout: config.lock_timeout,
            max_field_len: config.max_field_len,
            normalize_phone: config.normalize_phone,
        };
        db.ensure_schema()?;
        Ok(db)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Create missing tables and add missing columns. Existing rows are never
    /// touched except to give legacy records an identifier and to link legacy
    /// budgets to their client by name.
    pub(crate) fn ensure_schema(&self) -> RecordResult<()> {
        self.with_connection(|conn| {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
            conn.execute_batch(schema::CREATE_TABLES)?;

            add_missing_columns(conn, "clients", schema::CLIENT_COLUMNS)?;
            let budget_columns = add_missing_columns(conn, "budgets", schema::BUDGET_COLUMNS)?;

            backfill_ids(conn, "clients", "client_id", ids::new_client_id)?;
            backfill_ids(conn, "budgets", "budget_id", ids::new_budget_id)?;
            if budget_columns.iter().any(|c| c == "name") {
                link_budgets_by_name(conn)?;
            }
            Ok(())
        })
    }

    /// Run `op` on a connection opened for this call only.
    ///
    /// The connection is closed before this returns, whether `op` succeeded,
    /// failed, or unwound. Storage failures are logged here.
    pub(crate) fn with_connection<T>(
        &self,
        op: impl FnOnce(&Connection) -> RecordResult<T>,
    ) -> RecordResult<T> {
        let result = self.connect().map_err(RecordError::from).and_then(|conn| {
            let value = op(&conn);
            settle(value, conn.close().map_err(|(_, e)| e))
        });

        if let Err(RecordError::Storage(ref e)) = result {
            tracing::error!(error = %e, path = %self.path.display(), "storage failure");
        }
        result
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.lock_timeout)?;
        Ok(conn)
    }
}

/// Combine the outcome of an operation with the outcome of closing its
/// connection. Work `op` already did stands even if the close fails.
fn settle<T>(value: RecordResult<T>, closed: rusqlite::Result<()>) -> RecordResult<T> {
    if let Err(e) = closed {
        tracing::warn!(error = %e, "failed to close connection");
    }
    value
}

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let rows = stmt.query_map(params![table], |row| row.get(0))?;
    rows.collect()
}

/// Add each of `columns` that `table` lacks. Returns the columns the table
/// had before any were added.
fn add_missing_columns(
    conn: &Connection,
    table: &str,
    columns: &[(&str, &str)],
) -> RecordResult<Vec<String>> {
    let existing = table_columns(conn, table)?;
    for (column, decl) in columns {
        if !existing.iter().any(|c| c == column) {
            conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl}"))?;
            tracing::info!(table, column, "added missing column");
        }
    }
    Ok(existing)
}

/// Rows created before `column` existed cannot be edited or deleted by
/// identifier; give them one.
fn backfill_ids(
    conn: &Connection,
    table: &str,
    column: &str,
    mut generate: impl FnMut() -> String,
) -> RecordResult<()> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id FROM {table} WHERE {column} IS NULL OR {column} = ''"
    ))?;
    let rows: Vec<i64> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<_, _>>()?;

    for id in &rows {
        let assigned = unused_identifier(conn, table, column, &mut generate)?;
        conn.execute(
            &format!("UPDATE {table} SET {column} = ?1 WHERE id = ?2"),
            params![assigned, id],
        )?;
    }
    if !rows.is_empty() {
        tracing::info!(table, count = rows.len(), "assigned identifiers to legacy rows");
    }
    Ok(())
}

/// Budgets from tables that named the client instead of storing its
/// identifier. Names with no matching client are left unlinked.
fn link_budgets_by_name(conn: &Connection) -> RecordResult<()> {
    let mut stmt = conn.prepare(
        "SELECT id, name FROM budgets
         WHERE (client_id IS NULL OR client_id = '') AND name IS NOT NULL AND name != ''",
    )?;
    let rows: Vec<(i64, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<_, _>>()?;

    let mut linked = 0;
    for (id, name) in &rows {
        let client_id = match budgets::resolve_client(conn, name.trim()) {
            Ok(client_id) => client_id,
            Err(RecordError::UnknownClient(_)) => {
                tracing::warn!(id, name = %name, "legacy budget names no known client");
                continue;
            }
            Err(e) => return Err(e),
        };
        conn.execute(
            "UPDATE budgets SET client_id = ?1 WHERE id = ?2",
            params![client_id, id],
        )?;
        linked += 1;
    }
    if linked > 0 {
        tracing::info!(count = linked, "linked legacy budgets to clients");
    }
    Ok(())
}

/// Identifier arguments are matched in their stored upper-case form.
fn identifier_arg(raw: &str) -> String {
    sanitize(raw).to_ascii_uppercase()
}

/// Draw identifiers until one is not already present in `table.column`.
///
/// The identifier space is small; after [`ID_ATTEMPTS`] collisions the next
/// draw is used as-is, since uniqueness is a convention and not a constraint.
fn unused_identifier(
    conn: &Connection,
    table: &str,
    column: &str,
    mut generate: impl FnMut() -> String,
) -> RecordResult<String> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {column} = ?1)");
    for _ in 0..ID_ATTEMPTS {
        let candidate = generate();
        let taken: bool = conn.query_row(&sql, params![candidate], |row| row.get(0))?;
        if !taken {
            return Ok(candidate);
        }
        tracing::warn!(%candidate, table, "identifier already in use, drawing again");
    }
    let candidate = generate();
    tracing::warn!(%candidate, table, "no free identifier found, keeping a possible duplicate");
    Ok(candidate)
}
