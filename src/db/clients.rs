use rusqlite::{params, OptionalExtension, Row};

use super::{identifier_arg, unused_identifier, Database};
use crate::error::{RecordError, RecordResult};
use crate::ids;
use crate::models::{today, Client, ClientDraft, RecordKind};
use crate::validate::{is_present, is_valid_email, normalize_phone, sanitize};

const SELECT_CLIENTS: &str =
    "SELECT id, client_id, name, email, phone, observation, date_added FROM clients";

/// A draft that passed validation, ready to be written.
struct CheckedClient {
    name: String,
    email: String,
    phone: String,
    observation: String,
}

fn client_from_row(row: &Row) -> rusqlite::Result<Client> {
    // Columns added by migration are NULL on older rows
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    Ok(Client {
        id: Some(row.get(0)?),
        client_id: text(1)?,
        name: text(2)?,
        email: text(3)?,
        phone: text(4)?,
        observation: text(5)?,
        date_added: text(6)?,
    })
}

impl Database {
    fn check_client(&self, draft: &ClientDraft) -> RecordResult<CheckedClient> {
        let name = sanitize(&draft.name);
        if name.is_empty() {
            return Err(RecordError::MissingField("Name"));
        }
        if !is_present(name, self.max_field_len) {
            return Err(RecordError::FieldTooLong {
                field: "Name",
                max: self.max_field_len,
            });
        }

        let email = sanitize(&draft.email);
        if !email.is_empty() && !is_valid_email(email) {
            return Err(RecordError::InvalidEmail(email.to_string()));
        }

        let phone = sanitize(&draft.phone);
        let phone = if self.normalize_phone {
            normalize_phone(phone)
        } else {
            phone.to_string()
        };

        Ok(CheckedClient {
            name: name.to_string(),
            email: email.to_string(),
            phone,
            observation: sanitize(&draft.observation).to_string(),
        })
    }

    /// Validate and insert a client, returning its new identifier.
    pub(crate) fn add_client(&self, draft: &ClientDraft) -> RecordResult<String> {
        let client = self.check_client(draft)?;
        self.with_connection(|conn| {
            let client_id = unused_identifier(conn, "clients", "client_id", ids::new_client_id)?;
            conn.execute(
                "INSERT INTO clients (client_id, name, email, phone, observation, date_added)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    client_id,
                    client.name,
                    client.email,
                    client.phone,
                    client.observation,
                    today(),
                ],
            )?;
            tracing::info!(%client_id, "client added");
            Ok(client_id)
        })
    }

    /// Overwrite every mutable field of the client. `date_added` is kept.
    pub(crate) fn edit_client(&self, client_id: &str, draft: &ClientDraft) -> RecordResult<()> {
        let client = self.check_client(draft)?;
        let client_id = identifier_arg(client_id);
        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE clients SET name = ?1, email = ?2, phone = ?3, observation = ?4
                 WHERE client_id = ?5",
                params![
                    client.name,
                    client.email,
                    client.phone,
                    client.observation,
                    client_id,
                ],
            )?;
            if changed == 0 {
                return Err(RecordError::NotFound {
                    kind: RecordKind::Client,
                    id: client_id.clone(),
                });
            }
            tracing::info!(%client_id, "client updated");
            Ok(())
        })
    }

    /// Returns the number of rows removed; 0 when nothing matched.
    pub(crate) fn delete_client(&self, client_id: &str) -> RecordResult<usize> {
        let client_id = identifier_arg(client_id);
        self.with_connection(|conn| {
            let removed =
                conn.execute("DELETE FROM clients WHERE client_id = ?1", params![client_id])?;
            tracing::info!(%client_id, removed, "client delete");
            Ok(removed)
        })
    }

    /// All clients in storage order, optionally narrowed to those matching
    /// `search` in any column (case-insensitive).
    pub(crate) fn list_clients(&self, search: Option<&str>) -> RecordResult<Vec<Client>> {
        let clients = self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_CLIENTS} ORDER BY id"))?;
            let rows = stmt.query_map([], client_from_row)?;
            Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
        })?;

        Ok(match search {
            Some(term) if !term.is_empty() => {
                clients.into_iter().filter(|c| c.matches(term)).collect()
            }
            _ => clients,
        })
    }

    pub(crate) fn get_client(&self, client_id: &str) -> RecordResult<Option<Client>> {
        let client_id = identifier_arg(client_id);
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!("{SELECT_CLIENTS} WHERE client_id = ?1 ORDER BY id LIMIT 1"),
                    params![client_id],
                    client_from_row,
                )
                .optional()?)
        })
    }

    /// Distinct client names, alphabetical, for pickers.
    pub(crate) fn client_names(&self) -> RecordResult<Vec<String>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT name FROM clients WHERE name IS NOT NULL AND name != ''
                 ORDER BY name COLLATE NOCASE",
            )?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            Ok(rows.collect::<std::result::Result<Vec<String>, _>>()?)
        })
    }
}
