use thiserror::Error as ThisError;

use crate::models::RecordKind;

/// Failure of a record operation.
///
/// Everything except `Storage` is a rejected input: the caller re-prompts and
/// nothing has been written.
#[derive(Debug, ThisError)]
pub(crate) enum RecordError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} is longer than {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("No client matches '{0}'")]
    UnknownClient(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: String },

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl RecordError {
    pub(crate) fn is_validation(&self) -> bool {
        !matches!(self, Self::NotFound { .. } | Self::Storage(_))
    }
}

pub(crate) type RecordResult<T> = std::result::Result<T, RecordError>;
