use crate::RecordId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database unavailable: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("file unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("a record with id {id} already exists in {table}")]
    DuplicateKey { table: &'static str, id: RecordId },
    #[error("no record with id {id} in {table}")]
    NotFound { table: &'static str, id: RecordId },
    #[error("{table} has no field named '{field}'")]
    UnknownField { table: &'static str, field: String },
    #[error("{table}.{field} cannot hold {found}")]
    TypeMismatch {
        table: &'static str,
        field: &'static str,
        found: &'static str,
    },
    #[error("{table}: cannot decode {field}: {reason}")]
    Decode {
        table: &'static str,
        field: String,
        reason: String,
    },
}

impl StoreError {
    /// Whether the backing medium itself failed (driver error, unreadable file).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Sqlite(_) | Self::Io(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
