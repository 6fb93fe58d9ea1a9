//! Keyed record persistence shared by the kiosk tools: typed table specs,
//! max-plus-one id allocation, case-sensitive partial-match search and
//! single-field updates over SQLite or comma-delimited flat files.

mod error;
pub mod flatfile;
mod sqlite;
mod table;
mod value;

pub use error::StoreError;
pub use flatfile::FlatFileStore;
pub use sqlite::SqliteStore;
pub use table::{Column, Record, Row, Selector, TableSpec, ID_COLUMN};
pub use value::{ColumnKind, FieldValue};

pub type RecordId = i64;

/// Keyed get/put/delete/scan over typed tables.
///
/// Every operation is single-row or single-scan and completes before
/// returning; callers hold one store for the whole session.
pub trait RecordStore {
    /// Create the backing table (or file) if it does not exist yet.
    fn ensure_table<R: Record>(&mut self) -> Result<(), StoreError>;

    /// `1 + max(id)` over the current rows, or `1` for an empty table. A
    /// vacated maximum is handed out again; lower gaps never are.
    fn next_id<R: Record>(&self) -> Result<RecordId, StoreError>;

    fn insert<R: Record>(&mut self, record: &R) -> Result<(), StoreError>;

    /// Assign [`RecordStore::next_id`] to `record` and insert it.
    fn insert_new<R: Record>(&mut self, mut record: R) -> Result<R, StoreError> {
        let id = self.next_id::<R>()?;
        record.set_id(id);
        self.insert(&record)?;
        Ok(record)
    }

    fn find_by_id<R: Record>(&self, id: RecordId) -> Result<R, StoreError>;

    /// Rows whose `field` contains `needle` (case-sensitive), in insertion
    /// order unless `order_by` names a column to sort ascending by.
    fn find_by_partial_match<R: Record>(
        &self,
        field: &str,
        needle: &str,
        order_by: Option<&str>,
    ) -> Result<Vec<R>, StoreError>;

    /// First row in store order whose `field` contains `needle`.
    fn first_partial_match<R: Record>(
        &self,
        field: &str,
        needle: &str,
    ) -> Result<Option<R>, StoreError> {
        Ok(self
            .find_by_partial_match::<R>(field, needle, None)?
            .into_iter()
            .next())
    }

    /// Rows whose `field` equals `value` exactly.
    fn find_by_value<R: Record>(
        &self,
        field: &str,
        value: &FieldValue,
        order_by: Option<&str>,
    ) -> Result<Vec<R>, StoreError>;

    fn update_field<R: Record>(
        &mut self,
        id: RecordId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), StoreError>;

    /// Remove matching rows and return how many went. Zero is not an error.
    fn delete<R: Record>(&mut self, selector: &Selector) -> Result<usize, StoreError>;

    fn list_all<R: Record>(&self, order_by: Option<&str>) -> Result<Vec<R>, StoreError>;

    fn count<R: Record>(&self) -> Result<usize, StoreError>;
}

/// Stable ascending sort by one column; rows that compare equal keep their
/// store order.
pub(crate) fn sort_records<R: Record>(
    records: &mut [R],
    order_by: Option<&str>,
) -> Result<(), StoreError> {
    let Some(field) = order_by else {
        return Ok(());
    };
    if field == ID_COLUMN {
        records.sort_by_key(|r| r.id());
        return Ok(());
    }
    let (idx, _) = R::TABLE.column(field)?;
    let mut keyed: Vec<(FieldValue, R)> = records
        .iter()
        .map(|r| {
            let key = r.values().into_iter().nth(idx).unwrap_or(FieldValue::Null);
            (key, r.clone())
        })
        .collect();
    keyed.sort_by(|a, b| a.0.order_cmp(&b.0));
    for (slot, (_, record)) in records.iter_mut().zip(keyed) {
        *slot = record;
    }
    Ok(())
}
