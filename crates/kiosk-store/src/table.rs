use crate::{ColumnKind, FieldValue, RecordId, StoreError};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Name of the key column every table carries.
pub const ID_COLUMN: &str = "id";

#[derive(Debug)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    pub const fn nullable(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
        }
    }
}

/// Static description of a table: its name and its non-key columns in
/// storage order. The integer `id` key is implicit and always first.
#[derive(Debug)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl TableSpec {
    pub fn position(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == field)
    }

    /// Resolve a caller-supplied field name against the static column list.
    /// Only names found here ever reach generated SQL.
    pub fn column(&self, field: &str) -> Result<(usize, &'static Column), StoreError> {
        let columns: &'static [Column] = self.columns;
        columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == field)
            .ok_or_else(|| StoreError::UnknownField {
                table: self.name,
                field: field.to_string(),
            })
    }

    /// Check a full value vector (as produced by [`Record::values`]) against
    /// the column kinds and return it normalised.
    pub fn check_values(&self, values: Vec<FieldValue>) -> Result<Vec<FieldValue>, StoreError> {
        if values.len() != self.columns.len() {
            return Err(StoreError::Decode {
                table: self.name,
                field: "*".to_string(),
                reason: format!(
                    "expected {} values, got {}",
                    self.columns.len(),
                    values.len()
                ),
            });
        }
        values
            .into_iter()
            .zip(self.columns.iter())
            .map(|(value, column)| self.check_value(column, value))
            .collect()
    }

    pub fn check_value(
        &self,
        column: &'static Column,
        value: FieldValue,
    ) -> Result<FieldValue, StoreError> {
        if !value.fits(column.kind, column.nullable) {
            return Err(StoreError::TypeMismatch {
                table: self.name,
                field: column.name,
                found: value.kind_label(),
            });
        }
        Ok(value.normalize(column.kind))
    }
}

/// A decoded row handed to [`Record::from_row`].
#[derive(Debug, Clone)]
pub struct Row {
    table: &'static TableSpec,
    id: RecordId,
    values: Vec<FieldValue>,
}

impl Row {
    pub fn new(table: &'static TableSpec, id: RecordId, values: Vec<FieldValue>) -> Self {
        Self { table, id, values }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn get(&self, field: &str) -> Result<&FieldValue, StoreError> {
        let (idx, _) = self.table.column(field)?;
        self.values.get(idx).ok_or_else(|| self.decode_error(field, "missing value"))
    }

    pub fn text(&self, field: &str) -> Result<String, StoreError> {
        match self.get(field)? {
            FieldValue::Text(v) => Ok(v.clone()),
            other => Err(self.unexpected(field, other)),
        }
    }

    pub fn integer(&self, field: &str) -> Result<i64, StoreError> {
        match self.get(field)? {
            FieldValue::Integer(v) => Ok(*v),
            other => Err(self.unexpected(field, other)),
        }
    }

    pub fn decimal(&self, field: &str) -> Result<Decimal, StoreError> {
        self.opt_decimal(field)?
            .ok_or_else(|| self.decode_error(field, "unexpected null"))
    }

    pub fn opt_decimal(&self, field: &str) -> Result<Option<Decimal>, StoreError> {
        match self.get(field)? {
            FieldValue::Null => Ok(None),
            FieldValue::Decimal(v) => Ok(Some(*v)),
            FieldValue::Integer(v) => Ok(Some(Decimal::from(*v))),
            other => Err(self.unexpected(field, other)),
        }
    }

    pub fn date(&self, field: &str) -> Result<NaiveDate, StoreError> {
        match self.get(field)? {
            FieldValue::Date(v) => Ok(*v),
            other => Err(self.unexpected(field, other)),
        }
    }

    fn unexpected(&self, field: &str, found: &FieldValue) -> StoreError {
        self.decode_error(field, &format!("unexpected {}", found.kind_label()))
    }

    fn decode_error(&self, field: &str, reason: &str) -> StoreError {
        StoreError::Decode {
            table: self.table.name,
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A typed row of one table.
pub trait Record: Clone + Sized {
    const TABLE: &'static TableSpec;

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    /// Non-key values in the order of `TABLE.columns`.
    fn values(&self) -> Vec<FieldValue>;

    fn from_row(row: &Row) -> Result<Self, StoreError>;
}

/// Which rows a delete applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(RecordId),
    Exact { field: String, value: FieldValue },
}

impl Selector {
    pub fn exact(field: &str, value: impl Into<FieldValue>) -> Self {
        Self::Exact {
            field: field.to_string(),
            value: value.into(),
        }
    }
}
