//! Comma-delimited flat-file backend.
//!
//! One file per table, one record per line: `id, field, field, ...`. Commas
//! inside text values are replaced with [`COMMA_PLACEHOLDER`] on write and
//! are not restored on read.

use crate::{
    sort_records, ColumnKind, FieldValue, Record, RecordId, RecordStore, Row, Selector,
    StoreError, TableSpec,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tempfile::NamedTempFile;
use tracing::debug;

pub const DELIMITER: &str = ", ";
pub const COMMA_PLACEHOLDER: char = '|';
/// Dates as they appear in task files, e.g. `16 Oct 26`.
pub const DATE_FORMAT: &str = "%d %b %y";

/// Replace embedded commas so a value cannot split into two fields.
pub fn escape_commas(value: &str) -> String {
    value.replace(',', &COMMA_PLACEHOLDER.to_string())
}

/// Split a stored line into trimmed fields.
pub fn split_line(line: &str) -> Vec<String> {
    line.trim()
        .split(',')
        .map(|field| field.trim().to_string())
        .collect()
}

/// Join already-escaped fields into one line (no trailing newline).
pub fn join_fields<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(DELIMITER)
}

pub struct FlatFileStore {
    dir: PathBuf,
    overrides: HashMap<&'static str, PathBuf>,
}

impl FlatFileStore {
    /// Tables live at `<dir>/<table>.txt` unless remapped with
    /// [`FlatFileStore::with_file`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overrides: HashMap::new(),
        }
    }

    pub fn with_file(mut self, table: &'static str, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(table, path.into());
        self
    }

    pub fn path_for(&self, table: &TableSpec) -> PathBuf {
        self.overrides
            .get(table.name)
            .cloned()
            .unwrap_or_else(|| self.dir.join(format!("{}.txt", table.name)))
    }

    fn read_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let path = self.path_for(R::TABLE);
        let text = fs::read_to_string(&path)?;
        let mut out = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            out.push(decode_line::<R>(line, lineno + 1)?);
        }
        Ok(out)
    }

    /// Replace the table file with `records`, via a temp file in the same
    /// directory so a failed write leaves the old contents intact.
    fn rewrite<R: Record>(&self, records: &[R]) -> Result<(), StoreError> {
        let path = self.path_for(R::TABLE);
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = NamedTempFile::new_in(&parent)?;
        for record in records {
            writeln!(tmp, "{}", encode_line(record)?)?;
        }
        tmp.flush()?;
        tmp.persist(&path).map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }
}

impl RecordStore for FlatFileStore {
    fn ensure_table<R: Record>(&mut self) -> Result<(), StoreError> {
        let path = self.path_for(R::TABLE);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(())
    }

    fn next_id<R: Record>(&self) -> Result<RecordId, StoreError> {
        let max = self.read_all::<R>()?.iter().map(Record::id).max();
        Ok(max.map(|m| m + 1).unwrap_or(1))
    }

    fn insert<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        let table = R::TABLE;
        let line = encode_line(record)?;
        if self.read_all::<R>()?.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::DuplicateKey {
                table: table.name,
                id: record.id(),
            });
        }
        let path = self.path_for(table);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{line}")?;
        debug!(table = table.name, id = record.id(), path = %path.display(), "appended record");
        Ok(())
    }

    fn find_by_id<R: Record>(&self, id: RecordId) -> Result<R, StoreError> {
        self.read_all::<R>()?
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound {
                table: R::TABLE.name,
                id,
            })
    }

    fn find_by_partial_match<R: Record>(
        &self,
        field: &str,
        needle: &str,
        order_by: Option<&str>,
    ) -> Result<Vec<R>, StoreError> {
        let (idx, _) = R::TABLE.column(field)?;
        let mut hits: Vec<R> = self
            .read_all::<R>()?
            .into_iter()
            .filter(|r| {
                r.values()
                    .get(idx)
                    .map(|v| encode_value(v).contains(needle))
                    .unwrap_or(false)
            })
            .collect();
        sort_records(&mut hits, order_by)?;
        Ok(hits)
    }

    fn find_by_value<R: Record>(
        &self,
        field: &str,
        value: &FieldValue,
        order_by: Option<&str>,
    ) -> Result<Vec<R>, StoreError> {
        let (idx, column) = R::TABLE.column(field)?;
        let wanted = R::TABLE.check_value(column, value.clone())?;
        let mut hits: Vec<R> = self
            .read_all::<R>()?
            .into_iter()
            .filter(|r| r.values().get(idx) == Some(&wanted))
            .collect();
        sort_records(&mut hits, order_by)?;
        Ok(hits)
    }

    fn update_field<R: Record>(
        &mut self,
        id: RecordId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), StoreError> {
        let table = R::TABLE;
        let (idx, column) = table.column(field)?;
        let value = table.check_value(column, value)?;
        let mut records = self.read_all::<R>()?;
        let Some(pos) = records.iter().position(|r| r.id() == id) else {
            return Err(StoreError::NotFound {
                table: table.name,
                id,
            });
        };
        let mut values = records[pos].values();
        values[idx] = value;
        records[pos] = R::from_row(&Row::new(table, id, values))?;
        self.rewrite(&records)?;
        debug!(table = table.name, id, field, "updated field");
        Ok(())
    }

    fn delete<R: Record>(&mut self, selector: &Selector) -> Result<usize, StoreError> {
        let table = R::TABLE;
        let records = self.read_all::<R>()?;
        let before = records.len();
        let kept: Vec<R> = match selector {
            Selector::Id(id) => records.into_iter().filter(|r| r.id() != *id).collect(),
            Selector::Exact { field, value } => {
                let (idx, column) = table.column(field)?;
                let wanted = table.check_value(column, value.clone())?;
                records
                    .into_iter()
                    .filter(|r| r.values().get(idx) != Some(&wanted))
                    .collect()
            }
        };
        let removed = before - kept.len();
        if removed > 0 {
            self.rewrite(&kept)?;
        }
        debug!(table = table.name, removed, "delete");
        Ok(removed)
    }

    fn list_all<R: Record>(&self, order_by: Option<&str>) -> Result<Vec<R>, StoreError> {
        let mut rows = self.read_all::<R>()?;
        sort_records(&mut rows, order_by)?;
        Ok(rows)
    }

    fn count<R: Record>(&self) -> Result<usize, StoreError> {
        Ok(self.read_all::<R>()?.len())
    }
}

fn encode_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::Text(v) => escape_commas(v),
        FieldValue::Date(v) => v.format(DATE_FORMAT).to_string(),
        other => other.to_string(),
    }
}

fn encode_line<R: Record>(record: &R) -> Result<String, StoreError> {
    let table = R::TABLE;
    let values = table.check_values(record.values())?;
    let mut fields = vec![record.id().to_string()];
    fields.extend(values.iter().map(encode_value));
    Ok(join_fields(&fields))
}

fn decode_line<R: Record>(line: &str, lineno: usize) -> Result<R, StoreError> {
    let table = R::TABLE;
    let fields = split_line(line);
    let bad = |field: &str, reason: String| StoreError::Decode {
        table: table.name,
        field: field.to_string(),
        reason: format!("line {lineno}: {reason}"),
    };
    if fields.len() != table.columns.len() + 1 {
        return Err(bad(
            "*",
            format!(
                "expected {} fields, found {}",
                table.columns.len() + 1,
                fields.len()
            ),
        ));
    }
    let id: RecordId = fields[0]
        .parse()
        .map_err(|_| bad("id", format!("{:?} is not an id", fields[0])))?;
    let mut values = Vec::with_capacity(table.columns.len());
    for (raw, column) in fields[1..].iter().zip(table.columns.iter()) {
        let value = if raw.is_empty() && column.nullable {
            FieldValue::Null
        } else {
            match column.kind {
                ColumnKind::Text => FieldValue::Text(raw.clone()),
                ColumnKind::Integer => FieldValue::Integer(
                    raw.parse()
                        .map_err(|_| bad(column.name, format!("{raw:?} is not an integer")))?,
                ),
                ColumnKind::Decimal => FieldValue::Decimal(
                    Decimal::from_str(raw)
                        .map_err(|err| bad(column.name, format!("{raw:?}: {err}")))?,
                ),
                ColumnKind::Date => FieldValue::Date(
                    NaiveDate::parse_from_str(raw, DATE_FORMAT)
                        .map_err(|err| bad(column.name, format!("{raw:?}: {err}")))?,
                ),
            }
        };
        values.push(value);
    }
    R::from_row(&Row::new(table, id, values))
}
