use crate::{
    sort_records, ColumnKind, FieldValue, Record, RecordId, RecordStore, Row, Selector,
    StoreError, TableSpec, ID_COLUMN,
};
use chrono::NaiveDate;
use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed [`RecordStore`]. One connection, opened for the lifetime
/// of the session.
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        debug!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Release the connection, surfacing any error the driver reports on close.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, err)| StoreError::Sqlite(err))
    }

    fn select_rows<R: Record>(
        &self,
        filter: Option<(&str, &str)>,
        bind: &[&dyn ToSql],
    ) -> Result<Vec<R>, StoreError> {
        let table = R::TABLE;
        let sql = match filter {
            Some((column, op)) => format!(
                "SELECT {cols} FROM {t} WHERE {op_sql} ORDER BY rowid",
                cols = select_columns(table),
                t = quote(table.name),
                op_sql = op.replace("{col}", &quote(column)),
            ),
            None => format!(
                "SELECT {cols} FROM {t} ORDER BY rowid",
                cols = select_columns(table),
                t = quote(table.name),
            ),
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(bind)?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(decode_row::<R>(r)?);
        }
        Ok(out)
    }
}

impl RecordStore for SqliteStore {
    fn ensure_table<R: Record>(&mut self) -> Result<(), StoreError> {
        let table = R::TABLE;
        let mut defs = vec![format!("{} INTEGER NOT NULL UNIQUE", quote(ID_COLUMN))];
        for column in table.columns {
            let sql_type = match column.kind {
                ColumnKind::Integer => "INTEGER",
                ColumnKind::Decimal | ColumnKind::Text | ColumnKind::Date => "TEXT",
            };
            let null = if column.nullable { "" } else { " NOT NULL" };
            defs.push(format!("{} {sql_type}{null}", quote(column.name)));
        }
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            quote(table.name),
            defs.join(", ")
        ))?;
        Ok(())
    }

    fn next_id<R: Record>(&self) -> Result<RecordId, StoreError> {
        let max: Option<i64> = self.conn.query_row(
            &format!(
                "SELECT MAX({}) FROM {}",
                quote(ID_COLUMN),
                quote(R::TABLE.name)
            ),
            [],
            |row| row.get(0),
        )?;
        Ok(max.map(|m| m + 1).unwrap_or(1))
    }

    fn insert<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        let table = R::TABLE;
        let values = table.check_values(record.values())?;
        let columns: Vec<String> = std::iter::once(ID_COLUMN)
            .chain(table.columns.iter().map(|c| c.name))
            .map(quote)
            .collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote(table.name),
            columns.join(","),
            placeholders.join(",")
        );
        let id = FieldValue::Integer(record.id());
        let bound = std::iter::once(&id).chain(values.iter());
        match self.conn.execute(&sql, params_from_iter(bound)) {
            Ok(_) => {
                debug!(table = table.name, id = record.id(), "inserted record");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateKey {
                    table: table.name,
                    id: record.id(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_id<R: Record>(&self, id: RecordId) -> Result<R, StoreError> {
        let table = R::TABLE;
        let sql = format!(
            "SELECT {cols} FROM {t} WHERE {key} = ?1 LIMIT 1",
            cols = select_columns(table),
            t = quote(table.name),
            key = quote(ID_COLUMN),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let found = stmt
            .query_row(params![id], |r| Ok(raw_row(r, table)))
            .optional()?;
        match found {
            Some(raw) => decode_raw::<R>(raw?),
            None => Err(StoreError::NotFound {
                table: table.name,
                id,
            }),
        }
    }

    fn find_by_partial_match<R: Record>(
        &self,
        field: &str,
        needle: &str,
        order_by: Option<&str>,
    ) -> Result<Vec<R>, StoreError> {
        let (_, column) = R::TABLE.column(field)?;
        // instr() is case-sensitive, unlike LIKE.
        let mut rows = self.select_rows::<R>(
            Some((column.name, "instr(CAST({col} AS TEXT), ?1) > 0")),
            &[&needle],
        )?;
        sort_records(&mut rows, order_by)?;
        debug!(table = R::TABLE.name, field, hits = rows.len(), "partial match");
        Ok(rows)
    }

    fn find_by_value<R: Record>(
        &self,
        field: &str,
        value: &FieldValue,
        order_by: Option<&str>,
    ) -> Result<Vec<R>, StoreError> {
        let (_, column) = R::TABLE.column(field)?;
        let value = R::TABLE.check_value(column, value.clone())?;
        let mut rows = if value.is_null() {
            self.select_rows::<R>(Some((column.name, "{col} IS NULL")), &[])?
        } else {
            self.select_rows::<R>(Some((column.name, "{col} = ?1")), &[&value])?
        };
        sort_records(&mut rows, order_by)?;
        Ok(rows)
    }

    fn update_field<R: Record>(
        &mut self,
        id: RecordId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), StoreError> {
        let table = R::TABLE;
        let (_, column) = table.column(field)?;
        let value = table.check_value(column, value)?;
        let changed = self.conn.execute(
            &format!(
                "UPDATE {} SET {} = ?1 WHERE {} = ?2",
                quote(table.name),
                quote(column.name),
                quote(ID_COLUMN)
            ),
            params![value, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                table: table.name,
                id,
            });
        }
        debug!(table = table.name, id, field, "updated field");
        Ok(())
    }

    fn delete<R: Record>(&mut self, selector: &Selector) -> Result<usize, StoreError> {
        let table = R::TABLE;
        let removed = match selector {
            Selector::Id(id) => self.conn.execute(
                &format!(
                    "DELETE FROM {} WHERE {} = ?1",
                    quote(table.name),
                    quote(ID_COLUMN)
                ),
                params![id],
            )?,
            Selector::Exact { field, value } => {
                let (_, column) = table.column(field)?;
                let value = table.check_value(column, value.clone())?;
                self.conn.execute(
                    &format!(
                        "DELETE FROM {} WHERE {} = ?1",
                        quote(table.name),
                        quote(column.name)
                    ),
                    params![value],
                )?
            }
        };
        debug!(table = table.name, removed, "delete");
        Ok(removed)
    }

    fn list_all<R: Record>(&self, order_by: Option<&str>) -> Result<Vec<R>, StoreError> {
        let mut rows = self.select_rows::<R>(None, &[])?;
        sort_records(&mut rows, order_by)?;
        Ok(rows)
    }

    fn count<R: Record>(&self) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote(R::TABLE.name)),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Null => ToSqlOutput::Owned(Value::Null),
            FieldValue::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            // Trailing zeros stripped so `5.00` and `5` are stored and bound alike.
            FieldValue::Decimal(v) => ToSqlOutput::Owned(Value::Text(v.normalize().to_string())),
            FieldValue::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            FieldValue::Date(v) => {
                ToSqlOutput::Owned(Value::Text(v.format(DATE_FORMAT).to_string()))
            }
        })
    }
}

/// Identifiers only ever come from static [`TableSpec`]s.
fn quote(ident: &str) -> String {
    format!("\"{ident}\"")
}

fn select_columns(table: &TableSpec) -> String {
    std::iter::once(ID_COLUMN)
        .chain(table.columns.iter().map(|c| c.name))
        .map(quote)
        .collect::<Vec<_>>()
        .join(",")
}

type RawRow = (RecordId, Vec<Value>);

fn raw_row(r: &rusqlite::Row<'_>, table: &TableSpec) -> Result<RawRow, StoreError> {
    let id: i64 = r.get(0)?;
    let mut values = Vec::with_capacity(table.columns.len());
    for idx in 0..table.columns.len() {
        values.push(r.get::<_, Value>(idx + 1)?);
    }
    Ok((id, values))
}

fn decode_row<R: Record>(r: &rusqlite::Row<'_>) -> Result<R, StoreError> {
    decode_raw::<R>(raw_row(r, R::TABLE)?)
}

fn decode_raw<R: Record>((id, raw): RawRow) -> Result<R, StoreError> {
    let table = R::TABLE;
    let mut values = Vec::with_capacity(raw.len());
    for (value, column) in raw.into_iter().zip(table.columns.iter()) {
        values.push(decode_value(table, column.name, column.kind, value)?);
    }
    R::from_row(&Row::new(table, id, values))
}

fn decode_value(
    table: &'static TableSpec,
    field: &str,
    kind: ColumnKind,
    value: Value,
) -> Result<FieldValue, StoreError> {
    let bad = |reason: String| StoreError::Decode {
        table: table.name,
        field: field.to_string(),
        reason,
    };
    Ok(match (kind, value) {
        (_, Value::Null) => FieldValue::Null,
        (ColumnKind::Integer, Value::Integer(v)) => FieldValue::Integer(v),
        (ColumnKind::Decimal, Value::Integer(v)) => FieldValue::Decimal(Decimal::from(v)),
        (ColumnKind::Decimal, Value::Real(v)) => FieldValue::Decimal(
            Decimal::try_from(v).map_err(|err| bad(format!("{v}: {err}")))?,
        ),
        (ColumnKind::Decimal, Value::Text(v)) => FieldValue::Decimal(
            Decimal::from_str(&v).map_err(|err| bad(format!("{v:?}: {err}")))?,
        ),
        (ColumnKind::Text, Value::Text(v)) => FieldValue::Text(v),
        (ColumnKind::Date, Value::Text(v)) => FieldValue::Date(
            NaiveDate::parse_from_str(&v, DATE_FORMAT)
                .map_err(|err| bad(format!("{v:?}: {err}")))?,
        ),
        (kind, other) => {
            return Err(bad(format!(
                "expected {}, found {:?}",
                kind.label(),
                other.data_type()
            )))
        }
    })
}
