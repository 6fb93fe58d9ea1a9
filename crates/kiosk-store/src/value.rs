use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Decimal,
    Text,
    Date,
}

impl ColumnKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::Date => "date",
        }
    }
}

/// A single cell value as it crosses the store boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => ColumnKind::Integer.label(),
            Self::Decimal(_) => ColumnKind::Decimal.label(),
            Self::Text(_) => ColumnKind::Text.label(),
            Self::Date(_) => ColumnKind::Date.label(),
        }
    }

    /// Whether this value may be stored in a column of `kind`.
    /// Integers are accepted by decimal columns.
    pub fn fits(&self, kind: ColumnKind, nullable: bool) -> bool {
        match (self, kind) {
            (Self::Null, _) => nullable,
            (Self::Integer(_), ColumnKind::Integer | ColumnKind::Decimal) => true,
            (Self::Decimal(_), ColumnKind::Decimal) => true,
            (Self::Text(_), ColumnKind::Text) => true,
            (Self::Date(_), ColumnKind::Date) => true,
            _ => false,
        }
    }

    /// Coerce into the canonical representation for `kind`.
    pub(crate) fn normalize(self, kind: ColumnKind) -> Self {
        match (self, kind) {
            (Self::Integer(v), ColumnKind::Decimal) => Self::Decimal(Decimal::from(v)),
            (other, _) => other,
        }
    }

    /// Total order used for `ORDER BY`-style sorting. Nulls sort first;
    /// values of different kinds fall back to their kind rank.
    pub fn order_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Decimal(a), Self::Decimal(b)) => a.cmp(b),
            (Self::Integer(a), Self::Decimal(b)) => Decimal::from(*a).cmp(b),
            (Self::Decimal(a), Self::Integer(b)) => a.cmp(&Decimal::from(*b)),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Integer(_) | Self::Decimal(_) => 1,
            Self::Date(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}
