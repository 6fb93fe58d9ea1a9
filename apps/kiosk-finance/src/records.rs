use chrono::NaiveDate;
use kiosk_store::{
    Column, ColumnKind, FieldValue, Record, RecordId, Row, StoreError, TableSpec,
};
use rust_decimal::Decimal;
use std::marker::PhantomData;

pub const EXPENSE_CATEGORIES: [&str; 16] = [
    "Housing",
    "Childcare",
    "Transportation",
    "Utilities",
    "Food & Household supplies",
    "Pets",
    "Savings & Investments",
    "Entertainment",
    "Healthcare",
    "Insurance",
    "Personal care",
    "Debt",
    "Gifts",
    "Donations",
    "Clothing",
    "Other",
];

pub const INCOME_CATEGORIES: [&str; 9] = [
    "Salary",
    "Bonus, Commission, Tips",
    "Pension",
    "Government Benefits",
    "Rental Income",
    "Investment returns",
    "Gifts",
    "Child support",
    "Other",
];

const TRANSACTION_COLUMNS: &[Column] = &[
    Column::new("name", ColumnKind::Text),
    Column::new("date", ColumnKind::Date),
    Column::new("amount", ColumnKind::Decimal),
    Column::new("category", ColumnKind::Text),
];

pub static EXPENSES: TableSpec = TableSpec {
    name: "expenses",
    columns: TRANSACTION_COLUMNS,
};

pub static INCOME: TableSpec = TableSpec {
    name: "income",
    columns: TRANSACTION_COLUMNS,
};

pub static BUDGETS: TableSpec = TableSpec {
    name: "budgets",
    columns: &[
        Column::new("kind", ColumnKind::Text),
        Column::new("category", ColumnKind::Text),
        Column::nullable("budget", ColumnKind::Decimal),
    ],
};

pub static GOALS: TableSpec = TableSpec {
    name: "goals",
    columns: &[
        Column::new("goal", ColumnKind::Text),
        Column::new("target_amount", ColumnKind::Decimal),
        Column::new("saved_amount", ColumnKind::Decimal),
        Column::new("deadline", ColumnKind::Date),
    ],
};

/// Which ledger a [`Transaction`] belongs to.
pub trait Ledger: Clone + Send + 'static {
    const TABLE: &'static TableSpec;
    const CATEGORIES: &'static [&'static str];
    /// Singular, lower case: `expense` / `income`.
    const NOUN: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expenses;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Income;

impl Ledger for Expenses {
    const TABLE: &'static TableSpec = &EXPENSES;
    const CATEGORIES: &'static [&'static str] = &EXPENSE_CATEGORIES;
    const NOUN: &'static str = "expense";
}

impl Ledger for Income {
    const TABLE: &'static TableSpec = &INCOME;
    const CATEGORIES: &'static [&'static str] = &INCOME_CATEGORIES;
    const NOUN: &'static str = "income";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction<L> {
    pub id: RecordId,
    pub name: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    ledger: PhantomData<L>,
}

impl<L: Ledger> Transaction<L> {
    pub fn new(name: impl Into<String>, date: NaiveDate, amount: Decimal, category: &str) -> Self {
        Self {
            id: 0,
            name: name.into(),
            date,
            amount,
            category: category.to_string(),
            ledger: PhantomData,
        }
    }
}

impl<L: Ledger> Record for Transaction<L> {
    const TABLE: &'static TableSpec = L::TABLE;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            self.name.as_str().into(),
            self.date.into(),
            self.amount.into(),
            self.category.as_str().into(),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.id(),
            name: row.text("name")?,
            date: row.date("date")?,
            amount: row.decimal("amount")?,
            category: row.text("category")?,
            ledger: PhantomData,
        })
    }
}

/// Spending limit for one expense category. `budget` stays `None` until
/// the user sets one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    pub id: RecordId,
    pub kind: String,
    pub category: String,
    pub budget: Option<Decimal>,
}

impl Record for Budget {
    const TABLE: &'static TableSpec = &BUDGETS;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            self.kind.as_str().into(),
            self.category.as_str().into(),
            self.budget.into(),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.id(),
            kind: row.text("kind")?,
            category: row.text("category")?,
            budget: row.opt_decimal("budget")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub id: RecordId,
    pub goal: String,
    pub target_amount: Decimal,
    pub saved_amount: Decimal,
    pub deadline: NaiveDate,
}

impl Goal {
    pub fn remaining(&self) -> Decimal {
        self.target_amount - self.saved_amount
    }

    /// Saved as a percentage of target, two places. `None` for a zero
    /// target.
    pub fn progress_percent(&self) -> Option<Decimal> {
        self.saved_amount
            .checked_div(self.target_amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|pct| pct.round_dp(2))
    }
}

impl Record for Goal {
    const TABLE: &'static TableSpec = &GOALS;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            self.goal.as_str().into(),
            self.target_amount.into(),
            self.saved_amount.into(),
            self.deadline.into(),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.id(),
            goal: row.text("goal")?,
            target_amount: row.decimal("target_amount")?,
            saved_amount: row.decimal("saved_amount")?,
            deadline: row.date("deadline")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_store::{RecordStore, SqliteStore};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn ledgers_use_separate_tables() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_table::<Transaction<Expenses>>().unwrap();
        store.ensure_table::<Transaction<Income>>().unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        store
            .insert_new(Transaction::<Expenses>::new("Rent", day, dec("950.00"), "Housing"))
            .unwrap();
        let pay = store
            .insert_new(Transaction::<Income>::new("Pay", day, dec("2100.50"), "Salary"))
            .unwrap();
        assert_eq!(pay.id, 1);
        assert_eq!(store.count::<Transaction<Expenses>>().unwrap(), 1);
        let back = store.find_by_id::<Transaction<Income>>(1).unwrap();
        assert_eq!(back, pay);
    }

    #[test]
    fn goal_progress() {
        let goal = Goal {
            id: 1,
            goal: "Holiday".into(),
            target_amount: dec("300"),
            saved_amount: dec("100"),
            deadline: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };
        assert_eq!(goal.remaining(), dec("200"));
        assert_eq!(goal.progress_percent(), Some(dec("33.33")));
        let zero = Goal {
            target_amount: Decimal::ZERO,
            ..goal
        };
        assert_eq!(zero.progress_percent(), None);
    }
}
