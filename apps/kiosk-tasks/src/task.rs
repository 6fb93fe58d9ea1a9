use chrono::NaiveDate;
use kiosk_store::{
    Column, ColumnKind, FieldValue, Record, RecordId, Row, StoreError, TableSpec,
};

pub static TASKS: TableSpec = TableSpec {
    name: "tasks",
    columns: &[
        Column::new("user", ColumnKind::Text),
        Column::new("title", ColumnKind::Text),
        Column::new("description", ColumnKind::Text),
        Column::new("assigned", ColumnKind::Date),
        Column::new("due", ColumnKind::Date),
        Column::new("completed", ColumnKind::Text),
    ],
};

pub const NOT_COMPLETED: &str = "No";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: RecordId,
    pub user: String,
    pub title: String,
    pub description: String,
    pub assigned: NaiveDate,
    pub due: NaiveDate,
    pub completed: String,
}

impl Record for Task {
    const TABLE: &'static TableSpec = &TASKS;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            self.user.as_str().into(),
            self.title.as_str().into(),
            self.description.as_str().into(),
            self.assigned.into(),
            self.due.into(),
            self.completed.as_str().into(),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.id(),
            user: row.text("user")?,
            title: row.text("title")?,
            description: row.text("description")?,
            assigned: row.date("assigned")?,
            due: row.date("due")?,
            completed: row.text("completed")?,
        })
    }
}
