use kiosk_store::{
    Column, ColumnKind, FieldValue, Record, RecordId, RecordStore, Row, StoreError, TableSpec,
};

pub static BOOKS: TableSpec = TableSpec {
    name: "books",
    columns: &[
        Column::new("title", ColumnKind::Text),
        Column::new("author", ColumnKind::Text),
        Column::new("qty", ColumnKind::Integer),
    ],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub qty: i64,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>, qty: i64) -> Self {
        Self {
            id: 0,
            title: title.into(),
            author: author.into(),
            qty,
        }
    }

    /// `Title by Author`
    pub fn byline(&self) -> String {
        format!("{} by {}", self.title, self.author)
    }
}

impl Record for Book {
    const TABLE: &'static TableSpec = &BOOKS;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            self.title.as_str().into(),
            self.author.as_str().into(),
            self.qty.into(),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.id(),
            title: row.text("title")?,
            author: row.text("author")?,
            qty: row.integer("qty")?,
        })
    }
}

const STARTER_STOCK: [(RecordId, &str, &str, i64); 5] = [
    (3001, "A Tale of Two Cities", "Charles Dickens", 30),
    (3002, "Harry Potter and the Philosopher's Stone", "J.K. Rowling", 40),
    (3003, "The Lion, the Witch, and the Wardrobe", "C.S. Lewis", 25),
    (3004, "The Lord of the Rings", "J.R.R Tolkien", 40),
    (3005, "Alice in Wonderland", "Lewis Carroll", 12),
];

/// Insert the starter catalogue. Rows already present are left alone, so
/// running this on every start is harmless. Returns how many were added.
pub fn seed<S: RecordStore>(store: &mut S) -> Result<usize, StoreError> {
    let mut added = 0;
    for (id, title, author, qty) in STARTER_STOCK {
        let mut book = Book::new(title, author, qty);
        book.set_id(id);
        match store.insert(&book) {
            Ok(()) => added += 1,
            Err(err) if err.is_duplicate() => {}
            Err(err) => return Err(err),
        }
    }
    tracing::debug!(added, "starter stock seeded");
    Ok(added)
}
