use crate::book::Book;
use kiosk_core::prompt::confirm;
use kiosk_core::session::SessionError;
use kiosk_core::Console;
use kiosk_store::{RecordStore, StoreError};

pub const MAX_RESULTS: usize = 10;

/// Books whose title or author contains `needle`, by id.
pub fn matching<S: RecordStore>(store: &S, needle: &str) -> Result<Vec<Book>, StoreError> {
    let mut books = store.find_by_partial_match::<Book>("title", needle, Some("id"))?;
    for book in store.find_by_partial_match::<Book>("author", needle, Some("id"))? {
        if !books.iter().any(|b| b.id == book.id) {
            books.push(book);
        }
    }
    books.sort_by_key(|b| b.id);
    Ok(books)
}

pub fn run<S: RecordStore>(store: &S, console: &mut dyn Console) -> Result<(), SessionError> {
    loop {
        let needle = console.read_line("Enter search (type exit to return): ")?;
        if needle.trim().eq_ignore_ascii_case("exit") {
            return Ok(());
        }
        let books = matching(store, needle.trim())?;
        console.rule()?;
        for book in books.iter().take(MAX_RESULTS) {
            console.say(&format!("ID: {}. {} ({})", book.id, book.byline(), book.qty))?;
        }
        match books.len() {
            0 => console.say("No results found.")?,
            n if n <= MAX_RESULTS => {
                console.rule()?;
                console.say(&format!("Displaying {n} results."))?;
            }
            _ => {
                console.rule()?;
                console.say(&format!("Displaying first {MAX_RESULTS} results only."))?;
            }
        }
        console.rule()?;
        if !confirm(console, "Would you like to search again? (yes/no): ")? {
            return Ok(());
        }
    }
}
