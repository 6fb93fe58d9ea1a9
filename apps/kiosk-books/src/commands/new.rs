use crate::book::Book;
use kiosk_core::prompt::prompt_amount;
use kiosk_core::session::SessionError;
use kiosk_core::Console;
use kiosk_store::RecordStore;

/// Add books until a blank title is entered.
pub fn run<S: RecordStore>(store: &mut S, console: &mut dyn Console) -> Result<(), SessionError> {
    console.rule()?;
    loop {
        let title =
            console.read_line("Please enter title of the book (or leave blank to return to menu): ")?;
        if title.trim().is_empty() {
            return Ok(());
        }
        let author = console.read_line("Please enter author of book: ")?;
        let qty: i64 = prompt_amount(console, "Please enter stock quantity: ")?;
        let book = store.insert_new(Book::new(title, author, qty))?;
        tracing::info!(id = book.id, "book added");
        console.rule()?;
        console.say(&format!(
            "New book id {}: {} ({}) Successfully added!",
            book.id,
            book.byline(),
            book.qty
        ))?;
        console.rule()?;
    }
}
