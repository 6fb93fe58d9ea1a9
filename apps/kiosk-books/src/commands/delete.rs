use crate::book::Book;
use kiosk_core::prompt::confirm;
use kiosk_core::session::{Menu, SessionError};
use kiosk_core::workflow::read_id;
use kiosk_core::Console;
use kiosk_store::{RecordStore, Selector, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    ById,
    ByTitle,
    Back,
}

fn lookup_menu() -> Menu<Lookup> {
    Menu::mnemonic("How would you like to select book for deletion:")
        .key(&["id"], "book ID", Lookup::ById)
        .key(&["t"], "Book title", Lookup::ByTitle)
        .key(&["exit", "e"], "return to previous menu", Lookup::Back)
}

/// Find one book by id or title, confirm, then delete exactly that row.
pub fn run<S: RecordStore>(store: &mut S, console: &mut dyn Console) -> Result<(), SessionError> {
    let menu = lookup_menu();
    loop {
        console.rule()?;
        for line in menu.render() {
            console.say(&line)?;
        }
        let choice = console.read_line("Please enter selection: ")?;
        console.rule()?;
        let found = match menu.parse(&choice) {
            Ok(Lookup::ById) => {
                let Some(id) = read_id(console, "Please enter book ID (to return to main menu type 'exit') : ")?
                else {
                    return Ok(());
                };
                match store.find_by_id::<Book>(id) {
                    Ok(book) => Some(book),
                    Err(StoreError::NotFound { .. }) => None,
                    Err(err) => return Err(err.into()),
                }
            }
            Ok(Lookup::ByTitle) => {
                let title = console.read_line("Please enter the title of the book: ")?;
                store.first_partial_match::<Book>("title", title.trim())?
            }
            Ok(Lookup::Back) => return Ok(()),
            Err(err) => {
                console.say(&err.to_string())?;
                continue;
            }
        };
        let Some(book) = found else {
            console.say("Error. Cannot find book.")?;
            continue;
        };
        console.say(&format!("You want to delete '{}'?", book.byline()))?;
        if confirm(console, "Continue? (yes/no): ")? {
            let removed = store.delete::<Book>(&Selector::Id(book.id))?;
            tracing::info!(id = book.id, removed, "book deleted");
            console.rule()?;
            console.say("Book successfully deleted!")?;
        }
        return Ok(());
    }
}
