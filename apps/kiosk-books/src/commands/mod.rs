pub mod delete;
pub mod new;
pub mod search;
pub mod update;

use kiosk_core::session::{Flow, Menu, Session, SessionError};
use kiosk_core::Console;
use kiosk_store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    New,
    Update,
    Delete,
    Search,
    Exit,
}

/// Main menu over one open catalogue.
pub struct Bookstore<S> {
    store: S,
}

impl<S: RecordStore> Bookstore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: RecordStore> Session for Bookstore<S> {
    type Action = Action;

    fn menu(&self) -> Menu<Action> {
        Menu::mnemonic("MENU")
            .key(&["n"], "Enter new book", Action::New)
            .key(&["u"], "Update book information", Action::Update)
            .key(&["d"], "Delete a book from the system", Action::Delete)
            .key(&["s"], "Search the system for a book", Action::Search)
            .key(&["e", "exit"], "Exit", Action::Exit)
    }

    fn prompt(&self) -> &str {
        "Menu selection: "
    }

    fn dispatch(&mut self, console: &mut dyn Console, action: Action) -> Result<Flow, SessionError> {
        tracing::debug!(?action, "bookstore action");
        match action {
            Action::New => new::run(&mut self.store, console)?,
            Action::Update => update::run(&mut self.store, console)?,
            Action::Delete => delete::run(&mut self.store, console)?,
            Action::Search => search::run(&self.store, console)?,
            Action::Exit => {
                console.rule()?;
                console.say("Goodbye!")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::book::{seed, Book};
    use kiosk_store::{RecordStore, SqliteStore};

    pub fn seeded_store() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_table::<Book>().unwrap();
        seed(&mut store).unwrap();
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Book;
    use kiosk_core::{session, ScriptedConsole};

    #[test]
    fn menu_accepts_exit_word_and_letter() {
        let shop = Bookstore::new(testing::seeded_store());
        let menu = shop.menu();
        assert_eq!(menu.parse("EXIT"), Ok(Action::Exit));
        assert_eq!(menu.parse("e"), Ok(Action::Exit));
        assert_eq!(menu.parse("U"), Ok(Action::Update));
    }

    #[test]
    fn unknown_token_then_exit() {
        let mut shop = Bookstore::new(testing::seeded_store());
        let mut console = ScriptedConsole::new(["x", "e"]);
        session::run(&mut shop, &mut console).unwrap();
        let out = console.output();
        assert!(out.contains("Input not recognised, please try again."));
        assert!(out.contains("Goodbye!"));
        assert_eq!(shop.into_store().count::<Book>().unwrap(), 5);
    }
}
