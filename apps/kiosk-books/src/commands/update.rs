use crate::book::Book;
use kiosk_core::prompt::confirm_value;
use kiosk_core::session::{Menu, SessionError};
use kiosk_core::workflow::{GuardedMutation, MutationPlan, Target};
use kiosk_core::{Adjustment, Console};
use kiosk_store::RecordStore;

const ID_PROMPT: &str = "Please enter book ID (to return to main menu type 'exit') : ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Title,
    Author,
    Quantity,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StockChange {
    Mode(Adjustment),
    Back,
}

fn edit_menu() -> Menu<Edit> {
    Menu::mnemonic("What would you like to edit?")
        .key(&["t"], "Edit title", Edit::Title)
        .key(&["a"], "Edit author", Edit::Author)
        .key(&["q"], "Edit stock quantity", Edit::Quantity)
        .key(&["e", "exit"], "Exit", Edit::Done)
}

fn stock_menu() -> Menu<StockChange> {
    Menu::mnemonic("What would you like to do?")
        .key(&["a"], "Add stock", StockChange::Mode(Adjustment::Add))
        .key(&["r"], "Remove stock", StockChange::Mode(Adjustment::Subtract))
        .key(&["s"], "Set stock level", StockChange::Mode(Adjustment::Set))
        .key(&["exit"], "return to main menu", StockChange::Back)
}

fn quantity_plan(amount_prompt: &'static str) -> MutationPlan<Book, i64> {
    MutationPlan {
        target: Target::Id { prompt: ID_PROMPT },
        field: "qty",
        mode: Adjustment::Set,
        current: |b| Some(b.qty),
        describe: |b| vec![format!("You want to edit '{}'?", b.byline())],
        question: |_| "Continue? (yes/no): ".into(),
        amount_prompt,
        success: |b| format!("Quantity successfully updated. New stock level: {}", b.qty),
    }
}

fn amount_prompt(mode: Adjustment) -> &'static str {
    match mode {
        Adjustment::Add => "What quantity would you like to add? : ",
        Adjustment::Subtract => "What quantity would you like to remove? : ",
        Adjustment::Set => "Please set new stock quantity : ",
    }
}

/// Pick a book by id, confirm it, then edit it until the user leaves the
/// edit menu.
pub fn run<S: RecordStore>(store: &mut S, console: &mut dyn Console) -> Result<(), SessionError> {
    console.rule()?;
    let Some(book) = GuardedMutation::new(&mut *store, quantity_plan("")).resolve(console)? else {
        return Ok(());
    };
    let menu = edit_menu();
    loop {
        console.rule()?;
        for line in menu.render() {
            console.say(&line)?;
        }
        let choice = console.read_line("Please enter selection: ")?;
        match menu.parse(&choice) {
            Ok(Edit::Title) => edit_text(store, console, book.id, "title")?,
            Ok(Edit::Author) => edit_text(store, console, book.id, "author")?,
            Ok(Edit::Quantity) => edit_quantity(store, console, book.id)?,
            Ok(Edit::Done) => return Ok(()),
            Err(err) => console.say(&err.to_string())?,
        }
    }
}

fn edit_text<S: RecordStore>(
    store: &mut S,
    console: &mut dyn Console,
    id: i64,
    column: &'static str,
) -> Result<(), SessionError> {
    let value = confirm_value(console, &format!("Please enter new {column}: "))?;
    match store.update_field::<Book>(id, column, value.into()) {
        Ok(()) => {
            tracing::info!(id, column, "book edited");
            console.say(&format!("{column} successfully changed!"))?;
        }
        Err(err) => {
            console.rule()?;
            console.say(&format!("An error occurred: {err}"))?;
        }
    }
    Ok(())
}

fn edit_quantity<S: RecordStore>(
    store: &mut S,
    console: &mut dyn Console,
    id: i64,
) -> Result<(), SessionError> {
    let book = store.find_by_id::<Book>(id)?;
    console.say(&format!("Current stock level: {}", book.qty))?;
    let menu = stock_menu();
    loop {
        for line in menu.render() {
            console.say(&line)?;
        }
        let choice = console.read_line("Please enter selection: ")?;
        let mode = match menu.parse(&choice) {
            Ok(StockChange::Mode(mode)) => mode,
            Ok(StockChange::Back) => return Ok(()),
            Err(err) => {
                console.say(&err.to_string())?;
                continue;
            }
        };
        let mut mutation = GuardedMutation::new(&mut *store, quantity_plan(amount_prompt(mode)));
        console.rule()?;
        mutation.apply_with(console, book, mode)?;
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::seeded_store;
    use kiosk_core::ScriptedConsole;

    #[test]
    fn remove_more_than_stocked_goes_negative() {
        let mut store = seeded_store();
        // 3005 holds 12
        let mut console = ScriptedConsole::new(["3005", "yes", "q", "r", "20", "e"]);
        run(&mut store, &mut console).unwrap();
        assert_eq!(store.find_by_id::<Book>(3005).unwrap().qty, -8);
        let out = console.output();
        assert!(out.contains("You want to edit 'Alice in Wonderland by Lewis Carroll'?"));
        assert!(out.contains("Current stock level: 12"));
    }

    #[test]
    fn stock_overflow_is_refused_without_crashing() {
        let mut store = seeded_store();
        let mut console = ScriptedConsole::new([
            "3005",
            "yes",
            "q",
            "a",
            "9223372036854775807",
            "5",
            "e",
        ]);
        run(&mut store, &mut console).unwrap();
        assert_eq!(store.find_by_id::<Book>(3005).unwrap().qty, 17);
        assert!(console.output().contains("out of range"));
    }

    #[test]
    fn title_edit_uses_confirmation_loop() {
        let mut store = seeded_store();
        let mut console = ScriptedConsole::new([
            "3004",
            "y",
            "t",
            "The Hobbit",
            "no",
            "The Fellowship of the Ring",
            "yes",
            "a",
            "J.R.R. Tolkien",
            "YES",
            "exit",
        ]);
        run(&mut store, &mut console).unwrap();
        let book = store.find_by_id::<Book>(3004).unwrap();
        assert_eq!(book.title, "The Fellowship of the Ring");
        assert_eq!(book.author, "J.R.R. Tolkien");
        assert_eq!(book.qty, 40);
    }

    #[test]
    fn declining_makes_no_change() {
        let mut store = seeded_store();
        let mut console = ScriptedConsole::new(["3001", "no"]);
        run(&mut store, &mut console).unwrap();
        assert_eq!(console.remaining_input(), 0);
        assert_eq!(store.find_by_id::<Book>(3001).unwrap().qty, 30);
    }

    #[test]
    fn unknown_id_and_exit() {
        let mut store = seeded_store();
        let mut console = ScriptedConsole::new(["9999"]);
        run(&mut store, &mut console).unwrap();
        assert!(console.output().contains("No result found."));

        let mut console = ScriptedConsole::new(["exit"]);
        run(&mut store, &mut console).unwrap();
        assert_eq!(console.remaining_input(), 0);
    }

    #[test]
    fn set_and_add_stock() {
        let mut store = seeded_store();
        let mut console = ScriptedConsole::new([
            "3002", "yes", "q", "bogus", "s", "3", "q", "a", "4", "e",
        ]);
        run(&mut store, &mut console).unwrap();
        assert_eq!(store.find_by_id::<Book>(3002).unwrap().qty, 7);
        assert!(console
            .output()
            .contains("Quantity successfully updated. New stock level: 7"));
    }
}
