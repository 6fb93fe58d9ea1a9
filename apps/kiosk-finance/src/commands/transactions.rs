use crate::records::{Ledger, Transaction};
use kiosk_core::prompt::{prompt_amount, prompt_choice, prompt_with};
use kiosk_core::session::SessionError;
use kiosk_core::{money, Console, DatePattern, TableLayout};
use kiosk_store::{FieldValue, RecordStore};
use rust_decimal::Decimal;

fn layout() -> TableLayout {
    TableLayout::new()
        .left("ID", 5)
        .left("Name", 20)
        .left("Date", 10)
        .right("GBP", 10)
        .left("Category", 15)
}

fn show<L: Ledger>(console: &mut dyn Console, rows: &[Transaction<L>]) -> Result<(), SessionError> {
    if rows.is_empty() {
        console.say(&format!("No {} transactions recorded.", L::NOUN))?;
        return Ok(());
    }
    let layout = layout();
    console.say(&layout.header())?;
    for t in rows {
        console.say(&layout.row(&[
            t.id.to_string(),
            t.name.clone(),
            DatePattern::DayMonthYear.format(t.date),
            money(t.amount),
            t.category.clone(),
        ]))?;
    }
    Ok(())
}

pub fn add<L: Ledger, S: RecordStore>(
    store: &mut S,
    console: &mut dyn Console,
) -> Result<(), SessionError> {
    console.rule()?;
    let name = console.read_line("Please enter name of transaction: ")?;
    let date = prompt_with(console, "Enter transaction date (DD-MM-YYYY): ", |s| {
        DatePattern::DayMonthYear.parse(s)
    })?;
    let amount: Decimal = prompt_amount(console, "Please enter amount in GBP: ")?;
    console.rule()?;
    let idx = prompt_choice(
        console,
        &format!("Please select an {} category: ", L::NOUN),
        L::CATEGORIES,
    )?;
    let record = store.insert_new(Transaction::<L>::new(name.trim(), date, amount, L::CATEGORIES[idx]))?;
    tracing::info!(table = L::TABLE.name, id = record.id, "transaction added");
    console.rule()?;
    console.say("Transaction successfully added!")?;
    Ok(())
}

/// Every transaction, oldest first.
pub fn view_all<L: Ledger, S: RecordStore>(
    store: &S,
    console: &mut dyn Console,
) -> Result<(), SessionError> {
    console.rule()?;
    let rows = store.list_all::<Transaction<L>>(Some("date"))?;
    show(console, &rows)
}

pub fn view_by_category<L: Ledger, S: RecordStore>(
    store: &S,
    console: &mut dyn Console,
) -> Result<(), SessionError> {
    console.rule()?;
    console.say(&format!("VIEW {} BY CATEGORY", L::NOUN.to_uppercase()))?;
    let idx = prompt_choice(console, "Please select a category to view: ", L::CATEGORIES)?;
    let category = FieldValue::from(L::CATEGORIES[idx]);
    let rows = store.find_by_value::<Transaction<L>>("category", &category, Some("date"))?;
    console.rule()?;
    show(console, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::store;
    use crate::records::{Expenses, Income};
    use kiosk_core::ScriptedConsole;

    #[test]
    fn add_validates_each_field() {
        let mut store = store();
        let mut console = ScriptedConsole::new([
            "Groceries",
            "2024-03-01",
            "31-02-2024",
            "01-03-2024",
            "abc",
            "45.678",
            "16",
            "4",
        ]);
        add::<Expenses, _>(&mut store, &mut console).unwrap();
        let saved = store.find_by_id::<Transaction<Expenses>>(1).unwrap();
        assert_eq!(saved.amount.to_string(), "45.68");
        assert_eq!(saved.category, "Food & Household supplies");
        let out = console.output();
        assert_eq!(out.matches("Invalid date. Please enter the date as DD-MM-YYYY.").count(), 2);
        assert!(out.contains("Error. Invalid selection."));
    }

    #[test]
    fn listings_are_ordered_by_date() {
        let mut store = store();
        let mut console = ScriptedConsole::new([
            "March pay", "28-03-2024", "2000", "0",
            "Jan pay", "26-01-2024", "1900", "0",
            "Tips", "14-02-2024", "35.5", "1",
        ]);
        for _ in 0..3 {
            add::<Income, _>(&mut store, &mut console).unwrap();
        }

        let mut console = ScriptedConsole::new(Vec::<String>::new());
        view_all::<Income, _>(&store, &mut console).unwrap();
        let out = console.output();
        let jan = out.find("Jan pay").unwrap();
        let tips = out.find("Tips").unwrap();
        let march = out.find("March pay").unwrap();
        assert!(jan < tips && tips < march);
        assert!(out.contains("35.50"));

        let mut console = ScriptedConsole::new(["0"]);
        view_by_category::<Income, _>(&store, &mut console).unwrap();
        let out = console.output();
        assert!(out.contains("Jan pay") && out.contains("March pay"));
        assert!(!out.contains("14-02-2024"));
    }

    #[test]
    fn empty_category_says_so() {
        let store = store();
        let mut console = ScriptedConsole::new(["5"]);
        view_by_category::<Expenses, _>(&store, &mut console).unwrap();
        assert!(console.output().contains("No expense transactions recorded."));
    }
}
