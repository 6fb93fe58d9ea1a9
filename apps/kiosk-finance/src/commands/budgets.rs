use crate::records::{Budget, EXPENSE_CATEGORIES};
use kiosk_core::session::{Menu, SessionError};
use kiosk_core::workflow::{read_id, GuardedMutation, MutationPlan, Target};
use kiosk_core::{money, Adjustment, Console, TableLayout};
use kiosk_store::{RecordId, RecordStore, StoreError};
use rust_decimal::Decimal;

pub const EXPENSE_KIND: &str = "Expense";
const NO_BUDGET: &str = "No budget set";

/// One budget row per expense category, ids 1..=16. Existing rows are
/// kept as they are.
pub fn seed<S: RecordStore>(store: &mut S) -> Result<usize, StoreError> {
    let mut added = 0;
    for (idx, category) in EXPENSE_CATEGORIES.iter().enumerate() {
        let row = Budget {
            id: idx as RecordId + 1,
            kind: EXPENSE_KIND.to_string(),
            category: category.to_string(),
            budget: None,
        };
        match store.insert(&row) {
            Ok(()) => added += 1,
            Err(err) if err.is_duplicate() => {}
            Err(err) => return Err(err),
        }
    }
    tracing::debug!(added, "budget categories seeded");
    Ok(added)
}

fn layout() -> TableLayout {
    TableLayout::new()
        .left("ID", 5)
        .left("TYPE", 10)
        .left("CATEGORY", 25)
        .right("BUDGET", 13)
}

fn budget_text(budget: Option<Decimal>) -> String {
    budget.map(money).unwrap_or_else(|| NO_BUDGET.to_string())
}

fn budget_row(b: &Budget) -> String {
    layout().row(&[
        b.id.to_string(),
        b.kind.clone(),
        b.category.clone(),
        budget_text(b.budget),
    ])
}

fn show_one(console: &mut dyn Console, b: &Budget) -> Result<(), SessionError> {
    console.rule()?;
    console.say(&layout().header())?;
    console.say(&budget_row(b))?;
    console.rule()?;
    Ok(())
}

fn budget_plan() -> MutationPlan<Budget, Decimal> {
    MutationPlan {
        target: Target::PartialMatch {
            field: "category",
            prompt: "Please enter expense category: ",
        },
        field: "budget",
        mode: Adjustment::Set,
        current: |b| b.budget,
        describe: |b| vec![layout().header(), budget_row(b)],
        question: |b| format!("Amend budget for {}? (Yes/No): ", b.category),
        amount_prompt: "Please enter the new budget value: ",
        success: |b| {
            format!(
                "Budget successfully updated! {} is now {}.",
                b.category,
                budget_text(b.budget)
            )
        },
    }
}

/// Set the budget of the first category matching the search.
pub fn set<S: RecordStore>(store: &mut S, console: &mut dyn Console) -> Result<(), SessionError> {
    console.rule()?;
    GuardedMutation::new(store, budget_plan()).run(console)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    All,
    Pick,
    Search,
    Back,
}

fn view_menu() -> Menu<View> {
    Menu::numbered("")
        .item("Show all budgets", View::All)
        .item("Pick Category from list", View::Pick)
        .item("Search for Category", View::Search)
        .item("Return to menu", View::Back)
}

pub fn view<S: RecordStore>(store: &S, console: &mut dyn Console) -> Result<(), SessionError> {
    let menu = view_menu();
    loop {
        console.rule()?;
        for line in menu.render() {
            console.say(&line)?;
        }
        let choice = console.read_line("Please select option: ")?;
        match menu.parse(&choice) {
            Ok(View::All) => show_all(store, console)?,
            Ok(View::Pick) => pick(store, console)?,
            Ok(View::Search) => search(store, console)?,
            Ok(View::Back) => return Ok(()),
            Err(err) => console.say(&err.to_string())?,
        }
    }
}

fn show_all<S: RecordStore>(store: &S, console: &mut dyn Console) -> Result<(), SessionError> {
    console.rule()?;
    console.say("CURRENT BUDGETS")?;
    console.rule()?;
    console.say(&layout().header())?;
    for b in store.list_all::<Budget>(None)? {
        console.say(&budget_row(&b))?;
    }
    Ok(())
}

fn pick<S: RecordStore>(store: &S, console: &mut dyn Console) -> Result<(), SessionError> {
    console.rule()?;
    console.say("Categories")?;
    console.rule()?;
    let list = TableLayout::new().left("ID", 5).left("CATEGORY", 25);
    console.say(&list.header())?;
    for b in store.list_all::<Budget>(None)? {
        console.say(&list.row(&[b.id.to_string(), b.category]))?;
    }
    console.rule()?;
    let Some(id) = read_id(console, "Please enter ID of category to view: ")? else {
        return Ok(());
    };
    match store.find_by_id::<Budget>(id) {
        Ok(b) => show_one(console, &b),
        Err(StoreError::NotFound { .. }) => {
            console.say("No result for given ID.")?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn search<S: RecordStore>(store: &S, console: &mut dyn Console) -> Result<(), SessionError> {
    let needle = console.read_line("Category search: ")?;
    match store.first_partial_match::<Budget>("category", needle.trim())? {
        Some(b) => show_one(console, &b),
        None => {
            console.say("No result found.")?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::store;
    use kiosk_core::ScriptedConsole;
    use std::str::FromStr;

    #[test]
    fn seeding_is_idempotent() {
        let mut store = store();
        assert_eq!(seed(&mut store).unwrap(), 0);
        assert_eq!(store.count::<Budget>().unwrap(), 16);
        let pets = store.find_by_id::<Budget>(6).unwrap();
        assert_eq!(pets.category, "Pets");
        assert_eq!(pets.budget, None);
    }

    #[test]
    fn set_budget_by_partial_category() {
        let mut store = store();
        let mut console = ScriptedConsole::new(["Util", "maybe", "Y", "120.5"]);
        set(&mut store, &mut console).unwrap();
        let utilities = store.find_by_id::<Budget>(4).unwrap();
        assert_eq!(utilities.budget, Some(Decimal::from_str("120.50").unwrap()));
        assert!(console
            .output()
            .contains("Budget successfully updated! Utilities is now 120.50."));
    }

    #[test]
    fn declined_budget_stays_unset() {
        let mut store = store();
        let mut console = ScriptedConsole::new(["Pets", "n"]);
        set(&mut store, &mut console).unwrap();
        assert_eq!(store.find_by_id::<Budget>(6).unwrap().budget, None);
    }

    #[test]
    fn zero_budget_differs_from_unset() {
        let mut store = store();
        let mut console = ScriptedConsole::new(["Debt", "yes", "0"]);
        set(&mut store, &mut console).unwrap();

        let mut console = ScriptedConsole::new(["1", "3", "Debt", "2", "13", "2", "99", "x", "4"]);
        view(&store, &mut console).unwrap();
        let out = console.output();
        assert!(out.contains("CURRENT BUDGETS"));
        assert!(out.contains("0.00"));
        assert!(out.contains(NO_BUDGET));
        assert!(out.contains("No result for given ID."));
        assert!(out.contains("Invalid entry. Choice must be a number."));
        let debt_rows = out.lines().filter(|l| l.contains("Debt") && l.contains("0.00")).count();
        assert_eq!(debt_rows, 2);
    }
}
