pub mod budgets;
pub mod goals;
pub mod transactions;

use crate::records::{Budget, Expenses, Goal, Income, Transaction};
use kiosk_core::session::{Flow, Menu, Session, SessionError};
use kiosk_core::Console;
use kiosk_store::{RecordStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddExpense,
    ViewExpenses,
    ExpensesByCategory,
    AddIncome,
    ViewIncome,
    IncomeByCategory,
    SetBudget,
    ViewBudget,
    SetGoal,
    GoalProgress,
    AddToGoal,
    Quit,
}

/// Create every finance table and seed the budget categories.
pub fn prepare<S: RecordStore>(store: &mut S) -> Result<(), StoreError> {
    store.ensure_table::<Transaction<Expenses>>()?;
    store.ensure_table::<Transaction<Income>>()?;
    store.ensure_table::<Budget>()?;
    store.ensure_table::<Goal>()?;
    budgets::seed(store)?;
    Ok(())
}

pub struct Tracker<S> {
    store: S,
}

impl<S: RecordStore> Tracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: RecordStore> Session for Tracker<S> {
    type Action = Action;

    fn menu(&self) -> Menu<Action> {
        Menu::numbered("")
            .item("Add expense", Action::AddExpense)
            .item("View expenses", Action::ViewExpenses)
            .item("View expenses by category", Action::ExpensesByCategory)
            .item("Add income", Action::AddIncome)
            .item("View income", Action::ViewIncome)
            .item("View income by category", Action::IncomeByCategory)
            .item("Set budget for a category", Action::SetBudget)
            .item("View budget for a category", Action::ViewBudget)
            .item("Set financial goals", Action::SetGoal)
            .item("View progress towards financial goals", Action::GoalProgress)
            .item("Add funds to a financial goal", Action::AddToGoal)
            .item("Quit", Action::Quit)
    }

    fn prompt(&self) -> &str {
        "Please input the number of the option you wish to use: "
    }

    fn dispatch(&mut self, console: &mut dyn Console, action: Action) -> Result<Flow, SessionError> {
        tracing::debug!(?action, "finance action");
        let store = &mut self.store;
        match action {
            Action::AddExpense => transactions::add::<Expenses, _>(store, console)?,
            Action::ViewExpenses => transactions::view_all::<Expenses, _>(store, console)?,
            Action::ExpensesByCategory => {
                transactions::view_by_category::<Expenses, _>(store, console)?
            }
            Action::AddIncome => transactions::add::<Income, _>(store, console)?,
            Action::ViewIncome => transactions::view_all::<Income, _>(store, console)?,
            Action::IncomeByCategory => transactions::view_by_category::<Income, _>(store, console)?,
            Action::SetBudget => budgets::set(store, console)?,
            Action::ViewBudget => budgets::view(store, console)?,
            Action::SetGoal => goals::set(store, console)?,
            Action::GoalProgress => goals::progress(store, console)?,
            Action::AddToGoal => goals::add_funds(store, console)?,
            Action::Quit => {
                console.say("Goodbye!")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }
}
