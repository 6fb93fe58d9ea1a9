pub mod add;
pub mod register;
pub mod stats;
pub mod view;

use crate::users::UserDirectory;
use chrono::NaiveDate;
use kiosk_core::session::{Flow, Menu, Session, SessionError};
use kiosk_core::Console;
use kiosk_store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    AddTask,
    ViewAll,
    ViewMine,
    Statistics,
    Exit,
}

/// Menu for one logged-in user.
pub struct TaskManager<S> {
    store: S,
    users: UserDirectory,
    current: String,
    admin: String,
    today: NaiveDate,
}

impl<S: RecordStore> TaskManager<S> {
    pub fn new(store: S, users: UserDirectory, current: String, admin: String, today: NaiveDate) -> Self {
        Self {
            store,
            users,
            current,
            admin,
            today,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.current == self.admin
    }
}

impl<S: RecordStore> Session for TaskManager<S> {
    type Action = Action;

    fn menu(&self) -> Menu<Action> {
        let admin = self.is_admin();
        Menu::mnemonic("Select one of the following options:")
            .key(&["r"], "register a user", Action::Register)
            .key(&["a"], "add task", Action::AddTask)
            .key(&["va"], "view all tasks", Action::ViewAll)
            .key(&["vm"], "view my tasks", Action::ViewMine)
            .key(&["s"], "view statistics", Action::Statistics)
            .key(&["e"], "exit", Action::Exit)
            .conceal(|a| !admin && *a == Action::Statistics)
    }

    fn prompt(&self) -> &str {
        ": "
    }

    fn dispatch(&mut self, console: &mut dyn Console, action: Action) -> Result<Flow, SessionError> {
        tracing::debug!(?action, user = %self.current, "task action");
        match action {
            Action::Register => {
                if self.is_admin() {
                    register::run(&mut self.users, console)?;
                } else {
                    console.rule()?;
                    console.say("Only admin is allowed to register new users.")?;
                }
            }
            Action::AddTask => add::run(&mut self.store, &self.users, console, self.today)?,
            Action::ViewAll => view::all(&self.store, console)?,
            Action::ViewMine => view::assigned_to(&self.store, console, &self.current)?,
            Action::Statistics => {
                if self.is_admin() {
                    stats::run(&self.store, &self.users, console)?;
                } else {
                    console.rule()?;
                    console.say("You must be logged in as admin to access this section")?;
                }
            }
            Action::Exit => {
                console.rule()?;
                console.say("Successfully logged out")?;
                console.say("Goodbye!!!")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }
}
