use crate::task::{Task, NOT_COMPLETED};
use crate::users::UserDirectory;
use chrono::NaiveDate;
use kiosk_core::prompt::{confirm, prompt_with, prompt_without_commas};
use kiosk_core::session::SessionError;
use kiosk_core::{Console, DatePattern};
use kiosk_store::RecordStore;

/// Assign a new task to an existing user. Commas in the description are
/// stored as `|`.
pub fn run<S: RecordStore>(
    store: &mut S,
    users: &UserDirectory,
    console: &mut dyn Console,
    today: NaiveDate,
) -> Result<(), SessionError> {
    console.rule()?;
    let user = loop {
        let user = console.read_line("Please assign the task to a user: ")?;
        let user = user.trim();
        if users.contains(user) {
            break user.to_string();
        }
        console.say("User does not exist. Register user before assigning task")?;
        if confirm(console, "Revert to main menu? (Yes/No): ")? {
            return Ok(());
        }
    };
    let title = prompt_without_commas(console, "Please input title of task: ")?;
    let description = console.read_line("Please input description of task: ")?;
    let due = prompt_with(console, "Enter task due date (DD/MM/YY): ", |s| {
        DatePattern::ShortSlashed.parse(s)
    })?;
    let task = store.insert_new(Task {
        id: 0,
        user,
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        assigned: today,
        due,
        completed: NOT_COMPLETED.to_string(),
    })?;
    tracing::info!(id = task.id, user = %task.user, "task added");
    console.rule()?;
    console.say("Task successfully added!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{fixture, today};
    use kiosk_core::ScriptedConsole;
    use std::fs;

    #[test]
    fn task_line_matches_file_format() {
        let mut fx = fixture();
        let mut console = ScriptedConsole::new([
            "sam",
            "Fix, the roof",
            "Fix the roof",
            "tiles, gutters",
            "2026-11-01",
            "01/11/26",
        ]);
        run(&mut fx.store, &fx.users, &mut console, today()).unwrap();
        let text = fs::read_to_string(fx.dir.path().join("tasks.txt")).unwrap();
        assert_eq!(
            text,
            "1, sam, Fix the roof, tiles| gutters, 16 Oct 26, 01 Nov 26, No\n"
        );
        let out = console.output();
        assert!(out.contains("Commas are not allowed"));
        assert!(out.contains("Invalid date. Please enter the date as DD/MM/YY."));
    }

    #[test]
    fn unknown_assignee_can_retry_or_leave() {
        let mut fx = fixture();
        let mut console = ScriptedConsole::new(["kim", "what", "no", "kim", "yes"]);
        run(&mut fx.store, &fx.users, &mut console, today()).unwrap();
        assert_eq!(fx.store.count::<Task>().unwrap(), 0);
        assert_eq!(console.remaining_input(), 0);
        assert_eq!(
            console
                .transcript()
                .iter()
                .filter(|l| l.as_str() == "User does not exist. Register user before assigning task")
                .count(),
            2
        );
    }
}
