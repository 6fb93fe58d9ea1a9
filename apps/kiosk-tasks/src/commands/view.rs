use crate::task::Task;
use kiosk_core::display::detail_line;
use kiosk_core::session::SessionError;
use kiosk_core::Console;
use kiosk_store::flatfile::DATE_FORMAT;
use kiosk_store::{FieldValue, RecordStore};

const LABEL_WIDTH: usize = 20;

fn show(console: &mut dyn Console, tasks: &[Task]) -> Result<(), SessionError> {
    if tasks.is_empty() {
        console.rule()?;
        console.say("No tasks found.")?;
    }
    for task in tasks {
        console.rule()?;
        let assigned = task.assigned.format(DATE_FORMAT).to_string();
        let due = task.due.format(DATE_FORMAT).to_string();
        for (label, value) in [
            ("Task:", task.title.as_str()),
            ("Assigned to:", task.user.as_str()),
            ("Date assigned:", assigned.as_str()),
            ("Due date:", due.as_str()),
            ("Task Complete?", task.completed.as_str()),
            ("Task description:", task.description.as_str()),
        ] {
            console.say(&detail_line(label, value, LABEL_WIDTH))?;
        }
    }
    console.rule()?;
    Ok(())
}

pub fn all<S: RecordStore>(store: &S, console: &mut dyn Console) -> Result<(), SessionError> {
    let tasks = store.list_all::<Task>(None)?;
    show(console, &tasks)
}

pub fn assigned_to<S: RecordStore>(
    store: &S,
    console: &mut dyn Console,
    user: &str,
) -> Result<(), SessionError> {
    let tasks = store.find_by_value::<Task>("user", &FieldValue::from(user), None)?;
    show(console, &tasks)
}
