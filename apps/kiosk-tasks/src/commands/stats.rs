use crate::task::{Task, NOT_COMPLETED};
use crate::users::UserDirectory;
use kiosk_core::display::detail_line;
use kiosk_core::session::SessionError;
use kiosk_core::Console;
use kiosk_store::{FieldValue, RecordStore};

pub fn run<S: RecordStore>(
    store: &S,
    users: &UserDirectory,
    console: &mut dyn Console,
) -> Result<(), SessionError> {
    let tasks = store.count::<Task>()?;
    let open = store
        .find_by_value::<Task>("completed", &FieldValue::from(NOT_COMPLETED), None)?
        .len();
    console.rule()?;
    console.say(&detail_line("Number of users:", &users.count().to_string(), 20))?;
    console.say(&detail_line("Number of tasks:", &tasks.to_string(), 20))?;
    console.say(&detail_line("Incomplete tasks:", &open.to_string(), 20))?;
    console.rule()?;
    Ok(())
}
