use crate::users::UserDirectory;
use kiosk_core::input::{no_commas, InvalidInput};
use kiosk_core::prompt::{prompt_with, prompt_without_commas};
use kiosk_core::session::SessionError;
use kiosk_core::Console;

pub fn run(users: &mut UserDirectory, console: &mut dyn Console) -> Result<(), SessionError> {
    let username = loop {
        let name = prompt_with(console, "Please enter new username: ", |s| {
            let name = no_commas(s.trim())?;
            if name.is_empty() {
                return Err(InvalidInput::Rule("Username cannot be blank.".into()));
            }
            Ok(name)
        })?;
        if users.contains(&name) {
            console.say("Username already registered.")?;
        } else {
            break name;
        }
    };
    let password = loop {
        console.rule()?;
        let password = prompt_without_commas(console, "Please enter new password: ")?;
        let again = console.read_line("Please reenter password: ")?;
        // Stored trimmed, so compare trimmed.
        if password.trim() == again.trim() {
            break password.trim().to_string();
        }
        console.say("Passwords do not match. Please try again")?;
    };
    users.register(&username, &password)?;
    console.rule()?;
    console.say(&format!("User '{username}' registered."))?;
    Ok(())
}
