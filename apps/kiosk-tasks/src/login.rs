use crate::users::UserDirectory;
use kiosk_core::{Console, ConsoleError};

/// Ask for credentials until they match an account; returns the username.
pub fn login(console: &mut dyn Console, users: &UserDirectory) -> Result<String, ConsoleError> {
    loop {
        console.rule()?;
        let username = console.read_line("Please enter your username: ")?;
        let password = console.read_line("Please enter your password: ")?;
        match users.verify(username.trim(), password.trim()) {
            Ok(()) => {
                console.rule()?;
                console.say("Login successful")?;
                tracing::info!(username = username.trim(), "logged in");
                return Ok(username.trim().to_string());
            }
            Err(err) => {
                tracing::debug!(%err, "login rejected");
                console.say(&err.to_string())?;
                console.say("Login failed. Please try again")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_core::ScriptedConsole;
    use std::fs;

    #[test]
    fn retries_until_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.txt");
        fs::write(&path, "admin, adm1n\n").unwrap();
        let users = UserDirectory::load(&path).unwrap();
        let mut console =
            ScriptedConsole::new(["root", "x", "admin", "wrong", " admin ", "adm1n"]);
        assert_eq!(login(&mut console, &users).unwrap(), "admin");
        let out = console.output();
        assert!(out.contains("Username not found."));
        assert!(out.contains("Password is incorrect"));
        assert!(out.contains("Login successful"));
    }
}
