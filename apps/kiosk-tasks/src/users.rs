//! The credentials file: one `username, password` pair per line.

use kiosk_store::flatfile::{join_fields, split_line};
use kiosk_store::StoreError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const TABLE: &str = "users";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("Username not found.")]
    UnknownUser,
    #[error("Password is incorrect")]
    WrongPassword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug)]
pub struct UserDirectory {
    path: PathBuf,
    users: Vec<Credentials>,
}

impl UserDirectory {
    /// Read every account. A missing file is an error; there is no way to
    /// log in without one.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path)?;
        let mut users = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_line(line);
            let [username, password] = <[String; 2]>::try_from(fields).map_err(|f| {
                StoreError::Decode {
                    table: TABLE,
                    field: format!("line {}", lineno + 1),
                    reason: format!("expected 2 fields, found {}", f.len()),
                }
            })?;
            users.push(Credentials { username, password });
        }
        tracing::debug!(path = %path.display(), count = users.len(), "users loaded");
        Ok(Self {
            path: path.to_path_buf(),
            users,
        })
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.iter().any(|u| u.username == username)
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }

    pub fn verify(&self, username: &str, password: &str) -> Result<(), LoginError> {
        let user = self
            .users
            .iter()
            .find(|u| u.username == username)
            .ok_or(LoginError::UnknownUser)?;
        if user.password == password {
            Ok(())
        } else {
            Err(LoginError::WrongPassword)
        }
    }

    /// Append an account. Callers have already rejected commas and
    /// duplicate names.
    pub fn register(&mut self, username: &str, password: &str) -> Result<(), StoreError> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}", join_fields(&[username, password]))?;
        self.users.push(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
        tracing::info!(username, "user registered");
        Ok(())
    }
}
