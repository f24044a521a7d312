//! Single shared credential gate.
//!
//! There is one username/password pair for the whole store; it gates every
//! operation uniformly. The credentials file holds the username on its first
//! line and the password on its second, trailing whitespace ignored.

use crate::error::{HeirloomError, Result};
use std::fs;
use std::path::Path;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        if username.is_empty() {
            return Err(HeirloomError::Config("username cannot be empty".into()));
        }
        Ok(Self {
            username,
            password: password.into(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HeirloomError::Config(format!(
                "cannot read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines();
        let username = lines.next().unwrap_or("").trim_end();
        let password = lines.next().unwrap_or("").trim_end();
        Self::new(username, password)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn verify(&self, username: &str, password: &str) -> Result<()> {
        // Compare both fields without short-circuiting on the first mismatch.
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        if user_ok & pass_ok {
            Ok(())
        } else {
            Err(HeirloomError::Unauthorized)
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
