//! Task identifiers
//!
//! ID Format: `t-{7-char-hash}` (e.g., `t-9d3e5f2`)
//!
//! Hash is derived from name + creation timestamp + a mint counter, so two
//! tasks with the same name created in the same instant still differ.
//! Names are not unique; the ID is the only identity a task has.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid task ID format: expected 't-{{7-char-hash}}', got '{0}'")]
    InvalidTaskId(String),
}

/// Generates a 7-character hash from name, timestamp and counter
fn generate_hash(name: &str, timestamp: DateTime<Utc>, counter: u64) -> String {
    let input = format!(
        "{}{}{}",
        name,
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        counter
    );
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Task ID in the format `t-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId {
    hash: String,
}

impl TaskId {
    /// Creates a task ID from name, timestamp and a disambiguating counter
    pub fn new(name: &str, timestamp: DateTime<Utc>, counter: u64) -> Self {
        Self {
            hash: generate_hash(name, timestamp, counter),
        }
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t-{}", self.hash)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("t-")
            .ok_or_else(|| IdError::InvalidTaskId(s.to_string()))?;

        if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdError::InvalidTaskId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_ascii_lowercase(),
        })
    }
}

impl TryFrom<String> for TaskId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse() {
        let id = TaskId::new("Groceries", Utc::now(), 0);
        let s = id.to_string();

        assert!(s.starts_with("t-"));
        assert_eq!(s.len(), 9);

        let parsed: TaskId = s.parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn same_name_different_counter() {
        let now = Utc::now();
        let a = TaskId::new("Work", now, 0);
        let b = TaskId::new("Work", now, 1);

        assert_ne!(a, b);
    }

    #[test]
    fn rejects_bad_ids() {
        assert!("a-1234567".parse::<TaskId>().is_err());
        assert!("t-123".parse::<TaskId>().is_err());
        assert!("t-xyzxyzx".parse::<TaskId>().is_err());
        assert!("".parse::<TaskId>().is_err());
    }

    #[test]
    fn parse_trims_and_lowercases() {
        let id: TaskId = "  t-ABCDEF1 ".parse().unwrap();
        assert_eq!(id.to_string(), "t-abcdef1");
    }

    #[test]
    fn serde_as_string() {
        let id: TaskId = "t-0a1b2c3".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"t-0a1b2c3\"");

        let back: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<TaskId>("\"nope\"").is_err());
    }
}
