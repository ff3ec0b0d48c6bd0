//! Environment variable assignments forwarded into each function container.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single `KEY=VALUE` assignment.
///
/// Serialised as its `KEY=VALUE` text, so files and environment variables
/// list assignments as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct EnvAssignment {
    key: String,
    value: String,
}

impl EnvAssignment {
    /// Builds an assignment from its parts.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Variable name.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Variable value; may be empty.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

impl fmt::Display for EnvAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Rejected `KEY=VALUE` text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid environment assignment '{input}': {reason}")]
pub struct EnvAssignmentParseError {
    input: String,
    reason: &'static str,
}

impl FromStr for EnvAssignment {
    type Err = EnvAssignmentParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let Some((key, value)) = input.split_once('=') else {
            return Err(EnvAssignmentParseError {
                input: input.to_owned(),
                reason: "expected KEY=VALUE",
            });
        };
        if key.trim().is_empty() {
            return Err(EnvAssignmentParseError {
                input: input.to_owned(),
                reason: "variable name must not be empty",
            });
        }
        Ok(Self::new(key.trim(), value))
    }
}

impl TryFrom<String> for EnvAssignment {
    type Error = EnvAssignmentParseError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        input.parse()
    }
}

impl From<EnvAssignment> for String {
    fn from(assignment: EnvAssignment) -> Self {
        assignment.to_string()
    }
}

/// Collapses repeated keys, keeping the position of the first occurrence and
/// the value of the last.
///
/// Lower layers contribute their assignments first, so a flag overrides an
/// environment variable which overrides the file.
pub(crate) fn dedupe(assignments: Vec<EnvAssignment>) -> Vec<EnvAssignment> {
    let mut merged: Vec<EnvAssignment> = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        match merged.iter_mut().find(|existing| existing.key == assignment.key) {
            Some(existing) => existing.value = assignment.value,
            None => merged.push(assignment),
        }
    }
    merged
}
