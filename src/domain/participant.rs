//! Participant and roster types
//!
//! A roster is an ordered list of participants. Iteration order matters to
//! the pairing engine: the first participant gets first pick of recipients.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RosterError {
    #[error("Roster is empty")]
    Empty,

    #[error("Duplicate participant name: {0:?}")]
    Duplicate(String),
}

/// Participants who must not be assigned as this participant's recipient
///
/// Two wire formats are accepted:
/// - String: `"Joe, Jane"` or `"Joe Jane"` (split on commas and whitespace)
/// - Array: `["Joe", "Jane"]`
///
/// Entries naming the participant themselves are redundant (self-assignment
/// is always excluded) and entries naming nobody in the roster never match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExcludeList(Vec<String>);

impl ExcludeList {
    /// Creates an empty exclusion list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses a whitespace- or comma-separated list of names
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    /// Returns true if `name` is excluded
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Returns true if no names are excluded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the excluded names
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for ExcludeList {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl<'de> Deserialize<'de> for ExcludeList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            List(Vec<String>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(ExcludeList::parse(&s)),
            Raw::List(names) => Ok(ExcludeList(names)),
        }
    }
}

impl fmt::Display for ExcludeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// A single santa: name, contact address, and exclusion list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique name within the roster
    pub name: String,

    /// Where the notification email goes
    pub email: String,

    /// Recipients this participant must not draw
    #[serde(default)]
    pub exclude: ExcludeList,
}

impl Participant {
    /// Returns true if this participant must not draw `name`
    pub fn excludes(&self, name: &str) -> bool {
        self.exclude.contains(name)
    }
}

/// An ordered, duplicate-free collection of participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster(Vec<Participant>);

impl Roster {
    /// Builds a roster, rejecting empty lists and duplicate names
    pub fn new(participants: Vec<Participant>) -> Result<Self, RosterError> {
        if participants.is_empty() {
            return Err(RosterError::Empty);
        }

        for (i, p) in participants.iter().enumerate() {
            if participants[..i].iter().any(|q| q.name == p.name) {
                return Err(RosterError::Duplicate(p.name.clone()));
            }
        }

        Ok(Self(participants))
    }

    /// Number of participants
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the roster has no participants
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates participants in roster order
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.0.iter()
    }

    /// Looks up a participant by name
    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.0.iter().find(|p| p.name == name)
    }

    /// Participant names in roster order
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.name.as_str()).collect()
    }
}
