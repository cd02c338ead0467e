//! Santa CLI - A secret santa pairing and notification tool
//!
//! Santa assigns a gift-giving pairing among a roster of participants,
//! honoring per-participant exclusion lists and an optional "no two-person
//! circles" constraint, then notifies each giver of their recipient by
//! templated email.

pub mod domain;
pub mod storage;
pub mod mail;
pub mod cli;

pub use domain::{ExcludeList, Participant, Pairing, Roster, RosterError};
pub use domain::{ExhaustedRetries, StuckGiver};
