//! Domain models for Santa CLI
//!
//! Contains the pairing engine and roster types without any I/O concerns.

mod participant;
mod pairing;

pub use participant::{ExcludeList, Participant, Roster, RosterError};
pub use pairing::{assign, assign_with_retries, ExhaustedRetries, Pairing, StuckGiver};
