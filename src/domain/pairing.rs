//! The pairing engine
//!
//! A single attempt is a greedy randomized pass over the roster: each giver
//! in turn draws one recipient uniformly from the still-unclaimed names that
//! their constraints allow. Greedy means an unlucky early draw can strand a
//! later giver with zero options; that is handled by retrying the whole
//! attempt from scratch, not by backtracking.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use super::participant::Roster;

/// A giver ran out of eligible recipients mid-attempt
///
/// Aborts the whole attempt; the retry driver counts it and starts over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no remaining options for {giver:?}")]
pub struct StuckGiver {
    pub giver: String,
}

/// Every attempt in the retry budget got stuck
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no valid pairing after {tries} attempt(s); last attempt: {last}")]
pub struct ExhaustedRetries {
    /// Attempts consumed (always the full budget)
    pub tries: u32,
    /// The dead end that ended the final attempt
    pub last: StuckGiver,
}

/// A complete giver-to-recipient assignment
///
/// Built incrementally in roster order during an attempt. A returned pairing
/// is always a bijection over the roster with no fixed points; equality and
/// serialization treat it as a plain map.
#[derive(Debug, Clone, Default)]
pub struct Pairing {
    pairs: Vec<(String, String)>,
}

impl Pairing {
    /// Creates an empty pairing
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of giver/recipient pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no pairs have been assigned
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The recipient assigned to `giver`, if any
    pub fn recipient_of(&self, giver: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(g, _)| g == giver)
            .map(|(_, r)| r.as_str())
    }

    /// Iterates (giver, recipient) pairs in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(g, r)| (g.as_str(), r.as_str()))
    }

    /// View as a sorted map, for comparison and serialization
    pub fn as_map(&self) -> BTreeMap<&str, &str> {
        self.iter().collect()
    }

    fn insert(&mut self, giver: String, recipient: String) {
        self.pairs.push((giver, recipient));
    }
}

impl PartialEq for Pairing {
    fn eq(&self, other: &Self) -> bool {
        self.as_map() == other.as_map()
    }
}

impl Eq for Pairing {}

impl Serialize for Pairing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.as_map())
    }
}

impl<'de> Deserialize<'de> for Pairing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairingVisitor;

        impl<'de> Visitor<'de> for PairingVisitor {
            type Value = Pairing;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of giver to recipient")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Pairing, A::Error> {
                let mut pairing = Pairing::new();
                while let Some((giver, recipient)) = map.next_entry::<String, String>()? {
                    pairing.insert(giver, recipient);
                }
                Ok(pairing)
            }
        }

        deserializer.deserialize_map(PairingVisitor)
    }
}

/// Runs a single pairing attempt
///
/// Givers are processed in roster order; each draws uniformly from the
/// recipients not yet claimed, minus themselves, minus their exclusion list,
/// and (with `prevent_circles`) minus anyone already assigned to give to
/// them. An empty draw pool abandons the entire attempt.
///
/// The circle check only sees pairs fixed before the current giver; it is
/// deliberately not a global constraint pass.
pub fn assign<R: Rng>(
    roster: &Roster,
    prevent_circles: bool,
    rng: &mut R,
) -> Result<Pairing, StuckGiver> {
    let mut remaining: Vec<&str> = roster.names();
    let mut pairing = Pairing::new();

    for giver in roster.iter() {
        let mut options: Vec<&str> = remaining
            .iter()
            .copied()
            .filter(|name| *name != giver.name)
            .filter(|name| !giver.excludes(name))
            .collect();

        if prevent_circles {
            options.retain(|name| pairing.recipient_of(name) != Some(giver.name.as_str()));
        }

        let Some(&recipient) = options.choose(rng) else {
            return Err(StuckGiver {
                giver: giver.name.clone(),
            });
        };

        pairing.insert(giver.name.clone(), recipient.to_string());
        remaining.retain(|name| *name != recipient);
    }

    Ok(pairing)
}

/// Retries [`assign`] up to `max_tries` times
///
/// Attempts are fully independent: nothing carries over from a stuck attempt
/// except the next draw from the shared RNG.
///
/// `max_tries` must be at least 1 (config validation enforces this for the
/// CLI); debug builds assert it.
pub fn assign_with_retries<R: Rng>(
    roster: &Roster,
    prevent_circles: bool,
    max_tries: u32,
    rng: &mut R,
) -> Result<Pairing, ExhaustedRetries> {
    debug_assert!(max_tries > 0, "retry budget must be positive");

    let mut last = StuckGiver {
        giver: String::new(),
    };

    for _ in 0..max_tries {
        match assign(roster, prevent_circles, rng) {
            Ok(pairing) => return Ok(pairing),
            Err(stuck) => last = stuck,
        }
    }

    Err(ExhaustedRetries {
        tries: max_tries,
        last,
    })
}
