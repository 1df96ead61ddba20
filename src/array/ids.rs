//! Synthetic entry ids.
//!
//! Ids exist only to keep an entry's identity stable while the list is
//! reordered; they never derive from the entry's value or position.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of one array entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u128);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh entry ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> EntryId;
}

impl<G: IdGenerator + ?Sized> IdGenerator for Box<G> {
    fn next_id(&mut self) -> EntryId {
        (**self).next_id()
    }
}

/// Monotonic counter starting at 1, so tests can assert exact id sequences.
///
/// The counter stops at `u128::MAX` and keeps returning it; the owning field
/// then reports the repeat as exhaustion instead of wrapping around.
#[derive(Debug, Clone, Default)]
pub struct SequenceIdGenerator {
    last: u128,
}

impl SequenceIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after `last` (e.g. when restoring persisted ids).
    pub fn starting_after(last: u128) -> Self {
        Self { last }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&mut self) -> EntryId {
        self.last = self.last.saturating_add(1);
        EntryId(self.last)
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> EntryId {
        EntryId(uuid::Uuid::new_v4().as_u128())
    }
}

/// Which generator a field uses, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Sequence,
    Uuid,
}

impl IdStrategy {
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Sequence => Box::new(SequenceIdGenerator::new()),
            IdStrategy::Uuid => Box::new(UuidIdGenerator),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Sequence => write!(f, "sequence"),
            IdStrategy::Uuid => write!(f, "uuid"),
        }
    }
}

impl std::str::FromStr for IdStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequence" => Ok(IdStrategy::Sequence),
            "uuid" => Ok(IdStrategy::Uuid),
            _ => bail!("Invalid id strategy '{}'. Valid values: sequence, uuid", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_generator_counts_from_one() {
        let mut generator = SequenceIdGenerator::new();
        let ids: Vec<EntryId> = (0..3).map(|_| generator.next_id()).collect();
        assert_eq!(ids, vec![EntryId(1), EntryId(2), EntryId(3)]);
    }

    #[test]
    fn test_sequence_generator_resumes() {
        let mut generator = SequenceIdGenerator::starting_after(41);
        assert_eq!(generator.next_id(), EntryId(42));
    }

    #[test]
    fn test_sequence_generator_stops_at_ceiling() {
        let mut generator = SequenceIdGenerator::starting_after(u128::MAX - 1);
        assert_eq!(generator.next_id(), EntryId(u128::MAX));
        assert_eq!(generator.next_id(), EntryId(u128::MAX));
    }

    #[test]
    fn test_uuid_generator_differs_between_calls() {
        let mut generator = UuidIdGenerator;
        assert_ne!(generator.next_id(), generator.next_id());
    }

    #[test]
    fn test_boxed_strategy_generator() {
        let mut generator = IdStrategy::Sequence.generator();
        assert_eq!(generator.next_id(), EntryId(1));
        assert_eq!("UUID".parse::<IdStrategy>().unwrap(), IdStrategy::Uuid);
        assert!("random".parse::<IdStrategy>().is_err());
    }
}
