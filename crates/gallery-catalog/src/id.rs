//! Identity assignment for new records.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Mints application-level ids. Called once per record creation, never on update.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Millisecond Unix timestamps rendered as decimal strings.
///
/// Ids are strictly increasing within one generator: when two creations land
/// in the same millisecond the second one is bumped past the first, so
/// sorting ids numerically gives most-recent-first order.
#[derive(Debug, Default)]
pub struct TimestampIds {
    last: AtomicU64,
}

impl TimestampIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts issuing after `floor`, e.g. the highest id already in a catalog.
    pub fn starting_after(floor: u64) -> Self {
        Self {
            last: AtomicU64::new(floor),
        }
    }
}

impl IdGenerator for TimestampIds {
    fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            // Numeric space exhausted (e.g. a stored id of u64::MAX).
            let Some(next) = last.checked_add(1) else {
                return uuid::Uuid::new_v4().to_string();
            };
            let candidate = now.max(next);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate.to_string(),
                Err(observed) => last = observed,
            }
        }
    }
}

/// Random UUID v4 ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Configurable choice of generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    #[default]
    Timestamp,
    Uuid,
}

impl IdStrategy {
    pub fn build(self) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Timestamp => Box::new(TimestampIds::new()),
            IdStrategy::Uuid => Box::new(RandomIds),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(IdStrategy::Timestamp),
            "uuid" => Ok(IdStrategy::Uuid),
            other => Err(format!(
                "Unknown id strategy: '{}' (expected 'timestamp' or 'uuid')",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_timestamp_ids_are_unique_in_a_burst() {
        let ids = TimestampIds::new();
        let minted: Vec<String> = (0..1000).map(|_| ids.next_id()).collect();
        let distinct: HashSet<&String> = minted.iter().collect();
        assert_eq!(distinct.len(), minted.len());
    }

    #[test]
    fn test_timestamp_ids_strictly_increase() {
        let ids = TimestampIds::new();
        let a: u64 = ids.next_id().parse().unwrap();
        let b: u64 = ids.next_id().parse().unwrap();
        let c: u64 = ids.next_id().parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_starting_after_floor() {
        let floor = 9_999_999_999_999;
        let ids = TimestampIds::starting_after(floor);
        let next: u64 = ids.next_id().parse().unwrap();
        assert_eq!(next, floor + 1);
    }

    #[test]
    fn test_exhausted_floor_does_not_overflow() {
        let ids = TimestampIds::starting_after(u64::MAX);
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_ne!(a, u64::MAX.to_string());
        assert!(uuid::Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_timestamp_ids_unique_across_threads() {
        let ids = Arc::new(TimestampIds::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id), "duplicate id minted");
            }
        }
        assert_eq!(all.len(), 1000);
    }

    #[test]
    fn test_random_ids_are_uuids() {
        let id = RandomIds.next_id();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_ne!(id, RandomIds.next_id());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("UUID".parse::<IdStrategy>(), Ok(IdStrategy::Uuid));
        assert_eq!("timestamp".parse::<IdStrategy>(), Ok(IdStrategy::Timestamp));
        assert!("snowflake".parse::<IdStrategy>().is_err());
    }
}
