//! Round-robin turn scheduler

use super::TurnScheduler;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Hands turns to each participant in roster order, wrapping around
///
/// # Example
///
/// ```
/// use parley_domain::host::{RoundRobinHost, TurnScheduler};
///
/// let mut host = RoundRobinHost::new(3, 1).unwrap();
/// let order: Vec<usize> = (0..4).map(|_| host.next_speaker()).collect();
/// assert_eq!(order, vec![1, 2, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRobinHost {
    roster_len: usize,
    start_person_index: usize,
    cursor: usize,
}

impl RoundRobinHost {
    pub fn new(roster_len: usize, start_person_index: usize) -> Result<Self, DomainError> {
        if roster_len == 0 {
            return Err(DomainError::EmptyRoster);
        }
        if start_person_index >= roster_len {
            return Err(DomainError::StartIndexOutOfRange {
                index: start_person_index,
                roster_len,
            });
        }
        Ok(Self {
            roster_len,
            start_person_index,
            cursor: start_person_index,
        })
    }

    pub fn roster_len(&self) -> usize {
        self.roster_len
    }

    pub fn start_person_index(&self) -> usize {
        self.start_person_index
    }
}

impl TurnScheduler for RoundRobinHost {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn next_speaker(&mut self) -> usize {
        let current = self.cursor;
        self.cursor = (self.cursor + 1) % self.roster_len;
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_participant_once_per_cycle() {
        for start in 0..4 {
            let mut host = RoundRobinHost::new(4, start).unwrap();
            let first: Vec<usize> = (0..4).map(|_| host.next_speaker()).collect();
            let second: Vec<usize> = (0..4).map(|_| host.next_speaker()).collect();

            let expected: Vec<usize> = (0..4).map(|i| (start + i) % 4).collect();
            assert_eq!(first, expected);
            assert_eq!(second, expected);
        }
    }

    #[test]
    fn test_no_consecutive_repeats() {
        let mut host = RoundRobinHost::new(2, 0).unwrap();
        let mut prev = host.next_speaker();
        for _ in 0..10 {
            let next = host.next_speaker();
            assert_ne!(prev, next);
            prev = next;
        }
    }

    #[test]
    fn test_single_participant_roster() {
        let mut host = RoundRobinHost::new(1, 0).unwrap();
        assert_eq!(host.next_speaker(), 0);
        assert_eq!(host.next_speaker(), 0);
    }

    #[test]
    fn test_empty_roster_is_rejected() {
        assert_eq!(RoundRobinHost::new(0, 0), Err(DomainError::EmptyRoster));
    }

    #[test]
    fn test_start_index_out_of_range() {
        assert_eq!(
            RoundRobinHost::new(2, 2),
            Err(DomainError::StartIndexOutOfRange {
                index: 2,
                roster_len: 2
            })
        );
    }
}
