// SPDX-License-Identifier: MPL-2.0
//! Per-kind display policy.
//!
//! A policy is a pure capacity rule: it answers how many notifications of a
//! kind may be active at once. Promotion order is always FIFO by enqueue
//! time; severity never jumps the queue.

/// Capacity and ordering rule for one notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPolicy {
    /// Up to `max_concurrent` notifications visible at once; additional
    /// requests queue and are promoted oldest-first as slots free up.
    Stacked {
        /// Maximum simultaneously active notifications of this kind.
        max_concurrent: usize,
    },
    /// Exactly zero or one active notification; a new request waits until
    /// the current one is fully removed (strict handoff, no preemption).
    SingleSlot,
}

impl DisplayPolicy {
    /// Returns the maximum number of simultaneously active notifications.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match self {
            DisplayPolicy::Stacked { max_concurrent } => (*max_concurrent).max(1),
            DisplayPolicy::SingleSlot => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_capacity_matches_limit() {
        let policy = DisplayPolicy::Stacked { max_concurrent: 3 };
        assert_eq!(policy.capacity(), 3);
    }

    #[test]
    fn single_slot_capacity_is_one() {
        assert_eq!(DisplayPolicy::SingleSlot.capacity(), 1);
    }

    #[test]
    fn zero_stacked_limit_is_clamped_to_one() {
        let policy = DisplayPolicy::Stacked { max_concurrent: 0 };
        assert_eq!(policy.capacity(), 1);
    }
}
