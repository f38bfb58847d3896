//! Freshness decisions for polled unread counts.
//!
//! Two independent predicates decide whether an observation counts as
//! "new": growth detection against the persisted watermark, and an
//! explicit trigger used by simulate-new flows. They stay separate and
//! are OR'd in exactly one place,
//! [`FreshnessEvaluator::observe_with_trigger`], so tests can pin down
//! which path raised a given alert.

use crate::notify::watermark::WatermarkStore;

/// Primary path: the count grew past an established nonzero baseline.
///
/// A first observation (baseline 0) never trips this predicate even if
/// the count itself is positive: the user may simply not have checked
/// notifications yet, so a pre-existing backlog is not announced.
pub fn growth_detected(current: u64, last_seen: u64) -> bool {
    current > last_seen && last_seen != 0
}

/// Secondary path: an out-of-band signal forces the alert, as long as
/// there is something to show. Used by the simulate-new-notification
/// flow; never set during normal polling.
pub fn explicitly_flagged(current: u64, trigger: bool) -> bool {
    trigger && current > 0
}

/// Outcome of evaluating one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    /// The unread count that was observed.
    pub unread: u64,
    /// Whether the user should be alerted.
    pub is_new: bool,
}

/// Compares polled unread counts against the persisted watermark.
///
/// The watermark always advances to the observed count after an
/// evaluation, up or down: it tracks "last observed", not "last
/// acknowledged by the user".
#[derive(Debug, Clone)]
pub struct FreshnessEvaluator {
    store: WatermarkStore,
}

impl FreshnessEvaluator {
    pub fn new(store: WatermarkStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &WatermarkStore {
        &self.store
    }

    /// Normal poll path: growth detection only.
    pub fn observe(&self, current: u64) -> Freshness {
        self.observe_with_trigger(current, false)
    }

    /// Evaluate one observation, optionally forced by the explicit
    /// trigger path. Latches the watermark to `current` regardless of
    /// the verdict.
    pub fn observe_with_trigger(&self, current: u64, trigger: bool) -> Freshness {
        let prior = self.store.read();
        let is_new = growth_detected(current, prior.last_seen_count)
            || explicitly_flagged(current, trigger);
        self.store.write_best_effort(current);
        Freshness {
            unread: current,
            is_new,
        }
    }

    /// Record that the user has seen the current notifications.
    /// Idempotent; failures degrade to a possible duplicate alert later.
    pub fn acknowledge(&self, current: u64) {
        self.store.write_best_effort(current);
    }
}
