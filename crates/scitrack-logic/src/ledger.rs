//! Completed science recorded in a save, keyed by identifier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::identifier::ExperimentId;

/// Science already collected for one identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedEntry {
    pub id: ExperimentId,
    /// Science earned so far.
    pub earned: f64,
    /// Maximum science obtainable for this identifier.
    pub cap: f64,
}

impl CompletedEntry {
    pub fn new(id: ExperimentId, earned: f64, cap: f64) -> Self {
        Self { id, earned, cap }
    }

    /// Earned has reached the cap.
    pub fn is_full(&self) -> bool {
        self.earned >= self.cap
    }

    /// Science left before the cap, never negative.
    pub fn remaining(&self) -> f64 {
        (self.cap - self.earned).max(0.0)
    }
}

/// Every completed entry of one save. Duplicate ids overwrite.
#[derive(Debug, Clone, Default)]
pub struct CompletionLedger {
    entries: HashMap<ExperimentId, CompletedEntry>,
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the one it replaced.
    pub fn insert(&mut self, entry: CompletedEntry) -> Option<CompletedEntry> {
        self.entries.insert(entry.id.clone(), entry)
    }

    pub fn lookup(&self, id: &ExperimentId) -> Option<&CompletedEntry> {
        self.entries.get(id)
    }

    /// Any progress at all is recorded for `id`.
    pub fn contains(&self, id: &ExperimentId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn is_fully_completed(&self, id: &ExperimentId) -> bool {
        self.lookup(id).is_some_and(CompletedEntry::is_full)
    }

    /// Science earned across all entries.
    pub fn total_earned(&self) -> f64 {
        self.entries.values().map(|e| e.earned).sum()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompletedEntry> {
        self.entries.values()
    }
}

impl Extend<CompletedEntry> for CompletionLedger {
    fn extend<I: IntoIterator<Item = CompletedEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl FromIterator<CompletedEntry> for CompletionLedger {
    fn from_iter<I: IntoIterator<Item = CompletedEntry>>(iter: I) -> Self {
        let mut ledger = Self::new();
        ledger.extend(iter);
        ledger
    }
}
