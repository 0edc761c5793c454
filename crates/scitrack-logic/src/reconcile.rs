//! Reconciliation of the possibility space against a completion ledger.
//!
//! | Ledger state | Output |
//! |--------------|--------|
//! | absent | [`AvailableEntry`] with the estimated value, not partial |
//! | present, below cap | [`AvailableEntry`] with the remaining value, partial |
//! | present, at cap | nothing |
//!
//! Completion status lives here too since it is a property of the data:
//! an entry counts as complete once its remaining value is within
//! [`COMPLETE_EPSILON`], which absorbs float residue from the save.

use std::iter::Sum;

use serde::{Deserialize, Serialize};

use crate::estimate::ValueEstimator;
use crate::generator::PossibleEntry;
use crate::identifier::ExperimentId;
use crate::ledger::CompletionLedger;

/// Remaining values at or below this count as complete.
pub const COMPLETE_EPSILON: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionStatus {
    Unstarted,
    Partial,
    Complete,
}

impl CompletionStatus {
    /// Single-character marker for text output.
    pub fn symbol(self) -> &'static str {
        match self {
            CompletionStatus::Unstarted => "☐",
            CompletionStatus::Partial => "◐",
            CompletionStatus::Complete => "✓",
        }
    }
}

/// A possibility that still has science left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableEntry {
    pub id: ExperimentId,
    pub display_name: String,
    pub body_display_name: String,
    pub remaining_value: f64,
    /// Some science was already collected.
    pub is_partial: bool,
}

impl AvailableEntry {
    pub fn status(&self) -> CompletionStatus {
        if is_complete_value(self.remaining_value) {
            CompletionStatus::Complete
        } else if self.is_partial {
            CompletionStatus::Partial
        } else {
            CompletionStatus::Unstarted
        }
    }
}

pub fn is_complete_value(remaining: f64) -> bool {
    remaining <= COMPLETE_EPSILON
}

/// Diff `possibilities` against `ledger`.
///
/// Output follows the order of `possibilities`.
pub fn reconcile<'a, I, E>(
    possibilities: I,
    ledger: &CompletionLedger,
    estimator: &E,
) -> Vec<AvailableEntry>
where
    I: IntoIterator<Item = &'a PossibleEntry>,
    E: ValueEstimator + ?Sized,
{
    possibilities
        .into_iter()
        .filter_map(|p| {
            let (remaining_value, is_partial) = match ledger.lookup(&p.id) {
                None => (estimator.estimate(p.id.experiment_type()), false),
                Some(done) if !done.is_full() => (done.remaining(), true),
                Some(_) => return None,
            };
            Some(AvailableEntry {
                id: p.id.clone(),
                display_name: p.display_name.clone(),
                body_display_name: p.body_display_name.clone(),
                remaining_value,
                is_partial,
            })
        })
        .collect()
}

/// Leaf counts for a group of entries. Tallies add up, so a group's
/// status can be built bottom-up from its children in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GroupTally {
    pub members: usize,
    pub complete: usize,
    pub remaining_value: f64,
}

impl GroupTally {
    pub fn of(entry: &AvailableEntry) -> Self {
        Self {
            members: 1,
            complete: usize::from(entry.status() == CompletionStatus::Complete),
            remaining_value: entry.remaining_value,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            members: self.members + other.members,
            complete: self.complete + other.complete,
            remaining_value: self.remaining_value + other.remaining_value,
        }
    }

    /// Complete if every member is, partial if some are, else unstarted.
    /// An empty group has nothing left and is complete.
    pub fn status(&self) -> CompletionStatus {
        if self.complete == self.members {
            CompletionStatus::Complete
        } else if self.complete > 0 {
            CompletionStatus::Partial
        } else {
            CompletionStatus::Unstarted
        }
    }
}

impl Sum for GroupTally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Self::merge)
    }
}

impl<'a> Sum<&'a AvailableEntry> for GroupTally {
    fn sum<I: Iterator<Item = &'a AvailableEntry>>(iter: I) -> Self {
        iter.map(GroupTally::of).sum()
    }
}

/// Status of a flat group of entries.
pub fn group_status<'a, I>(entries: I) -> CompletionStatus
where
    I: IntoIterator<Item = &'a AvailableEntry>,
{
    entries.into_iter().sum::<GroupTally>().status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::BaseValueTable;
    use crate::identifier::Situation;
    use crate::ledger::CompletedEntry;

    fn possible(body: &str) -> PossibleEntry {
        PossibleEntry {
            id: ExperimentId::new("surfaceSample", body, Situation::SrfLanded, None),
            display_name: "Surface Sample".into(),
            body_display_name: body.into(),
        }
    }

    fn available(remaining_value: f64, is_partial: bool) -> AvailableEntry {
        AvailableEntry {
            id: ExperimentId::new("crewReport", "Mun", Situation::InSpaceLow, None),
            display_name: "Crew Report".into(),
            body_display_name: "Mun".into(),
            remaining_value,
            is_partial,
        }
    }

    #[test]
    fn classifies_each_ledger_state() {
        let possibilities = vec![possible("Mun"), possible("Minmus"), possible("Duna")];
        let ledger: CompletionLedger = vec![
            CompletedEntry::new(possibilities[1].id.clone(), 12.0, 30.0),
            CompletedEntry::new(possibilities[2].id.clone(), 30.0, 30.0),
        ]
        .into_iter()
        .collect();

        let out = reconcile(&possibilities, &ledger, &BaseValueTable::default());
        assert_eq!(out.len(), 2);

        assert_eq!(out[0].id.body(), "Mun");
        assert_eq!(out[0].remaining_value, 30.0);
        assert!(!out[0].is_partial);
        assert_eq!(out[0].status(), CompletionStatus::Unstarted);

        assert_eq!(out[1].id.body(), "Minmus");
        assert_eq!(out[1].remaining_value, 18.0);
        assert!(out[1].is_partial);
        assert_eq!(out[1].status(), CompletionStatus::Partial);
    }

    #[test]
    fn ledger_entries_outside_possibilities_are_ignored() {
        let possibilities = vec![possible("Mun")];
        let stray = ExperimentId::new("mysteryGoo", "Eeloo", Situation::InSpaceHigh, None);
        let ledger: CompletionLedger = vec![CompletedEntry::new(stray, 1.0, 10.0)]
            .into_iter()
            .collect();
        let out = reconcile(&possibilities, &ledger, &|_: &str| 2.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].remaining_value, 2.0);
    }

    #[test]
    fn epsilon_boundary() {
        assert_eq!(available(0.05, true).status(), CompletionStatus::Complete);
        assert_eq!(available(0.1, true).status(), CompletionStatus::Complete);
        assert_eq!(available(0.15, true).status(), CompletionStatus::Partial);
        assert_eq!(available(0.15, false).status(), CompletionStatus::Unstarted);
    }

    #[test]
    fn group_status_from_members() {
        let done = available(0.0, true);
        let partial = available(4.0, true);
        let fresh = available(5.0, false);

        assert_eq!(group_status([&done, &done]), CompletionStatus::Complete);
        assert_eq!(group_status([&done, &fresh]), CompletionStatus::Partial);
        assert_eq!(group_status([&fresh, &done]), CompletionStatus::Partial);
        // Partial progress alone does not make a group partial.
        assert_eq!(group_status([&partial, &fresh]), CompletionStatus::Unstarted);
        assert_eq!(group_status(std::iter::empty::<&AvailableEntry>()), CompletionStatus::Complete);
    }

    #[test]
    fn tallies_compose_bottom_up() {
        let done = available(0.0, true);
        let fresh = available(5.0, false);
        let left: GroupTally = [&done, &done].into_iter().sum();
        let right: GroupTally = [&fresh].into_iter().sum();
        let parent = left.merge(right);

        assert_eq!(left.status(), CompletionStatus::Complete);
        assert_eq!(right.status(), CompletionStatus::Unstarted);
        assert_eq!(parent, right.merge(left));
        assert_eq!(parent.status(), CompletionStatus::Partial);
        assert_eq!(parent.members, 3);
        assert_eq!(parent.remaining_value, 5.0);
    }
}
