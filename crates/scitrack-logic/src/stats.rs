//! Summary statistics over one reconciliation pass.

use serde::{Deserialize, Serialize};

use crate::ledger::CompletionLedger;
use crate::reconcile::AvailableEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_possible: usize,
    /// Entries recorded in the ledger, full or not.
    pub total_completed: usize,
    pub total_available: usize,
    pub total_available_value: f64,
    pub total_earned_value: f64,
    /// `total_completed / total_possible * 100`, or 0 with nothing possible.
    pub completion_percentage: f64,
}

pub fn aggregate(
    available: &[AvailableEntry],
    ledger: &CompletionLedger,
    total_possible: usize,
) -> Statistics {
    let total_completed = ledger.count();
    let completion_percentage = if total_possible > 0 {
        total_completed as f64 / total_possible as f64 * 100.0
    } else {
        0.0
    };
    Statistics {
        total_possible,
        total_completed,
        total_available: available.len(),
        total_available_value: available.iter().map(|e| e.remaining_value).sum(),
        total_earned_value: ledger.total_earned(),
        completion_percentage,
    }
}
