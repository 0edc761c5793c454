//! One full reconciliation pass: generate, reconcile, aggregate.
//!
//! Nothing is cached between passes. Loading a different save means
//! building a new ledger and calling [`run`] again.

use crate::generator::{generate_with, PossibilitySet};
use crate::ledger::CompletionLedger;
use crate::reconcile::{reconcile, AvailableEntry};
use crate::reference::ReferenceTables;
use crate::settings::Settings;
use crate::stats::{aggregate, Statistics};

#[derive(Debug, Clone)]
pub struct PassResult {
    pub possible: PossibilitySet,
    pub available: Vec<AvailableEntry>,
    pub statistics: Statistics,
}

pub fn run(tables: &ReferenceTables, ledger: &CompletionLedger, settings: &Settings) -> PassResult {
    let possible = generate_with(tables, &settings.restrictions);
    let available = reconcile(&possible, ledger, &settings.base_values);
    let statistics = aggregate(&available, ledger, possible.len());
    log::info!(
        "Reconciled {} possibilities against {} ledger entries: {} available",
        possible.len(),
        ledger.count(),
        available.len()
    );
    PassResult {
        possible,
        available,
        statistics,
    }
}
