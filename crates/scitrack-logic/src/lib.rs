//! Pure science-tracking logic.
//!
//! Reconciles every science experiment the reference tables allow against
//! the science a save has already collected. Nothing here touches files,
//! terminals or the save container format: callers hand in a parsed
//! document and two reference tables, and get plain data back.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`identifier`] | `type@BodySituationBiome` codec and the six situations |
//! | [`ledger`] | Completed entries keyed by identifier |
//! | [`extract`] | Save document → raw entries → ledger, with per-entry rejects |
//! | [`reference`] | Validated experiment and body tables |
//! | [`generator`] | Possibility space from the tables, with body restrictions |
//! | [`estimate`] | Pluggable value estimate for untouched experiments |
//! | [`reconcile`] | Available entries and completion status |
//! | [`stats`] | Totals and completion percentage |
//! | [`view`] | Filters and body/experiment/situation groupings |
//! | [`settings`] | Serde-loadable tunables |
//! | [`pass`] | One end-to-end pass |
//! | [`error`] | Entry and reference-table errors |

pub mod error;
pub mod estimate;
pub mod extract;
pub mod generator;
pub mod identifier;
pub mod ledger;
pub mod pass;
pub mod reconcile;
pub mod reference;
pub mod settings;
pub mod stats;
pub mod view;

pub use error::{EntryError, MalformedReason, ReferenceError};
pub use identifier::{ExperimentId, Situation};
