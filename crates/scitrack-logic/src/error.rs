//! Error kinds for entry extraction and reference-table loading.
//!
//! [`EntryError`] is per-entry and never fatal: the caller records it and
//! moves on to the next entry. [`ReferenceError`] means the possibility
//! space itself cannot be trusted and should stop the pass.

use std::fmt;

use thiserror::Error;

/// Why an identifier string was rejected by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The raw entry carried no `id` at all.
    MissingId,
    /// No `@` between the experiment type and the location.
    MissingSeparator,
    /// Nothing before the `@`.
    EmptyType,
    /// None of the six situation tokens occurs in the location.
    UnknownSituation,
    /// The situation token starts the location, leaving no body.
    EmptyBody,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MalformedReason::MissingId => "entry has no id",
            MalformedReason::MissingSeparator => "missing '@' separator",
            MalformedReason::EmptyType => "empty experiment type",
            MalformedReason::UnknownSituation => "no recognized situation",
            MalformedReason::EmptyBody => "empty body",
        };
        f.write_str(text)
    }
}

/// A single save entry that could not become a completed entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    #[error("malformed identifier {raw:?}: {reason}")]
    MalformedIdentifier { raw: String, reason: MalformedReason },

    #[error("invalid {field} value {value:?} for {id}")]
    InvalidValue {
        id: String,
        field: &'static str,
        value: String,
    },
}

impl EntryError {
    pub(crate) fn malformed(raw: &str, reason: MalformedReason) -> Self {
        EntryError::MalformedIdentifier {
            raw: raw.to_string(),
            reason,
        }
    }

    /// The raw identifier of the rejected entry (empty if it had none).
    pub fn raw_id(&self) -> &str {
        match self {
            EntryError::MalformedIdentifier { raw, .. } => raw,
            EntryError::InvalidValue { id, .. } => id,
        }
    }
}

/// Reference data that would make the generated possibility space wrong.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to parse {table} table: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{table} table has an entry with an empty {field}")]
    EmptyName {
        table: &'static str,
        field: &'static str,
    },

    #[error("duplicate {table} entry {name:?}")]
    Duplicate { table: &'static str, name: String },

    #[error("{kind} name {name:?} cannot be encoded unambiguously: {reason}")]
    AmbiguousName {
        kind: &'static str,
        name: String,
        reason: &'static str,
    },
}
