//! Completed-science extraction from a parsed save document.
//!
//! The save container parser lives outside this crate; it hands over a
//! generic nested document (`serde_json::Value`). Science results sit at
//! `GAME / SCENARIO[name = ResearchAndDevelopment] / Science`, where both
//! `SCENARIO` and `Science` are an object when there is one node and an
//! array when there are several.
//!
//! A bad entry never aborts extraction: it is logged, recorded in
//! [`Extraction::rejected`], and the remaining entries are still loaded.

use serde_json::Value;

use crate::error::{EntryError, MalformedReason};
use crate::identifier::ExperimentId;
use crate::ledger::{CompletedEntry, CompletionLedger};

const GAME_NODE: &str = "GAME";
const SCENARIO_NODE: &str = "SCENARIO";
const SCIENCE_NODE: &str = "Science";
const RESEARCH_SCENARIO: &str = "ResearchAndDevelopment";

/// A numeric field as it appears in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Field not present. Saves omit zero values.
    Missing,
    Number(f64),
    Text(String),
}

impl RawValue {
    fn from_field(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => RawValue::Missing,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) => RawValue::Number(f),
                None => RawValue::Text(n.to_string()),
            },
            Some(Value::String(s)) => RawValue::Text(s.clone()),
            Some(other) => RawValue::Text(other.to_string()),
        }
    }

    /// Parse as a finite, non-negative amount of science.
    fn parse(&self, id: &str, field: &'static str) -> Result<f64, EntryError> {
        let invalid = |value: String| EntryError::InvalidValue {
            id: id.to_string(),
            field,
            value,
        };
        let value = match self {
            RawValue::Missing => return Ok(0.0),
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().map_err(|_| invalid(s.clone()))?,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(value.to_string()));
        }
        Ok(value)
    }
}

/// One `Science` node before validation. An empty `id` means the node had none.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub id: String,
    pub earned: RawValue,
    pub cap: RawValue,
}

impl RawEntry {
    fn from_node(node: &Value) -> Self {
        let id = match node.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Self {
            id,
            earned: RawValue::from_field(node.get("sci")),
            cap: RawValue::from_field(node.get("cap")),
        }
    }
}

impl TryFrom<RawEntry> for CompletedEntry {
    type Error = EntryError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        if raw.id.is_empty() {
            return Err(EntryError::malformed("", MalformedReason::MissingId));
        }
        let earned = raw.earned.parse(&raw.id, "earned")?;
        let cap = raw.cap.parse(&raw.id, "cap")?;
        let id = ExperimentId::decode(&raw.id)?;
        Ok(CompletedEntry::new(id, earned, cap))
    }
}

/// Result of extracting one save document.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub title: String,
    pub ledger: CompletionLedger,
    pub rejected: Vec<EntryError>,
}

/// Treat an object as a one-element list; anything else but an array is empty.
fn node_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(node @ Value::Object(_)) => vec![node],
        _ => Vec::new(),
    }
}

/// Raw science entries of the research scenario, in document order.
pub fn science_entries(document: &Value) -> Vec<RawEntry> {
    let scenarios = node_list(document.get(GAME_NODE).and_then(|g| g.get(SCENARIO_NODE)));
    let Some(research) = scenarios
        .into_iter()
        .find(|s| s.get("name").and_then(Value::as_str) == Some(RESEARCH_SCENARIO))
    else {
        return Vec::new();
    };
    node_list(research.get(SCIENCE_NODE))
        .into_iter()
        .map(RawEntry::from_node)
        .collect()
}

/// Save title from `GAME / Title`, or `"Unknown"`.
pub fn save_title(document: &Value) -> String {
    document
        .get(GAME_NODE)
        .and_then(|g| g.get("Title"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string()
}

/// Validate raw entries into a ledger, collecting the rejects.
pub fn build_ledger<I>(entries: I) -> (CompletionLedger, Vec<EntryError>)
where
    I: IntoIterator<Item = RawEntry>,
{
    let mut ledger = CompletionLedger::new();
    let mut rejected = Vec::new();
    for raw in entries {
        match CompletedEntry::try_from(raw) {
            Ok(entry) => {
                ledger.insert(entry);
            }
            Err(e) => {
                log::warn!("Skipping science entry: {}", e);
                rejected.push(e);
            }
        }
    }
    (ledger, rejected)
}

/// Extract every completed science entry from a save document.
pub fn extract(document: &Value) -> Extraction {
    let title = save_title(document);
    let (ledger, rejected) = build_ledger(science_entries(document));
    log::debug!(
        "Extracted {} science entries from {:?} ({} rejected)",
        ledger.count(),
        title,
        rejected.len()
    );
    Extraction {
        title,
        ledger,
        rejected,
    }
}
