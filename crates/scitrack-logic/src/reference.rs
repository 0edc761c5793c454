//! Reference tables: experiment definitions and celestial bodies.
//!
//! Both tables arrive from the reference provider as JSON:
//!
//! ```json
//! { "experiments": [ { "id": "crewReport", "name": "Crew Report",
//!                      "situations": ["SrfLanded", "InSpaceLow"], "requires_biome": true } ] }
//! { "bodies": [ { "name": "Mun", "situations": ["SrfLanded", "InSpaceLow"],
//!                 "biomes": ["Midlands", "Highlands"] } ] }
//! ```
//!
//! Every field is required; `biomes` may be an empty list but not absent.
//! Loading rejects names that would make generated identifiers ambiguous
//! (an `@` anywhere, or a situation token inside a body or biome name).
//! That check is what lets the generator promise unique encodings.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ReferenceError;
use crate::identifier::Situation;

/// One experiment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentDef {
    /// Save-format type id, e.g. `crewReport`.
    pub id: String,
    /// Display name, e.g. `Crew Report`.
    pub name: String,
    pub situations: BTreeSet<Situation>,
    /// Results differ per biome.
    pub requires_biome: bool,
}

/// One celestial body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyDef {
    pub name: String,
    pub situations: BTreeSet<Situation>,
    /// May be empty, but must be present.
    pub biomes: BTreeSet<String>,
}

#[derive(Deserialize)]
struct ExperimentFile {
    experiments: Vec<ExperimentDef>,
}

#[derive(Deserialize)]
struct BodyFile {
    bodies: Vec<BodyDef>,
}

/// Validated, read-only reference data, ordered by id and body name.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    experiments: BTreeMap<String, ExperimentDef>,
    bodies: BTreeMap<String, BodyDef>,
}

fn check_name(
    kind: &'static str,
    table: &'static str,
    name: &str,
    forbid_tokens: bool,
) -> Result<(), ReferenceError> {
    if name.is_empty() {
        return Err(ReferenceError::EmptyName { table, field: kind });
    }
    if name.contains('@') {
        return Err(ReferenceError::AmbiguousName {
            kind,
            name: name.to_string(),
            reason: "contains '@'",
        });
    }
    if forbid_tokens && Situation::find_in(name).is_some() {
        return Err(ReferenceError::AmbiguousName {
            kind,
            name: name.to_string(),
            reason: "contains a situation token",
        });
    }
    Ok(())
}

impl ReferenceTables {
    /// Build tables from definitions, validating every name.
    pub fn new(
        experiments: Vec<ExperimentDef>,
        bodies: Vec<BodyDef>,
    ) -> Result<Self, ReferenceError> {
        let mut tables = Self::default();

        for exp in experiments {
            check_name("experiment id", "experiment", &exp.id, false)?;
            if exp.name.is_empty() {
                return Err(ReferenceError::EmptyName {
                    table: "experiment",
                    field: "name",
                });
            }
            if tables.experiments.contains_key(&exp.id) {
                return Err(ReferenceError::Duplicate {
                    table: "experiment",
                    name: exp.id,
                });
            }
            tables.experiments.insert(exp.id.clone(), exp);
        }

        for body in bodies {
            check_name("body", "body", &body.name, true)?;
            for biome in &body.biomes {
                check_name("biome", "body", biome, true)?;
            }
            if tables.bodies.contains_key(&body.name) {
                return Err(ReferenceError::Duplicate {
                    table: "body",
                    name: body.name,
                });
            }
            tables.bodies.insert(body.name.clone(), body);
        }

        log::debug!(
            "Loaded {} experiment types and {} bodies",
            tables.experiments.len(),
            tables.bodies.len()
        );
        Ok(tables)
    }

    /// Parse both tables from the reference provider's JSON documents.
    pub fn from_json(experiments_json: &str, bodies_json: &str) -> Result<Self, ReferenceError> {
        let experiments: ExperimentFile =
            serde_json::from_str(experiments_json).map_err(|source| ReferenceError::Parse {
                table: "experiment",
                source,
            })?;
        let bodies: BodyFile =
            serde_json::from_str(bodies_json).map_err(|source| ReferenceError::Parse {
                table: "body",
                source,
            })?;
        Self::new(experiments.experiments, bodies.bodies)
    }

    pub fn experiments(&self) -> impl Iterator<Item = &ExperimentDef> {
        self.experiments.values()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &BodyDef> {
        self.bodies.values()
    }

    pub fn experiment(&self, id: &str) -> Option<&ExperimentDef> {
        self.experiments.get(id)
    }

    pub fn body(&self, name: &str) -> Option<&BodyDef> {
        self.bodies.get(name)
    }

    /// Body names, sorted.
    pub fn body_names(&self) -> Vec<&str> {
        self.bodies.keys().map(String::as_str).collect()
    }

    /// `(type id, display name)` pairs, sorted by id.
    pub fn experiment_types(&self) -> Vec<(&str, &str)> {
        self.experiments
            .values()
            .map(|e| (e.id.as_str(), e.name.as_str()))
            .collect()
    }

    /// Display name for a type id, falling back to the id itself.
    pub fn experiment_name<'a>(&'a self, type_id: &'a str) -> &'a str {
        self.experiments
            .get(type_id)
            .map(|e| e.name.as_str())
            .unwrap_or(type_id)
    }

    /// Reverse lookup of a display name.
    pub fn experiment_type_for_name(&self, name: &str) -> Option<&str> {
        self.experiments
            .values()
            .find(|e| e.name == name)
            .map(|e| e.id.as_str())
    }
}
