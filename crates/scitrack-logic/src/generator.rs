//! Possibility generator: every valid experiment/body/situation/biome.
//!
//! For each experiment type and body the valid situations are the
//! intersection of both situation sets. Biome-dependent experiments on a
//! body with biomes yield one entry per biome; everything else yields one
//! entry per situation with no biome. A [`BodyRestrictions`] list removes
//! types that only exist at specific bodies.
//!
//! Output is unique by construction: tables are keyed by id and name,
//! situations and biomes are sets, and [`ReferenceTables`] refuses names
//! that could alias once encoded.

use serde::{Deserialize, Serialize};

use crate::identifier::ExperimentId;
use crate::reference::{BodyDef, ExperimentDef, ReferenceTables};

/// Limits an experiment type to one body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyRestriction {
    pub experiment_type: String,
    pub only_body: String,
}

/// Named exceptions to the cross product. A type listed more than once
/// is allowed at each listed body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyRestrictions(Vec<BodyRestriction>);

impl Default for BodyRestrictions {
    /// Asteroid samples are only generated at the Sun.
    fn default() -> Self {
        Self::none().with("asteroidSample", "Sun")
    }
}

impl BodyRestrictions {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, experiment_type: &str, only_body: &str) -> Self {
        self.0.push(BodyRestriction {
            experiment_type: experiment_type.to_string(),
            only_body: only_body.to_string(),
        });
        self
    }

    /// Whether `experiment_type` may be generated at `body`.
    pub fn allows(&self, experiment_type: &str, body: &str) -> bool {
        let mut restricted = false;
        for r in self.0.iter().filter(|r| r.experiment_type == experiment_type) {
            if r.only_body == body {
                return true;
            }
            restricted = true;
        }
        !restricted
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyRestriction> {
        self.0.iter()
    }
}

/// One experiment that can be performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibleEntry {
    pub id: ExperimentId,
    pub display_name: String,
    pub body_display_name: String,
}

/// The full possibility space for one set of reference tables.
#[derive(Debug, Clone, Default)]
pub struct PossibilitySet {
    entries: Vec<PossibleEntry>,
}

impl PossibilitySet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PossibleEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[PossibleEntry] {
        &self.entries
    }

    pub fn for_body<'a>(&'a self, body: &'a str) -> impl Iterator<Item = &'a PossibleEntry> {
        self.entries.iter().filter(move |e| e.id.body() == body)
    }

    pub fn for_type<'a>(
        &'a self,
        experiment_type: &'a str,
    ) -> impl Iterator<Item = &'a PossibleEntry> {
        self.entries
            .iter()
            .filter(move |e| e.id.experiment_type() == experiment_type)
    }
}

impl<'a> IntoIterator for &'a PossibilitySet {
    type Item = &'a PossibleEntry;
    type IntoIter = std::slice::Iter<'a, PossibleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Generate with the default restrictions.
pub fn generate(tables: &ReferenceTables) -> PossibilitySet {
    generate_with(tables, &BodyRestrictions::default())
}

/// Generate the possibility space under explicit restrictions.
pub fn generate_with(tables: &ReferenceTables, restrictions: &BodyRestrictions) -> PossibilitySet {
    let mut entries = Vec::new();
    for exp in tables.experiments() {
        for body in tables.bodies() {
            if restrictions.allows(&exp.id, &body.name) {
                push_pair(&mut entries, exp, body);
            }
        }
    }
    log::info!("Generated {} possible experiments", entries.len());
    PossibilitySet { entries }
}

fn push_pair(out: &mut Vec<PossibleEntry>, exp: &ExperimentDef, body: &BodyDef) {
    let per_biome = exp.requires_biome && !body.biomes.is_empty();
    for &situation in exp.situations.intersection(&body.situations) {
        if per_biome {
            for biome in &body.biomes {
                out.push(PossibleEntry {
                    id: ExperimentId::new(&exp.id, &body.name, situation, Some(biome)),
                    display_name: exp.name.clone(),
                    body_display_name: body.name.clone(),
                });
            }
        } else {
            out.push(PossibleEntry {
                id: ExperimentId::new(&exp.id, &body.name, situation, None),
                display_name: exp.name.clone(),
                body_display_name: body.name.clone(),
            });
        }
    }
}
