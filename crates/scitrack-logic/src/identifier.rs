//! Science identifier codec.
//!
//! The save format keys every science result by a single string:
//!
//! ```text
//! <experimentType>@<body><Situation><biome?>
//! crewReport@KerbinSrfLandedGrasslands
//! ```
//!
//! There is no separator between body, situation and biome, so decoding
//! relies on the situation being one of six fixed tokens. The tokens are
//! checked in a fixed priority order and the first one present anywhere in
//! the location wins; body is what precedes it, biome what follows.
//!
//! ```
//! use scitrack_logic::identifier::{ExperimentId, Situation};
//!
//! let id = ExperimentId::decode("crewReport@KerbinSrfLandedGrasslands").unwrap();
//! assert_eq!(id.experiment_type(), "crewReport");
//! assert_eq!(id.body(), "Kerbin");
//! assert_eq!(id.situation(), Situation::SrfLanded);
//! assert_eq!(id.biome(), Some("Grasslands"));
//! assert_eq!(id.encode(), "crewReport@KerbinSrfLandedGrasslands");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EntryError, MalformedReason};

/// Vehicle situation an experiment result was recorded in.
///
/// Serializes as its save-format token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Situation {
    SrfLanded,
    SrfSplashed,
    FlyingLow,
    FlyingHigh,
    InSpaceLow,
    InSpaceHigh,
}

impl Situation {
    /// Order in which the decoder looks for tokens. A token that could be
    /// confused with another must be listed before it.
    pub const DECODE_ORDER: [Situation; 6] = [
        Situation::SrfSplashed,
        Situation::SrfLanded,
        Situation::FlyingLow,
        Situation::FlyingHigh,
        Situation::InSpaceLow,
        Situation::InSpaceHigh,
    ];

    /// All situations in declaration order.
    pub fn all() -> &'static [Situation] {
        &[
            Situation::SrfLanded,
            Situation::SrfSplashed,
            Situation::FlyingLow,
            Situation::FlyingHigh,
            Situation::InSpaceLow,
            Situation::InSpaceHigh,
        ]
    }

    /// Exact token used inside save identifiers.
    pub fn token(self) -> &'static str {
        match self {
            Situation::SrfLanded => "SrfLanded",
            Situation::SrfSplashed => "SrfSplashed",
            Situation::FlyingLow => "FlyingLow",
            Situation::FlyingHigh => "FlyingHigh",
            Situation::InSpaceLow => "InSpaceLow",
            Situation::InSpaceHigh => "InSpaceHigh",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Situation::SrfLanded => "Surface (Landed)",
            Situation::SrfSplashed => "Surface (Splashed)",
            Situation::FlyingLow => "Flying (Low)",
            Situation::FlyingHigh => "Flying (High)",
            Situation::InSpaceLow => "Space (Low)",
            Situation::InSpaceHigh => "Space (High)",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.token() == token)
    }

    /// First situation token (in decode priority) contained in `text`.
    pub fn find_in(text: &str) -> Option<(Situation, usize)> {
        Self::DECODE_ORDER
            .iter()
            .find_map(|s| text.find(s.token()).map(|start| (*s, start)))
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Composite key of one experiment/body/situation/biome combination.
///
/// The canonical encoding is built once at construction and the four
/// fields are slices of it. Equality, ordering and hashing use only the
/// encoding, so two ids are equal iff they encode identically.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExperimentId {
    key: String,
    /// Byte offset of the `@`.
    type_end: usize,
    /// Byte offset where the situation token starts.
    body_end: usize,
    situation: Situation,
}

impl ExperimentId {
    /// Build an id from its fields. An empty biome is treated as absent.
    ///
    /// Fields are not checked for `@` or embedded situation tokens; such
    /// names are rejected when reference tables are loaded instead.
    pub fn new(
        experiment_type: &str,
        body: &str,
        situation: Situation,
        biome: Option<&str>,
    ) -> Self {
        let biome = biome.filter(|b| !b.is_empty()).unwrap_or("");
        let token = situation.token();
        let len = experiment_type.len() + 1 + body.len() + token.len() + biome.len();
        let mut key = String::with_capacity(len);
        key.push_str(experiment_type);
        key.push('@');
        key.push_str(body);
        key.push_str(token);
        key.push_str(biome);
        Self {
            key,
            type_end: experiment_type.len(),
            body_end: experiment_type.len() + 1 + body.len(),
            situation,
        }
    }

    /// Parse a save-format identifier.
    pub fn decode(raw: &str) -> Result<Self, EntryError> {
        let (experiment_type, location) = raw
            .split_once('@')
            .ok_or_else(|| EntryError::malformed(raw, MalformedReason::MissingSeparator))?;
        if experiment_type.is_empty() {
            return Err(EntryError::malformed(raw, MalformedReason::EmptyType));
        }

        let (situation, start) = Situation::find_in(location)
            .ok_or_else(|| EntryError::malformed(raw, MalformedReason::UnknownSituation))?;
        if start == 0 {
            return Err(EntryError::malformed(raw, MalformedReason::EmptyBody));
        }

        Ok(Self {
            key: raw.to_string(),
            type_end: experiment_type.len(),
            body_end: experiment_type.len() + 1 + start,
            situation,
        })
    }

    /// Canonical save-format encoding.
    pub fn encode(&self) -> &str {
        &self.key
    }

    pub fn experiment_type(&self) -> &str {
        &self.key[..self.type_end]
    }

    pub fn body(&self) -> &str {
        &self.key[self.type_end + 1..self.body_end]
    }

    pub fn situation(&self) -> Situation {
        self.situation
    }

    pub fn biome(&self) -> Option<&str> {
        let start = self.body_end + self.situation.token().len();
        if start >= self.key.len() {
            None
        } else {
            Some(&self.key[start..])
        }
    }
}

impl PartialEq for ExperimentId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ExperimentId {}

impl Hash for ExperimentId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for ExperimentId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExperimentId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Debug for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExperimentId").field(&self.key).finish()
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl FromStr for ExperimentId {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl TryFrom<String> for ExperimentId {
    type Error = EntryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::decode(&value)
    }
}

impl From<ExperimentId> for String {
    fn from(id: ExperimentId) -> Self {
        id.key
    }
}

impl AsRef<str> for ExperimentId {
    fn as_ref(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn parts(id: &ExperimentId) -> (&str, &str, Situation, Option<&str>) {
        (id.experiment_type(), id.body(), id.situation(), id.biome())
    }

    #[test]
    fn decodes_save_identifiers() {
        let cases = [
            (
                "crewReport@KerbinSrfLandedGrasslands",
                ("crewReport", "Kerbin", Situation::SrfLanded, Some("Grasslands")),
            ),
            (
                "evaReport@MunSrfLanded",
                ("evaReport", "Mun", Situation::SrfLanded, None),
            ),
            (
                "temperatureScan@EveInSpaceHigh",
                ("temperatureScan", "Eve", Situation::InSpaceHigh, None),
            ),
            (
                "surfaceSample@DunaSrfLandedHighlands",
                ("surfaceSample", "Duna", Situation::SrfLanded, Some("Highlands")),
            ),
            (
                "mysteryGoo@LaytheFlyingLow",
                ("mysteryGoo", "Laythe", Situation::FlyingLow, None),
            ),
            (
                "atmosphereAnalysis@JoolFlyingHighShores",
                ("atmosphereAnalysis", "Jool", Situation::FlyingHigh, Some("Shores")),
            ),
        ];
        for (raw, expected) in cases {
            let id = ExperimentId::decode(raw).unwrap();
            assert_eq!(parts(&id), expected, "decoding {raw}");
            assert_eq!(id.encode(), raw);
        }
    }

    #[test]
    fn missing_separator_is_malformed() {
        let err = ExperimentId::decode("crewReportKerbinSrfLanded").unwrap_err();
        assert_eq!(
            err,
            EntryError::MalformedIdentifier {
                raw: "crewReportKerbinSrfLanded".into(),
                reason: MalformedReason::MissingSeparator,
            }
        );
    }

    #[test]
    fn unknown_situation_is_malformed() {
        let err = ExperimentId::decode("crewReport@KerbinOrbiting").unwrap_err();
        assert!(matches!(
            err,
            EntryError::MalformedIdentifier {
                reason: MalformedReason::UnknownSituation,
                ..
            }
        ));
    }

    #[test]
    fn empty_body_and_type_are_malformed() {
        let body = ExperimentId::decode("crewReport@SrfLandedGrasslands").unwrap_err();
        assert!(matches!(
            body,
            EntryError::MalformedIdentifier {
                reason: MalformedReason::EmptyBody,
                ..
            }
        ));
        let ty = ExperimentId::decode("@KerbinSrfLanded").unwrap_err();
        assert!(matches!(
            ty,
            EntryError::MalformedIdentifier {
                reason: MalformedReason::EmptyType,
                ..
            }
        ));
    }

    #[test]
    fn token_priority_beats_position() {
        // FlyingLow occurs earlier in the string, but SrfSplashed is checked
        // first, so everything before it becomes the body.
        let id = ExperimentId::decode("goo@XFlyingLowSrfSplashedY").unwrap();
        assert_eq!(id.situation(), Situation::SrfSplashed);
        assert_eq!(id.body(), "XFlyingLow");
        assert_eq!(id.biome(), Some("Y"));
    }

    #[test]
    fn empty_biome_is_absent() {
        let id = ExperimentId::new("evaReport", "Mun", Situation::SrfLanded, Some(""));
        assert_eq!(id.biome(), None);
        assert_eq!(id.encode(), "evaReport@MunSrfLanded");
    }

    #[test]
    fn equality_follows_encoding() {
        let built = ExperimentId::new("crewReport", "Kerbin", Situation::SrfLanded, Some("Shores"));
        let parsed: ExperimentId = "crewReport@KerbinSrfLandedShores".parse().unwrap();
        assert_eq!(built, parsed);

        let mut set = HashSet::new();
        set.insert(built);
        assert!(!set.insert(parsed));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn serializes_as_encoded_string() {
        let id = ExperimentId::new("seismicScan", "Duna", Situation::SrfLanded, Some("Poles"));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"seismicScan@DunaSrfLandedPoles\"");
        let back: ExperimentId = serde_json::from_str(&json).unwrap();
        assert_eq!(parts(&back), parts(&id));
        assert!(serde_json::from_str::<ExperimentId>("\"seismicScan\"").is_err());
    }

    #[test]
    fn every_token_round_trips() {
        for &situation in Situation::all() {
            assert_eq!(Situation::from_token(situation.token()), Some(situation));
            let id = ExperimentId::new("barometerScan", "Eve", situation, None);
            let back = ExperimentId::decode(id.encode()).unwrap();
            assert_eq!(back.situation(), situation);
            assert_eq!(back.body(), "Eve");
        }
    }
}
