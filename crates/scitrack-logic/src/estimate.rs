//! Value estimation for experiments with no recorded progress.
//!
//! Real science values depend on situation and body multipliers and on
//! transmission penalties. None of that is modelled here: the default
//! [`BaseValueTable`] is a flat per-type lookup. Anything implementing
//! [`ValueEstimator`] (including a plain closure) can replace it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Value returned for types missing from a [`BaseValueTable`].
pub const FALLBACK_VALUE: f64 = 10.0;

/// Estimated science available from an untouched experiment type.
pub trait ValueEstimator {
    fn estimate(&self, experiment_type: &str) -> f64;
}

impl<F> ValueEstimator for F
where
    F: Fn(&str) -> f64,
{
    fn estimate(&self, experiment_type: &str) -> f64 {
        self(experiment_type)
    }
}

/// Flat base value per experiment type.
///
/// Deserialized values are overrides: keys not listed keep their stock
/// value, and `fallback` defaults to [`FALLBACK_VALUE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BaseValueOverrides")]
pub struct BaseValueTable {
    pub values: BTreeMap<String, f64>,
    pub fallback: f64,
}

#[derive(Deserialize)]
struct BaseValueOverrides {
    #[serde(default)]
    values: BTreeMap<String, f64>,
    #[serde(default = "default_fallback")]
    fallback: f64,
}

fn default_fallback() -> f64 {
    FALLBACK_VALUE
}

impl From<BaseValueOverrides> for BaseValueTable {
    fn from(overrides: BaseValueOverrides) -> Self {
        let mut table = Self::default();
        table.values.extend(overrides.values);
        table.fallback = overrides.fallback;
        table
    }
}

impl Default for BaseValueTable {
    fn default() -> Self {
        let values = [
            ("crewReport", 5.0),
            ("evaReport", 8.0),
            ("surfaceSample", 30.0),
            ("temperatureScan", 8.0),
            ("barometerScan", 12.0),
            ("seismicScan", 20.0),
            ("gravityScan", 20.0),
            ("atmosphereAnalysis", 12.0),
            ("asteroidSample", 70.0),
            ("mysteryGoo", 10.0),
            ("mobileMaterialsLab", 25.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self {
            values,
            fallback: FALLBACK_VALUE,
        }
    }
}

impl ValueEstimator for BaseValueTable {
    fn estimate(&self, experiment_type: &str) -> f64 {
        self.values
            .get(experiment_type)
            .copied()
            .unwrap_or(self.fallback)
    }
}
