//! Tunables for a reconciliation pass.
//!
//! Every field has a default, so a settings file only needs the parts it
//! changes:
//!
//! ```
//! use scitrack_logic::settings::Settings;
//! use scitrack_logic::estimate::ValueEstimator;
//!
//! let s = Settings::from_json(r#"{ "restrictions": [] }"#).unwrap();
//! assert!(s.restrictions.allows("asteroidSample", "Kerbin"));
//! assert_eq!(s.base_values.estimate("surfaceSample"), 30.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::estimate::BaseValueTable;
use crate::generator::BodyRestrictions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Estimated value of untouched experiments. Listed types override the
    /// stock values; the rest are kept.
    pub base_values: BaseValueTable,
    /// Experiment types limited to specific bodies.
    pub restrictions: BodyRestrictions,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::ValueEstimator;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn base_value_overrides_keep_stock_values() {
        let s = Settings::from_json(r#"{ "base_values": { "values": { "crewReport": 6 } } }"#)
            .unwrap();
        assert_eq!(s.base_values.estimate("crewReport"), 6.0);
        assert_eq!(s.base_values.estimate("evaReport"), 8.0);
        assert_eq!(s.restrictions, BodyRestrictions::default());
    }

    #[test]
    fn restrictions_deserialize_as_list() {
        let s = Settings::from_json(
            r#"{ "restrictions": [
                { "experiment_type": "asteroidSample", "only_body": "Dres" }
            ] }"#,
        )
        .unwrap();
        assert!(s.restrictions.allows("asteroidSample", "Dres"));
        assert!(!s.restrictions.allows("asteroidSample", "Sun"));
    }
}
