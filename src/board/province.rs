//! Province and coast definitions.
//!
//! Provinces are loaded from a map definition and never change afterwards.
//! Display coordinates are fractions of the map image in [0, 1].

use serde::{Deserialize, Serialize};

use super::unit::UnitType;

/// A landing sub-point of a province, used to disambiguate fleet movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coast {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Fleets placed in this province at game start stand on this coast.
    #[serde(default)]
    pub fleet_start: bool,
}

/// A named region of the map; the unit of territorial control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Province {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub supply_center: bool,
    #[serde(default)]
    pub water: bool,
    /// Ordered coasts. Empty means the single implicit "no coast" point.
    #[serde(default)]
    pub coasts: Vec<Coast>,
    /// Unit placed here when a game starts.
    #[serde(default, rename = "unit")]
    pub start_unit: Option<UnitType>,
}

impl Province {
    /// Returns true if fleets land on named coasts here.
    pub fn has_coasts(&self) -> bool {
        !self.coasts.is_empty()
    }

    /// Returns true for provinces that are neither water nor coastal.
    pub fn is_landlocked(&self) -> bool {
        !self.water && self.coasts.is_empty()
    }

    /// Looks up a coast by id.
    pub fn coast(&self, id: &str) -> Option<&Coast> {
        self.coasts.iter().find(|c| c.id == id)
    }

    /// Returns true if `coast` is a landing point of this province.
    /// The empty coast is always valid.
    pub fn has_landing(&self, coast: &str) -> bool {
        coast.is_empty() || self.coast(coast).is_some()
    }

    /// Returns the coast a starting fleet occupies: the first coast flagged
    /// as a fleet start, else the first coast, else none.
    pub fn start_coast(&self) -> &str {
        self.coasts
            .iter()
            .find(|c| c.fleet_start)
            .or_else(|| self.coasts.first())
            .map(|c| c.id.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spain() -> Province {
        Province {
            id: "spa".to_string(),
            name: "Spain".to_string(),
            x: 0.2,
            y: 0.8,
            supply_center: true,
            water: false,
            coasts: vec![
                Coast { id: "nc".to_string(), x: 0.2, y: 0.7, fleet_start: false },
                Coast { id: "sc".to_string(), x: 0.2, y: 0.9, fleet_start: true },
            ],
            start_unit: None,
        }
    }

    #[test]
    fn coast_lookup() {
        let spa = spain();
        assert!(spa.has_coasts());
        assert!(spa.coast("nc").is_some());
        assert!(spa.coast("ec").is_none());
        assert!(spa.has_landing(""));
        assert!(!spa.has_landing("ec"));
    }

    #[test]
    fn start_coast_prefers_flagged_coast() {
        let mut spa = spain();
        assert_eq!(spa.start_coast(), "sc");
        spa.coasts[1].fleet_start = false;
        assert_eq!(spa.start_coast(), "nc");
        spa.coasts.clear();
        assert_eq!(spa.start_coast(), "");
        assert!(spa.is_landlocked());
    }

    #[test]
    fn province_deserializes_defaults() {
        let p: Province =
            serde_json::from_str(r#"{"id":"mun","name":"Munich","supplyCenter":true}"#).unwrap();
        assert!(p.supply_center);
        assert!(!p.water);
        assert!(p.coasts.is_empty());
        assert_eq!(p.start_unit, None);
    }
}
