//! Map graph: provinces, routes, countries and player configurations.
//!
//! A `Map` is built once from a map definition document and is immutable
//! afterwards. Construction validates every cross reference, so lookups on a
//! loaded map only fail when a caller asks for an id that was never defined.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::adjacency::{AdjacencyIndex, Edge, Route};
use super::province::Province;

/// Errors raised while loading or querying a map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid map definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown province '{0}'")]
    UnknownProvince(String),

    #[error("unknown coast '{coast}' on province '{province}'")]
    UnknownCoast { province: String, coast: String },

    #[error("unknown country '{0}'")]
    UnknownCountry(String),

    #[error("duplicate province '{0}'")]
    DuplicateProvince(String),

    #[error("duplicate coast '{coast}' on province '{province}'")]
    DuplicateCoast { province: String, coast: String },

    #[error("duplicate country '{0}'")]
    DuplicateCountry(String),
}

/// A playable country as described by the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapCountry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub home_centers: Vec<String>,
}

/// Country grouping rule for one seated-player count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerConfiguration {
    /// Countries removed from play.
    #[serde(default)]
    pub eliminated: Vec<String>,
    /// Sets of countries merged under a single player.
    #[serde(default)]
    pub combine: Vec<Vec<String>>,
    /// Eliminated countries still place their starting units as neutrals.
    #[serde(default)]
    pub neutral_units: bool,
}

/// The raw map definition document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    /// Year of the first turn.
    pub date: u32,
    /// Supply centers needed to win.
    pub victory: u32,
    pub provinces: Vec<Province>,
    pub routes: Vec<Route>,
    pub countries: Vec<MapCountry>,
    #[serde(default)]
    pub player_configurations: BTreeMap<u32, PlayerConfiguration>,
}

/// A loaded, validated map graph.
#[derive(Debug, Clone)]
pub struct Map {
    pub id: String,
    pub name: String,
    pub image: String,
    pub date: u32,
    pub victory: u32,
    provinces: Vec<Province>,
    province_index: HashMap<String, usize>,
    countries: Vec<MapCountry>,
    configurations: BTreeMap<u32, PlayerConfiguration>,
    adjacency: AdjacencyIndex,
}

impl Map {
    /// Parses and validates a map definition from JSON.
    pub fn from_json(json: &str) -> Result<Map, MapError> {
        let definition: MapDefinition = serde_json::from_str(json)?;
        Map::from_definition(definition)
    }

    /// Validates a map definition and builds the route index.
    pub fn from_definition(definition: MapDefinition) -> Result<Map, MapError> {
        let mut province_index = HashMap::with_capacity(definition.provinces.len());
        for (i, province) in definition.provinces.iter().enumerate() {
            if province_index.insert(province.id.clone(), i).is_some() {
                return Err(MapError::DuplicateProvince(province.id.clone()));
            }
            let mut seen = HashSet::new();
            for coast in &province.coasts {
                if coast.id.is_empty() || !seen.insert(coast.id.as_str()) {
                    return Err(MapError::DuplicateCoast {
                        province: province.id.clone(),
                        coast: coast.id.clone(),
                    });
                }
            }
        }

        let check_endpoint = |p: &str, c: &str| -> Result<(), MapError> {
            let idx = province_index
                .get(p)
                .ok_or_else(|| MapError::UnknownProvince(p.to_string()))?;
            if !definition.provinces[*idx].has_landing(c) {
                return Err(MapError::UnknownCoast {
                    province: p.to_string(),
                    coast: c.to_string(),
                });
            }
            Ok(())
        };
        for route in &definition.routes {
            check_endpoint(&route.p0, &route.c0)?;
            check_endpoint(&route.p1, &route.c1)?;
        }

        let mut country_ids = HashSet::new();
        for country in &definition.countries {
            if !country_ids.insert(country.id.as_str()) {
                return Err(MapError::DuplicateCountry(country.id.clone()));
            }
            for home in &country.home_centers {
                if !province_index.contains_key(home) {
                    return Err(MapError::UnknownProvince(home.clone()));
                }
            }
        }
        for configuration in definition.player_configurations.values() {
            let referenced = configuration
                .eliminated
                .iter()
                .chain(configuration.combine.iter().flatten());
            for id in referenced {
                if !country_ids.contains(id.as_str()) {
                    return Err(MapError::UnknownCountry(id.clone()));
                }
            }
        }

        Ok(Map {
            id: definition.id,
            name: definition.name,
            image: definition.image,
            date: definition.date,
            victory: definition.victory,
            provinces: definition.provinces,
            province_index,
            countries: definition.countries,
            configurations: definition.player_configurations,
            adjacency: AdjacencyIndex::new(definition.routes),
        })
    }

    /// Returns all provinces in definition order.
    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    /// Resolves a province that must exist.
    pub fn province(&self, id: &str) -> Result<&Province, MapError> {
        self.find_province(id)
            .ok_or_else(|| MapError::UnknownProvince(id.to_string()))
    }

    /// Resolves a province, returning `None` when it is not on the map.
    pub fn find_province(&self, id: &str) -> Option<&Province> {
        self.province_index.get(id).map(|&i| &self.provinces[i])
    }

    /// Returns true if the province exists and is water.
    pub fn is_water(&self, id: &str) -> bool {
        self.find_province(id).map(|p| p.water).unwrap_or(false)
    }

    pub fn routes(&self) -> &[Route] {
        self.adjacency.routes()
    }

    pub fn countries(&self) -> &[MapCountry] {
        &self.countries
    }

    pub fn country(&self, id: &str) -> Option<&MapCountry> {
        self.countries.iter().find(|c| c.id == id)
    }

    /// Returns the configuration for a seated-player count, if the map has one.
    pub fn configuration(&self, players: u32) -> Option<&PlayerConfiguration> {
        self.configurations.get(&players)
    }

    pub fn configurations(&self) -> &BTreeMap<u32, PlayerConfiguration> {
        &self.configurations
    }

    /// Returns true if a route joins `(p0, c0)` and `(p1, c1)`.
    pub fn adjacent(&self, p0: &str, c0: &str, p1: &str, c1: &str) -> bool {
        self.adjacency.is_adjacent(p0, c0, p1, c1)
    }

    /// Returns every route leaving exactly `(province, coast)`.
    pub fn edges_from<'a>(
        &'a self,
        province: &str,
        coast: &'a str,
    ) -> impl Iterator<Item = Edge<'a>> + 'a {
        self.adjacency.edges_from(province, coast)
    }

    /// Returns the provinces adjacent to `province` at any coast.
    pub fn neighbours(&self, province: &str) -> Vec<&str> {
        self.adjacency.neighbours(province)
    }

    /// Returns the asset directory of this map under `root`.
    pub fn asset_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.id)
    }

    /// Returns the path of the map image under `root`.
    pub fn image_path(&self, root: &Path) -> PathBuf {
        self.asset_dir(root).join(&self.image)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small map used across module tests.
    ///
    /// ```text
    ///   bre(coast) ── mao(water) ── spa(coast: nc, sc)
    ///      │            │   ╲
    ///   par(land) ── gas(coast) ── wes(water) ── naf(coast)
    /// ```
    pub(crate) const SMALL_MAP: &str = r##"{
        "id": "small",
        "name": "Small",
        "image": "small.svg",
        "date": 1901,
        "victory": 4,
        "provinces": [
            {"id": "bre", "name": "Brest", "supplyCenter": true, "coasts": [{"id": "c"}], "unit": 1},
            {"id": "par", "name": "Paris", "supplyCenter": true, "unit": 0},
            {"id": "gas", "name": "Gascony", "coasts": [{"id": "c"}]},
            {"id": "spa", "name": "Spain", "supplyCenter": true,
             "coasts": [{"id": "nc"}, {"id": "sc", "fleetStart": true}], "unit": 1},
            {"id": "naf", "name": "North Africa", "supplyCenter": true, "coasts": [{"id": "c"}], "unit": 0},
            {"id": "mao", "name": "Mid-Atlantic Ocean", "water": true},
            {"id": "wes", "name": "Western Mediterranean", "water": true}
        ],
        "routes": [
            {"p0": "bre", "p1": "par"},
            {"p0": "bre", "p1": "gas"},
            {"p0": "par", "p1": "gas"},
            {"p0": "gas", "p1": "spa"},
            {"p0": "bre", "c0": "c", "p1": "mao", "water": true},
            {"p0": "bre", "c0": "c", "p1": "gas", "c1": "c", "water": true},
            {"p0": "gas", "c0": "c", "p1": "mao", "water": true},
            {"p0": "gas", "c0": "c", "p1": "spa", "c1": "nc", "water": true},
            {"p0": "mao", "p1": "spa", "c1": "nc", "water": true},
            {"p0": "mao", "p1": "spa", "c1": "sc", "water": true},
            {"p0": "mao", "p1": "wes", "water": true},
            {"p0": "wes", "p1": "spa", "c1": "sc", "water": true},
            {"p0": "wes", "p1": "naf", "c1": "c", "water": true},
            {"p0": "mao", "p1": "naf", "c1": "c", "water": true}
        ],
        "countries": [
            {"id": "fra", "name": "France", "color": "#3366ff", "homeCenters": ["bre", "par"]},
            {"id": "spn", "name": "Spain", "color": "#ffcc00", "homeCenters": ["spa"]},
            {"id": "mor", "name": "Morocco", "color": "#33aa33", "homeCenters": ["naf"]}
        ],
        "playerConfigurations": {
            "2": {"eliminated": ["mor"], "combine": [["spn", "fra"]], "neutralUnits": true},
            "1": {"eliminated": ["spn", "mor"]}
        }
    }"##;

    pub(crate) fn small_map() -> Map {
        Map::from_json(SMALL_MAP).unwrap()
    }

    #[test]
    fn loads_small_map() {
        let map = small_map();
        assert_eq!(map.provinces().len(), 7);
        assert_eq!(map.routes().len(), 14);
        assert_eq!(map.countries().len(), 3);
        assert_eq!(map.country("fra").map(|c| c.color.as_str()), Some("#3366ff"));
        assert_eq!(map.country("mor").map(|c| c.color.as_str()), Some("#33aa33"));
        assert!(map.configuration(2).is_some());
        assert!(map.configuration(3).is_none());
    }

    #[test]
    fn unknown_province_lookup_fails() {
        let map = small_map();
        assert!(map.province("bre").is_ok());
        let err = map.province("xyz").unwrap_err();
        assert!(matches!(err, MapError::UnknownProvince(ref id) if id == "xyz"));
        assert!(map.find_province("xyz").is_none());
    }

    #[test]
    fn adjacency_queryable_from_either_endpoint() {
        let map = small_map();
        for r in map.routes() {
            assert_eq!(
                map.adjacent(&r.p0, &r.c0, &r.p1, &r.c1),
                map.adjacent(&r.p1, &r.c1, &r.p0, &r.c0)
            );
        }
        assert!(map.adjacent("spa", "sc", "wes", ""));
        assert!(!map.adjacent("spa", "nc", "wes", ""));
    }

    #[test]
    fn rejects_route_to_unknown_province() {
        let json = SMALL_MAP.replace(r#"{"p0": "bre", "p1": "par"}"#, r#"{"p0": "bre", "p1": "lon"}"#);
        let err = Map::from_json(&json).unwrap_err();
        assert!(matches!(err, MapError::UnknownProvince(ref id) if id == "lon"));
    }

    #[test]
    fn rejects_route_to_unknown_coast() {
        let json = SMALL_MAP.replace(r#""c1": "nc", "water": true}"#, r#""c1": "ec", "water": true}"#);
        let err = Map::from_json(&json).unwrap_err();
        assert!(matches!(err, MapError::UnknownCoast { .. }));
    }

    #[test]
    fn rejects_unknown_country_in_configuration() {
        let json = SMALL_MAP.replace(r#""eliminated": ["mor"]"#, r#""eliminated": ["rus"]"#);
        let err = Map::from_json(&json).unwrap_err();
        assert!(matches!(err, MapError::UnknownCountry(ref id) if id == "rus"));
    }

    #[test]
    fn asset_paths_join_map_id() {
        let map = small_map();
        let root = Path::new("maps");
        assert_eq!(map.asset_dir(root), PathBuf::from("maps/small"));
        assert_eq!(map.image_path(root), PathBuf::from("maps/small/small.svg"));
    }
}
