//! Per-turn game state.
//!
//! A `TurnState` is one snapshot in a game's history: where every nation's
//! units stand, which supply centers they own, the orders submitted so far,
//! and any retreat or build obligations of the phase.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::map::Map;
use super::order::{Order, OrderEntry};
use super::unit::{Unit, UnitType};

/// The season of a game turn. Serialized as its wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Season {
    Spring,
    Fall,
}

impl TryFrom<i32> for Season {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Season::Spring),
            1 => Ok(Season::Fall),
            other => Err(format!("unknown season code {}", other)),
        }
    }
}

impl From<Season> for i32 {
    fn from(season: Season) -> i32 {
        match season {
            Season::Spring => 0,
            Season::Fall => 1,
        }
    }
}

/// The phase within a game turn. Serialized as its wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Phase {
    CountryClaiming,
    OrderWriting,
    Retreating,
    CreatingDisbanding,
    Finished,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Phase::CountryClaiming => "countryClaiming",
            Phase::OrderWriting => "orderWriting",
            Phase::Retreating => "retreating",
            Phase::CreatingDisbanding => "creatingDisbanding",
            Phase::Finished => "finished",
        }
    }
}

impl TryFrom<i32> for Phase {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(Phase::CountryClaiming),
            0 => Ok(Phase::OrderWriting),
            1 => Ok(Phase::Retreating),
            2 => Ok(Phase::CreatingDisbanding),
            3 => Ok(Phase::Finished),
            other => Err(format!("unknown phase code {}", other)),
        }
    }
}

impl From<Phase> for i32 {
    fn from(phase: Phase) -> i32 {
        match phase {
            Phase::CountryClaiming => -1,
            Phase::OrderWriting => 0,
            Phase::Retreating => 1,
            Phase::CreatingDisbanding => 2,
            Phase::Finished => 3,
        }
    }
}

/// A nation's holdings during one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nation {
    pub id: String,
    #[serde(default)]
    pub neutral: bool,
    #[serde(default)]
    pub supply_centers: Vec<String>,
    #[serde(default)]
    pub units: Vec<Unit>,
    /// Pending builds (positive) or disbands (negative) of an adjustment phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<i32>,
}

impl Nation {
    pub fn new(id: &str) -> Self {
        Nation {
            id: id.to_string(),
            neutral: false,
            supply_centers: Vec::new(),
            units: Vec::new(),
            adjustment: None,
        }
    }

    pub fn owns_center(&self, province: &str) -> bool {
        self.supply_centers.iter().any(|c| c == province)
    }
}

/// A unit forced out of its province, awaiting a retreat order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dislodgement {
    pub nation: String,
    pub unit: Unit,
    /// Province the successful attack came from.
    pub attacker: String,
}

/// Complete state of one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnState {
    pub date: u32,
    pub season: Season,
    pub phase: Phase,
    pub nations: BTreeMap<String, Nation>,
    /// Submitted orders: nation -> acting province -> order.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub orders: BTreeMap<String, BTreeMap<String, OrderEntry>>,
    /// Retreat obligations keyed by the province the unit was dislodged from.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub retreats: BTreeMap<String, Dislodgement>,
    /// Build, disband and pass orders per nation.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub adjustments: BTreeMap<String, Vec<OrderEntry>>,
}

impl TurnState {
    /// Creates a turn with no nations, units or orders.
    pub fn empty(date: u32, season: Season, phase: Phase) -> Self {
        TurnState {
            date,
            season,
            phase,
            nations: BTreeMap::new(),
            orders: BTreeMap::new(),
            retreats: BTreeMap::new(),
            adjustments: BTreeMap::new(),
        }
    }

    /// Builds the opening turn of a map for the given seated-player count.
    ///
    /// Each country owns its home centers and gets the starting units marked
    /// on them. Countries eliminated by the player configuration are neutral
    /// and keep their units only when the configuration allows neutral units.
    pub fn initial(map: &Map, players: u32) -> Self {
        let mut turn = TurnState::empty(map.date, Season::Spring, Phase::OrderWriting);
        let configuration = map.configuration(players);

        for country in map.countries() {
            let eliminated = configuration
                .map(|c| c.eliminated.contains(&country.id))
                .unwrap_or(false);
            let places_units = !eliminated || configuration.map(|c| c.neutral_units).unwrap_or(false);

            let mut nation = Nation::new(&country.id);
            nation.neutral = eliminated;
            nation.supply_centers = country.home_centers.clone();
            if places_units {
                for home in &country.home_centers {
                    let Some(province) = map.find_province(home) else {
                        continue;
                    };
                    match province.start_unit {
                        Some(UnitType::Army) => nation.units.push(Unit::army(&province.id)),
                        Some(UnitType::Fleet) => nation
                            .units
                            .push(Unit::fleet(&province.id, province.start_coast())),
                        None => {}
                    }
                }
            }
            turn.nations.insert(country.id.clone(), nation);
        }

        turn
    }

    /// Places a unit for a nation. Returns false if the province is already occupied.
    pub fn place_unit(&mut self, nation: &str, unit: Unit) -> bool {
        if self.unit_at(&unit.province).is_some() {
            return false;
        }
        self.nations
            .entry(nation.to_string())
            .or_insert_with(|| Nation::new(nation))
            .units
            .push(unit);
        true
    }

    /// Removes the unit at a province, returning it with its owner.
    pub fn remove_unit(&mut self, province: &str) -> Option<(String, Unit)> {
        for nation in self.nations.values_mut() {
            if let Some(i) = nation.units.iter().position(|u| u.province == province) {
                return Some((nation.id.clone(), nation.units.remove(i)));
            }
        }
        None
    }

    /// Gives a supply center to a nation, taking it from any previous owner.
    pub fn set_supply_center(&mut self, nation: &str, province: &str) {
        for other in self.nations.values_mut() {
            other.supply_centers.retain(|c| c != province);
        }
        self.nations
            .entry(nation.to_string())
            .or_insert_with(|| Nation::new(nation))
            .supply_centers
            .push(province.to_string());
    }

    /// Records a retreat obligation.
    pub fn set_dislodged(&mut self, province: &str, dislodgement: Dislodgement) {
        self.retreats.insert(province.to_string(), dislodgement);
    }

    pub fn nation(&self, id: &str) -> Option<&Nation> {
        self.nations.get(id)
    }

    /// Returns every unit on the board with its owner, in nation order.
    pub fn units(&self) -> impl Iterator<Item = (&str, &Unit)> {
        self.nations
            .values()
            .flat_map(|n| n.units.iter().map(move |u| (n.id.as_str(), u)))
    }

    /// Returns the unit occupying a province and its owner, if any.
    pub fn unit_at(&self, province: &str) -> Option<(&str, &Unit)> {
        self.units().find(|(_, u)| u.province == province)
    }

    /// Returns true if a fleet occupies the province.
    pub fn has_fleet(&self, province: &str) -> bool {
        matches!(self.unit_at(province), Some((_, u)) if u.is_fleet())
    }

    /// Returns true if an army occupies the province.
    pub fn has_army(&self, province: &str) -> bool {
        matches!(self.unit_at(province), Some((_, u)) if u.is_army())
    }

    /// Returns the nation owning a supply center.
    pub fn center_owner(&self, province: &str) -> Option<&str> {
        self.nations
            .values()
            .find(|n| n.owns_center(province))
            .map(|n| n.id.as_str())
    }

    /// Returns the pending adjustment of a nation: the recorded delta if
    /// present, else owned centers minus units.
    pub fn pending_adjustment(&self, nation: &str) -> i32 {
        match self.nations.get(nation) {
            Some(n) => n
                .adjustment
                .unwrap_or(n.supply_centers.len() as i32 - n.units.len() as i32),
            None => 0,
        }
    }

    /// Stores a movement or retreat order, replacing any earlier order for
    /// the same province. `Cancel` withdraws the stored order instead.
    pub fn select_order(&mut self, nation: &str, order: Order) {
        let province = order.province().to_string();
        if let Order::Cancel { .. } = order {
            if let Some(by_province) = self.orders.get_mut(nation) {
                by_province.remove(&province);
            }
            return;
        }
        self.orders
            .entry(nation.to_string())
            .or_default()
            .insert(province, OrderEntry::unprocessed(order));
    }

    /// Appends a build, disband or pass order.
    pub fn push_adjustment(&mut self, nation: &str, order: Order) {
        self.adjustments
            .entry(nation.to_string())
            .or_default()
            .push(OrderEntry::unprocessed(order));
    }

    /// Returns the order selected for a province, if any.
    pub fn selected(&self, nation: &str, province: &str) -> Option<&Order> {
        self.orders
            .get(nation)
            .and_then(|m| m.get(province))
            .map(|e| &e.order)
    }

    /// Returns true if an order with this id is currently selected.
    pub fn is_selected(&self, nation: &str, id: &str) -> bool {
        let in_orders = self
            .orders
            .get(nation)
            .map(|m| m.values().any(|e| e.order.id() == id))
            .unwrap_or(false);
        in_orders
            || self
                .adjustments
                .get(nation)
                .map(|v| v.iter().any(|e| e.order.id() == id))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::map::tests::small_map;

    #[test]
    fn enum_codes_roundtrip() {
        for p in [
            Phase::CountryClaiming,
            Phase::OrderWriting,
            Phase::Retreating,
            Phase::CreatingDisbanding,
            Phase::Finished,
        ] {
            assert_eq!(Phase::try_from(i32::from(p)), Ok(p));
        }
        assert!(Phase::try_from(4).is_err());
        assert_eq!(Season::try_from(1), Ok(Season::Fall));
        assert!(Season::try_from(2).is_err());
    }

    #[test]
    fn empty_state_has_no_units() {
        let state = TurnState::empty(1901, Season::Spring, Phase::OrderWriting);
        assert_eq!(state.units().count(), 0);
        assert!(state.unit_at("par").is_none());
    }

    #[test]
    fn place_unit_rejects_duplicate() {
        let mut state = TurnState::empty(1901, Season::Spring, Phase::OrderWriting);
        assert!(state.place_unit("fra", Unit::army("par")));
        assert!(!state.place_unit("spn", Unit::army("par")));
        assert_eq!(state.unit_at("par").map(|(n, _)| n), Some("fra"));
        assert!(state.has_army("par"));
        assert!(!state.has_fleet("par"));
    }

    #[test]
    fn remove_unit_returns_owner() {
        let mut state = TurnState::empty(1901, Season::Spring, Phase::OrderWriting);
        state.place_unit("fra", Unit::fleet("mao", ""));
        let (nation, unit) = state.remove_unit("mao").unwrap();
        assert_eq!(nation, "fra");
        assert!(unit.is_fleet());
        assert!(state.remove_unit("mao").is_none());
    }

    #[test]
    fn supply_center_changes_hands() {
        let mut state = TurnState::empty(1901, Season::Fall, Phase::CreatingDisbanding);
        state.set_supply_center("fra", "spa");
        assert_eq!(state.center_owner("spa"), Some("fra"));
        state.set_supply_center("spn", "spa");
        assert_eq!(state.center_owner("spa"), Some("spn"));
        assert!(!state.nation("fra").unwrap().owns_center("spa"));
    }

    #[test]
    fn pending_adjustment_prefers_recorded_delta() {
        let mut state = TurnState::empty(1901, Season::Fall, Phase::CreatingDisbanding);
        state.set_supply_center("fra", "bre");
        state.set_supply_center("fra", "par");
        state.place_unit("fra", Unit::army("gas"));
        assert_eq!(state.pending_adjustment("fra"), 1);
        state.nations.get_mut("fra").unwrap().adjustment = Some(-1);
        assert_eq!(state.pending_adjustment("fra"), -1);
        assert_eq!(state.pending_adjustment("xyz"), 0);
    }

    #[test]
    fn select_and_cancel_orders() {
        let mut state = TurnState::empty(1901, Season::Spring, Phase::OrderWriting);
        state.place_unit("fra", Unit::army("par"));
        state.select_order("fra", Order::hold("par"));
        assert!(state.is_selected("fra", "hold-par"));
        state.select_order("fra", Order::direct_move("par", "gas", ""));
        assert!(!state.is_selected("fra", "hold-par"));
        assert_eq!(state.orders["fra"].len(), 1);
        state.select_order("fra", Order::Cancel { province: "par".to_string() });
        assert!(state.selected("fra", "par").is_none());
    }

    #[test]
    fn initial_turn_places_starting_units() {
        let map = small_map();
        let turn = TurnState::initial(&map, 3);
        assert_eq!(turn.date, 1901);
        assert_eq!(turn.phase, Phase::OrderWriting);
        assert_eq!(turn.unit_at("bre").map(|(n, u)| (n, u.coast.as_str())), Some(("fra", "c")));
        assert_eq!(turn.unit_at("spa").map(|(_, u)| u.coast.as_str()), Some("sc"));
        assert!(turn.has_army("par"));
        assert!(turn.has_army("naf"));
        assert!(turn.nations.values().all(|n| !n.neutral));
    }

    #[test]
    fn initial_turn_neutralizes_eliminated_countries() {
        let map = small_map();
        let two = TurnState::initial(&map, 2);
        let mor = two.nation("mor").unwrap();
        assert!(mor.neutral);
        assert_eq!(mor.units.len(), 1);

        let one = TurnState::initial(&map, 1);
        let spn = one.nation("spn").unwrap();
        assert!(spn.neutral);
        assert!(spn.units.is_empty());
        assert_eq!(spn.supply_centers, vec!["spa".to_string()]);
    }
}
