//! A game: its append-only turn history, roster and player submissions.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Map, Order, OrderKind, Phase, TurnState};
use crate::movegen::{
    valid_build_orders, valid_disband_orders, valid_retreats, OrderCache, OrderGenerator, TurnStamp,
};
use crate::players::group_of;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("{kind} orders are not accepted during {phase}")]
    WrongPhase { kind: OrderKind, phase: &'static str },
    #[error("{nation} has no unit to order at {province}")]
    NoUnit { nation: String, province: String },
    #[error("unit at {province} belongs to {owner}, not {nation}")]
    NotOwner {
        nation: String,
        owner: String,
        province: String,
    },
    #[error("order {0} is not legal in the current turn")]
    IllegalOrder(String),
    #[error("{0} has no builds or disbands this turn")]
    NoAdjustment(String),
    #[error("{nation} already submitted all {limit} of its adjustment orders")]
    AdjustmentLimit { nation: String, limit: u32 },
    #[error("an adjustment at {0} was already submitted")]
    DuplicateProvince(String),
}

/// Outcome of a game. Serialized as its wire code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum WinState {
    #[default]
    Playing,
    Draw,
    Won,
}

impl TryFrom<i32> for WinState {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(WinState::Playing),
            1 => Ok(WinState::Draw),
            2 => Ok(WinState::Won),
            other => Err(format!("unknown win state code {}", other)),
        }
    }
}

impl From<WinState> for i32 {
    fn from(state: WinState) -> i32 {
        match state {
            WinState::Playing => 0,
            WinState::Draw => 1,
            WinState::Won => 2,
        }
    }
}

/// Ordered turns of a game, oldest first. Never empty; the last turn is the
/// current one and the only one open to mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TurnState>", into = "Vec<TurnState>")]
pub struct History {
    turns: Vec<TurnState>,
}

impl History {
    pub fn new(first: TurnState) -> Self {
        History { turns: vec![first] }
    }

    pub fn current(&self) -> &TurnState {
        &self.turns[self.turns.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut TurnState {
        let last = self.turns.len() - 1;
        &mut self.turns[last]
    }

    /// Index of the current turn.
    pub fn current_index(&self) -> usize {
        self.turns.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&TurnState> {
        self.turns.get(index)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn push(&mut self, turn: TurnState) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[TurnState] {
        &self.turns
    }
}

impl TryFrom<Vec<TurnState>> for History {
    type Error = String;

    fn try_from(turns: Vec<TurnState>) -> Result<Self, Self::Error> {
        if turns.is_empty() {
            return Err("game history has no turns".to_string());
        }
        Ok(History { turns })
    }
}

impl From<History> for Vec<TurnState> {
    fn from(history: History) -> Self {
        history.turns
    }
}

/// A game in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    /// Id of the map the game is played on.
    pub map: String,
    pub history: History,
    /// Seated users, in seating order.
    #[serde(default)]
    pub players: Vec<String>,
    /// Country -> user controlling it.
    #[serde(default)]
    pub assignments: BTreeMap<String, String>,
    #[serde(default)]
    pub status: WinState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

impl GameData {
    pub fn new(map: &str, first: TurnState) -> Self {
        GameData {
            map: map.to_string(),
            history: History::new(first),
            players: Vec::new(),
            assignments: BTreeMap::new(),
            status: WinState::Playing,
            winner: None,
        }
    }

    pub fn current(&self) -> &TurnState {
        self.history.current()
    }

    /// Identifies the current turn for cache scoping.
    pub fn stamp(&self) -> TurnStamp {
        TurnStamp::of(self.history.current_index(), self.history.current())
    }

    /// Returns an order generator over the current turn.
    pub fn generator<'a>(&'a self, map: &'a Map, cache: &'a mut OrderCache) -> OrderGenerator<'a> {
        OrderGenerator::new(map, self.history.current(), self.stamp(), cache)
    }

    /// Appends the next turn, produced by adjudication.
    pub fn advance(&mut self, turn: TurnState) {
        self.history.push(turn);
    }

    /// Number of seated players, as used by the configuration resolver.
    pub fn seated(&self) -> u32 {
        self.players.len() as u32
    }

    /// Returns true if the nation has the order with this id selected in the
    /// current turn.
    pub fn is_selected(&self, nation: &str, id: &str) -> bool {
        self.history.current().is_selected(nation, id)
    }

    /// Returns the user controlling a country: whoever is assigned the owner
    /// of the country's playable group.
    pub fn controlling_user(&self, map: &Map, country: &str) -> Option<&str> {
        let group = group_of(map, self.seated(), country)?;
        self.assignments.get(group.owner()).map(String::as_str)
    }

    /// Validates and stores an order for the nation in the current turn.
    ///
    /// The order must suit the phase, act on one of the nation's units (or
    /// its adjustments) and appear among the generated legal orders.
    /// `Cancel` withdraws the order stored for its province.
    pub fn submit_order(
        &mut self,
        map: &Map,
        cache: &mut OrderCache,
        nation: &str,
        order: Order,
    ) -> Result<(), SubmitError> {
        let result = self.check_order(map, cache, nation, &order);
        if let Err(e) = &result {
            warn!("rejected {} from {}: {}", order.id(), nation, e);
            return result;
        }

        let turn = self.history.current_mut();
        match (turn.phase, order) {
            (Phase::CreatingDisbanding, Order::Cancel { province }) => {
                if let Some(entries) = turn.adjustments.get_mut(nation) {
                    entries.retain(|e| e.order.province() != province);
                }
            }
            (Phase::CreatingDisbanding, order) => turn.push_adjustment(nation, order),
            (_, order) => turn.select_order(nation, order),
        }
        Ok(())
    }

    fn check_order(
        &self,
        map: &Map,
        cache: &mut OrderCache,
        nation: &str,
        order: &Order,
    ) -> Result<(), SubmitError> {
        let turn = self.history.current();
        let kind = order.kind();
        let wrong_phase = || SubmitError::WrongPhase {
            kind,
            phase: turn.phase.name(),
        };
        let province = order.province();

        match turn.phase {
            Phase::OrderWriting => {
                if order.is_adjustment() || kind == OrderKind::Retreat {
                    return Err(wrong_phase());
                }
                let (owner, unit) = turn.unit_at(province).ok_or_else(|| SubmitError::NoUnit {
                    nation: nation.to_string(),
                    province: province.to_string(),
                })?;
                if owner != nation {
                    return Err(SubmitError::NotOwner {
                        nation: nation.to_string(),
                        owner: owner.to_string(),
                        province: province.to_string(),
                    });
                }
                if kind == OrderKind::Cancel {
                    return Ok(());
                }
                let legal = self.generator(map, cache).valid_orders(unit);
                require_listed(&legal, order)
            }
            Phase::Retreating => {
                if !matches!(kind, OrderKind::Retreat | OrderKind::Disband | OrderKind::Cancel) {
                    return Err(wrong_phase());
                }
                let dislodged = turn.retreats.get(province).ok_or_else(|| SubmitError::NoUnit {
                    nation: nation.to_string(),
                    province: province.to_string(),
                })?;
                if dislodged.nation != nation {
                    return Err(SubmitError::NotOwner {
                        nation: nation.to_string(),
                        owner: dislodged.nation.clone(),
                        province: province.to_string(),
                    });
                }
                match order {
                    Order::Cancel { .. } => Ok(()),
                    Order::Disband { country, .. } if country == nation => Ok(()),
                    Order::Disband { .. } => Err(SubmitError::IllegalOrder(order.id())),
                    _ => require_listed(&valid_retreats(map, turn, dislodged), order),
                }
            }
            Phase::CreatingDisbanding => {
                if !order.is_adjustment() && kind != OrderKind::Cancel {
                    return Err(wrong_phase());
                }
                let delta = turn.pending_adjustment(nation);
                if delta == 0 {
                    return Err(SubmitError::NoAdjustment(nation.to_string()));
                }
                let submitted = turn.adjustments.get(nation).map(Vec::as_slice).unwrap_or(&[]);
                if kind == OrderKind::Cancel {
                    return if submitted.iter().any(|e| e.order.province() == province) {
                        Ok(())
                    } else {
                        Err(SubmitError::IllegalOrder(order.id()))
                    };
                }

                let legal = if delta > 0 {
                    valid_build_orders(map, turn, nation)
                } else {
                    valid_disband_orders(turn, nation)
                };
                require_listed(&legal, order)?;

                let limit = delta.unsigned_abs();
                if submitted.len() as u32 >= limit {
                    return Err(SubmitError::AdjustmentLimit {
                        nation: nation.to_string(),
                        limit,
                    });
                }
                if kind != OrderKind::Pass && submitted.iter().any(|e| e.order.province() == province) {
                    return Err(SubmitError::DuplicateProvince(province.to_string()));
                }
                Ok(())
            }
            Phase::CountryClaiming | Phase::Finished => Err(wrong_phase()),
        }
    }
}

fn require_listed(legal: &[Order], order: &Order) -> Result<(), SubmitError> {
    let id = order.id();
    if legal.iter().any(|o| o.id() == id) {
        Ok(())
    } else {
        Err(SubmitError::IllegalOrder(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::map::tests::small_map;
    use crate::board::{Dislodgement, Season, Unit, UnitType};

    fn new_game(map: &Map) -> GameData {
        GameData::new(&map.id, TurnState::initial(map, 3))
    }

    fn adjustment_game(map: &Map) -> GameData {
        let mut turn = TurnState::empty(1901, Season::Fall, Phase::CreatingDisbanding);
        turn.set_supply_center("fra", "bre");
        turn.set_supply_center("fra", "par");
        GameData::new(&map.id, turn)
    }

    #[test]
    fn legal_order_is_stored_and_selected() {
        let map = small_map();
        let mut game = new_game(&map);
        let mut cache = OrderCache::new();
        game.submit_order(&map, &mut cache, "fra", Order::direct_move("par", "gas", ""))
            .unwrap();
        assert!(game.is_selected("fra", "move-par-gas"));
        assert!(!game.is_selected("spn", "move-par-gas"));
    }

    #[test]
    fn resubmitting_replaces_previous_order() {
        let map = small_map();
        let mut game = new_game(&map);
        let mut cache = OrderCache::new();
        game.submit_order(&map, &mut cache, "fra", Order::direct_move("par", "gas", ""))
            .unwrap();
        game.submit_order(&map, &mut cache, "fra", Order::hold("par")).unwrap();
        assert!(game.is_selected("fra", "hold-par"));
        assert!(!game.is_selected("fra", "move-par-gas"));
    }

    #[test]
    fn cancel_withdraws_order() {
        let map = small_map();
        let mut game = new_game(&map);
        let mut cache = OrderCache::new();
        game.submit_order(&map, &mut cache, "fra", Order::hold("par")).unwrap();
        game.submit_order(&map, &mut cache, "fra", Order::cancel("par")).unwrap();
        assert!(!game.is_selected("fra", "hold-par"));
        assert!(game.current().selected("fra", "par").is_none());
    }

    #[test]
    fn illegal_move_is_rejected() {
        let map = small_map();
        let mut game = new_game(&map);
        let mut cache = OrderCache::new();
        let err = game
            .submit_order(&map, &mut cache, "fra", Order::direct_move("par", "spa", ""))
            .unwrap_err();
        assert_eq!(err, SubmitError::IllegalOrder("move-par-spa".to_string()));
        assert!(game.current().orders.is_empty());
    }

    #[test]
    fn foreign_or_missing_unit_is_rejected() {
        let map = small_map();
        let mut game = new_game(&map);
        let mut cache = OrderCache::new();
        assert!(matches!(
            game.submit_order(&map, &mut cache, "fra", Order::hold("spa")),
            Err(SubmitError::NotOwner { owner, .. }) if owner == "spn"
        ));
        assert!(matches!(
            game.submit_order(&map, &mut cache, "fra", Order::hold("gas")),
            Err(SubmitError::NoUnit { .. })
        ));
    }

    #[test]
    fn adjustment_orders_rejected_while_writing_orders() {
        let map = small_map();
        let mut game = new_game(&map);
        let mut cache = OrderCache::new();
        let err = game
            .submit_order(&map, &mut cache, "fra", Order::pass("fra"))
            .unwrap_err();
        assert_eq!(
            err,
            SubmitError::WrongPhase {
                kind: OrderKind::Pass,
                phase: "orderWriting"
            }
        );
    }

    #[test]
    fn builds_capped_by_delta() {
        let map = small_map();
        let mut game = adjustment_game(&map);
        let mut cache = OrderCache::new();
        game.submit_order(&map, &mut cache, "fra", Order::build("fra", "bre", UnitType::Army, ""))
            .unwrap();
        assert_eq!(
            game.submit_order(&map, &mut cache, "fra", Order::build("fra", "bre", UnitType::Fleet, "c")),
            Err(SubmitError::DuplicateProvince("bre".to_string()))
        );
        game.submit_order(&map, &mut cache, "fra", Order::pass("fra")).unwrap();
        assert!(matches!(
            game.submit_order(&map, &mut cache, "fra", Order::build("fra", "par", UnitType::Army, "")),
            Err(SubmitError::AdjustmentLimit { limit: 2, .. })
        ));
        assert!(game.is_selected("fra", "build-fra-bre-army"));
        assert!(game.is_selected("fra", "pass"));
    }

    #[test]
    fn cancel_frees_a_build_slot() {
        let map = small_map();
        let mut game = adjustment_game(&map);
        let mut cache = OrderCache::new();
        game.submit_order(&map, &mut cache, "fra", Order::build("fra", "bre", UnitType::Army, ""))
            .unwrap();
        game.submit_order(&map, &mut cache, "fra", Order::cancel("bre")).unwrap();
        assert!(!game.is_selected("fra", "build-fra-bre-army"));
        game.submit_order(&map, &mut cache, "fra", Order::build("fra", "bre", UnitType::Fleet, "c"))
            .unwrap();
    }

    #[test]
    fn nation_without_delta_cannot_adjust() {
        let map = small_map();
        let mut game = adjustment_game(&map);
        let mut cache = OrderCache::new();
        assert_eq!(
            game.submit_order(&map, &mut cache, "spn", Order::pass("spn")),
            Err(SubmitError::NoAdjustment("spn".to_string()))
        );
    }

    #[test]
    fn retreat_must_be_open() {
        let map = small_map();
        let mut turn = TurnState::empty(1901, Season::Spring, Phase::Retreating);
        turn.place_unit("spn", Unit::army("gas"));
        turn.set_dislodged(
            "gas",
            Dislodgement {
                nation: "fra".to_string(),
                unit: Unit::army("gas"),
                attacker: "spa".to_string(),
            },
        );
        let mut game = GameData::new("small", turn);
        let mut cache = OrderCache::new();
        game.submit_order(&map, &mut cache, "fra", Order::retreat("gas", "bre", ""))
            .unwrap();
        assert!(matches!(
            game.submit_order(&map, &mut cache, "fra", Order::retreat("gas", "spa", "")),
            Err(SubmitError::IllegalOrder(_))
        ));
        assert!(matches!(
            game.submit_order(&map, &mut cache, "spn", Order::retreat("gas", "par", "")),
            Err(SubmitError::NotOwner { .. })
        ));
    }

    #[test]
    fn history_appends_and_rescopes() {
        let map = small_map();
        let mut game = new_game(&map);
        let first = game.stamp();
        let mut next = game.current().clone();
        next.season = Season::Fall;
        game.advance(next);
        assert_eq!(game.history.len(), 2);
        assert_ne!(game.stamp(), first);
        assert_eq!(game.stamp().index, 1);
        assert_eq!(game.history.get(0).unwrap().season, Season::Spring);
    }

    #[test]
    fn empty_history_is_rejected() {
        assert!(serde_json::from_str::<History>("[]").is_err());
    }

    #[test]
    fn controlling_user_follows_group_owner() {
        let map = small_map();
        let mut game = new_game(&map);
        game.players = vec!["ann".to_string(), "ben".to_string()];
        game.assignments.insert("spn".to_string(), "ann".to_string());
        assert_eq!(game.controlling_user(&map, "fra"), Some("ann"));
        assert_eq!(game.controlling_user(&map, "spn"), Some("ann"));
        assert_eq!(game.controlling_user(&map, "mor"), None);
    }

    #[test]
    fn game_serializes_status_as_code() {
        let map = small_map();
        let mut game = new_game(&map);
        game.status = WinState::Won;
        game.winner = Some("fra".to_string());
        let value = serde_json::to_value(&game).unwrap();
        assert_eq!(value["status"], 2);
        assert_eq!(value["map"], "small");
        let back: GameData = serde_json::from_value(value).unwrap();
        assert_eq!(back, game);
    }
}
