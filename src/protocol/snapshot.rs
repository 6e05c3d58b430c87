//! Game snapshot loading.
//!
//! A snapshot is the JSON form of `GameData`. Loading deserializes it (orders
//! go through the wire record import, so a malformed order fails the whole
//! document) and then checks every turn against the map the game is played on.

use std::collections::HashSet;

use log::info;
use thiserror::Error;

use crate::board::{Map, Order, TurnState};
use crate::game::GameData;

/// Errors that can occur when loading a game snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot is for map '{found}', expected '{expected}'")]
    MapMismatch { expected: String, found: String },

    #[error("turn {turn}: unknown province '{province}'")]
    UnknownProvince { turn: usize, province: String },

    #[error("turn {turn}: province '{province}' has no coast '{coast}'")]
    UnknownCoast {
        turn: usize,
        province: String,
        coast: String,
    },

    #[error("turn {turn}: unknown nation '{nation}'")]
    UnknownNation { turn: usize, nation: String },

    #[error("turn {turn}: nation stored under '{key}' has id '{id}'")]
    NationKeyMismatch { turn: usize, key: String, id: String },

    #[error("turn {turn}: more than one unit in '{province}'")]
    DuplicateUnit { turn: usize, province: String },

    #[error("turn {turn}: order {order} stored under province '{key}'")]
    OrderKeyMismatch { turn: usize, key: String, order: String },
}

/// Parses and validates a game snapshot against its map.
pub fn load_game(json: &str, map: &Map) -> Result<GameData, SnapshotError> {
    let game: GameData = serde_json::from_str(json)?;
    validate_game(&game, map)?;
    info!(
        "loaded game on map '{}' with {} turns",
        game.map,
        game.history.len()
    );
    Ok(game)
}

/// Serializes a game to its snapshot form.
pub fn save_game(game: &GameData) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(game)?)
}

/// Checks that every turn of the game refers only to the map's provinces,
/// coasts and countries, with consistent keys and at most one unit per
/// province.
pub fn validate_game(game: &GameData, map: &Map) -> Result<(), SnapshotError> {
    if game.map != map.id {
        return Err(SnapshotError::MapMismatch {
            expected: map.id.clone(),
            found: game.map.clone(),
        });
    }
    for (turn, state) in game.history.turns().iter().enumerate() {
        validate_turn(turn, state, map)?;
    }
    Ok(())
}

fn validate_turn(turn: usize, state: &TurnState, map: &Map) -> Result<(), SnapshotError> {
    let known_province = |province: &str| -> Result<(), SnapshotError> {
        match map.find_province(province) {
            Some(_) => Ok(()),
            None => Err(SnapshotError::UnknownProvince {
                turn,
                province: province.to_string(),
            }),
        }
    };
    let known_nation = |nation: &str| -> Result<(), SnapshotError> {
        match map.country(nation) {
            Some(_) => Ok(()),
            None => Err(SnapshotError::UnknownNation {
                turn,
                nation: nation.to_string(),
            }),
        }
    };

    let mut occupied = HashSet::new();
    for (key, nation) in &state.nations {
        if *key != nation.id {
            return Err(SnapshotError::NationKeyMismatch {
                turn,
                key: key.clone(),
                id: nation.id.clone(),
            });
        }
        known_nation(key)?;
        for center in &nation.supply_centers {
            known_province(center)?;
        }
        for unit in &nation.units {
            let province = map.find_province(&unit.province).ok_or_else(|| {
                SnapshotError::UnknownProvince {
                    turn,
                    province: unit.province.clone(),
                }
            })?;
            if !province.has_landing(&unit.coast) {
                return Err(SnapshotError::UnknownCoast {
                    turn,
                    province: unit.province.clone(),
                    coast: unit.coast.clone(),
                });
            }
            if !occupied.insert(unit.province.as_str()) {
                return Err(SnapshotError::DuplicateUnit {
                    turn,
                    province: unit.province.clone(),
                });
            }
        }
    }

    for (nation, by_province) in &state.orders {
        known_nation(nation)?;
        for (key, entry) in by_province {
            if entry.order.province() != key.as_str() {
                return Err(SnapshotError::OrderKeyMismatch {
                    turn,
                    key: key.clone(),
                    order: entry.order.id(),
                });
            }
            for province in referenced_provinces(&entry.order) {
                known_province(province)?;
            }
        }
    }

    for (key, dislodged) in &state.retreats {
        known_nation(&dislodged.nation)?;
        known_province(key)?;
        known_province(&dislodged.attacker)?;
    }

    for (nation, entries) in &state.adjustments {
        known_nation(nation)?;
        for entry in entries {
            for province in referenced_provinces(&entry.order) {
                known_province(province)?;
            }
        }
    }

    Ok(())
}

/// Every province an order names.
fn referenced_provinces(order: &Order) -> Vec<&str> {
    let names: Vec<&String> = match order {
        Order::Pass { .. } => Vec::new(),
        Order::Move { province, dest, .. } | Order::Retreat { province, dest, .. } => {
            vec![province, dest]
        }
        Order::Convoy { province, start, end } => vec![province, start, end],
        Order::SupportHold { province, supporting } => vec![province, supporting],
        Order::SupportMove {
            province,
            supporting,
            from,
        } => vec![province, supporting, from],
        Order::Cancel { province }
        | Order::Hold { province }
        | Order::Build { province, .. }
        | Order::Disband { province, .. } => vec![province],
    };
    names.into_iter().map(String::as_str).collect()
}
