//! Convoy chain search.
//!
//! Armies cross water only along chains of fleet-occupied water provinces.
//! Both searches here walk the coast-agnostic neighbour graph depth first and
//! mark provinces visited before descending, so they terminate on any
//! topology, cyclic water included.

use std::collections::HashSet;

use crate::board::{Map, TurnState};

/// Returns the land provinces reachable from `start` through zero or more
/// fleet-occupied water provinces, in discovery order.
///
/// Land neighbours of the start and of every fleet-held water province on
/// the chain are reached. A water `start` is expanded whether or not a fleet
/// stands on it. Provinces in `ignore` are never entered nor returned.
pub fn convoy_pathfind(map: &Map, state: &TurnState, start: &str, ignore: &[&str]) -> Vec<String> {
    let mut visited: HashSet<String> = ignore.iter().map(|p| p.to_string()).collect();
    visited.insert(start.to_string());
    let mut reachable = Vec::new();
    explore(map, state, start, &mut visited, &mut reachable);
    reachable
}

fn explore(
    map: &Map,
    state: &TurnState,
    node: &str,
    visited: &mut HashSet<String>,
    reachable: &mut Vec<String>,
) {
    for next in map.neighbours(node) {
        if visited.contains(next) {
            continue;
        }
        if !map.is_water(next) {
            visited.insert(next.to_string());
            reachable.push(next.to_string());
        } else if state.has_fleet(next) {
            visited.insert(next.to_string());
            explore(map, state, next, visited, reachable);
        }
    }
}

/// Finds a chain of fleet-occupied water provinces carrying an army from
/// `start` to `end`, skipping provinces in `ignore`.
///
/// Returns the fleet provinces of the first chain found in route order, which
/// is not necessarily the shortest. A direct land border does not count.
pub fn fleets_required(
    map: &Map,
    state: &TurnState,
    start: &str,
    end: &str,
    ignore: &[&str],
) -> Option<Vec<String>> {
    let mut visited: HashSet<String> = ignore.iter().map(|p| p.to_string()).collect();
    visited.insert(start.to_string());
    let mut chain = Vec::new();
    if extend_chain(map, state, start, end, &mut visited, &mut chain) {
        Some(chain)
    } else {
        None
    }
}

fn extend_chain(
    map: &Map,
    state: &TurnState,
    node: &str,
    end: &str,
    visited: &mut HashSet<String>,
    chain: &mut Vec<String>,
) -> bool {
    for next in map.neighbours(node) {
        if next == end && !chain.is_empty() {
            return true;
        }
        if visited.contains(next) || !map.is_water(next) || !state.has_fleet(next) {
            continue;
        }
        visited.insert(next.to_string());
        chain.push(next.to_string());
        if extend_chain(map, state, next, end, visited, chain) {
            return true;
        }
        chain.pop();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::map::tests::small_map;
    use crate::board::{Phase, Season, Unit};

    fn state() -> TurnState {
        TurnState::empty(1901, Season::Spring, Phase::OrderWriting)
    }

    #[test]
    fn no_fleets_reaches_land_neighbours() {
        let map = small_map();
        let mut s = state();
        s.place_unit("fra", Unit::army("bre"));
        assert_eq!(convoy_pathfind(&map, &s, "bre", &[]), vec!["par", "gas"]);
        assert_eq!(convoy_pathfind(&map, &s, "par", &[]), vec!["bre", "gas"]);
        assert!(convoy_pathfind(&map, &s, "naf", &[]).is_empty());
    }

    #[test]
    fn single_fleet_extends_land_neighbours() {
        let map = small_map();
        let mut s = state();
        s.place_unit("fra", Unit::army("bre"));
        s.place_unit("fra", Unit::fleet("mao", ""));
        let reached = convoy_pathfind(&map, &s, "bre", &[]);
        assert_eq!(reached, vec!["par", "gas", "spa", "naf"]);
        assert!(!reached.contains(&"bre".to_string()));
    }

    #[test]
    fn chain_of_two_fleets() {
        let map = small_map();
        let mut s = state();
        s.place_unit("fra", Unit::army("naf"));
        s.place_unit("fra", Unit::fleet("wes", ""));
        s.place_unit("fra", Unit::fleet("mao", ""));
        let reached = convoy_pathfind(&map, &s, "naf", &[]);
        assert!(reached.contains(&"bre".to_string()));
        assert!(reached.contains(&"gas".to_string()));
        assert!(reached.contains(&"spa".to_string()));

        let chain = fleets_required(&map, &s, "naf", "bre", &[]).unwrap();
        assert_eq!(chain.last().map(String::as_str), Some("mao"));
    }

    #[test]
    fn ignore_set_blocks_chain() {
        let map = small_map();
        let mut s = state();
        s.place_unit("fra", Unit::army("naf"));
        s.place_unit("fra", Unit::fleet("wes", ""));
        s.place_unit("fra", Unit::fleet("mao", ""));
        let reached = convoy_pathfind(&map, &s, "naf", &["mao"]);
        assert_eq!(reached, vec!["spa"]);
        assert!(fleets_required(&map, &s, "naf", "bre", &["mao"]).is_none());
        assert!(!convoy_pathfind(&map, &s, "naf", &["gas"]).contains(&"gas".to_string()));
    }

    #[test]
    fn water_start_needs_no_fleet_of_its_own() {
        let map = small_map();
        let s = state();
        let reached = convoy_pathfind(&map, &s, "wes", &[]);
        assert_eq!(reached, vec!["spa", "naf"]);
    }

    #[test]
    fn direct_border_is_not_a_chain() {
        let map = small_map();
        let mut s = state();
        s.place_unit("fra", Unit::army("par"));
        assert!(fleets_required(&map, &s, "par", "gas", &[]).is_none());
    }
}
