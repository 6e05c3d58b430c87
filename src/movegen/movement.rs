//! Order-writing phase move generation.
//!
//! Enumerates every topologically legal hold, move, convoy and support order
//! for a unit. Results are memoized per acting province in an `OrderCache`
//! that is scoped to one turn: handing the cache a different `TurnStamp`
//! clears it.
//!
//! Support orders are derived from a separate per-province index of hold and
//! move options, never from the full order lists, so generating one unit's
//! orders never re-enters generation for the same unit.

use std::collections::HashMap;

use log::debug;

use super::convoy::{convoy_pathfind, fleets_required};
use crate::board::{Map, Order, Phase, Season, TurnState, Unit};

/// Identifies the turn an `OrderCache` was filled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnStamp {
    /// Position of the turn in the game history.
    pub index: usize,
    pub date: u32,
    pub season: Season,
    pub phase: Phase,
}

impl TurnStamp {
    pub fn of(index: usize, turn: &TurnState) -> Self {
        TurnStamp {
            index,
            date: turn.date,
            season: turn.season,
            phase: turn.phase,
        }
    }
}

/// Memoized order lists for one turn, keyed by acting province.
#[derive(Debug, Default)]
pub struct OrderCache {
    stamp: Option<TurnStamp>,
    moves: HashMap<String, Vec<Order>>,
    orders: HashMap<String, Vec<Order>>,
}

impl OrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the cache to a turn, dropping everything computed for any other.
    pub fn scope(&mut self, stamp: TurnStamp) {
        if self.stamp == Some(stamp) {
            return;
        }
        if let Some(old) = self.stamp {
            debug!(
                "order cache rescoped from turn {} to turn {} ({} entries dropped)",
                old.index,
                stamp.index,
                self.orders.len()
            );
        }
        self.invalidate();
        self.stamp = Some(stamp);
    }

    /// Drops every cached list and forgets the bound turn.
    pub fn invalidate(&mut self) {
        self.moves.clear();
        self.orders.clear();
        self.stamp = None;
    }

    pub fn stamp(&self) -> Option<TurnStamp> {
        self.stamp
    }

    /// Number of provinces with a cached full order list.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Generates legal orders for units of one turn.
pub struct OrderGenerator<'a> {
    pub(super) map: &'a Map,
    pub(super) state: &'a TurnState,
    cache: &'a mut OrderCache,
}

impl<'a> OrderGenerator<'a> {
    /// Creates a generator over `state`, scoping `cache` to `stamp`.
    pub fn new(map: &'a Map, state: &'a TurnState, stamp: TurnStamp, cache: &'a mut OrderCache) -> Self {
        cache.scope(stamp);
        OrderGenerator { map, state, cache }
    }

    pub fn state(&self) -> &'a TurnState {
        self.state
    }

    pub fn map(&self) -> &'a Map {
        self.map
    }

    /// Returns every legal order-writing order for the unit, sorted by id.
    ///
    /// The list always contains a hold, then direct moves, convoyed moves
    /// for armies, convoy offers for fleets at sea, and supports.
    pub fn valid_orders(&mut self, unit: &Unit) -> Vec<Order> {
        if let Some(cached) = self.cache.orders.get(&unit.province) {
            return cached.clone();
        }

        let mut orders = self.move_options(unit);
        if unit.is_fleet() && self.map.is_water(&unit.province) {
            orders.extend(self.convoy_offers(unit));
        }
        orders.extend(self.support_offers(unit));

        orders.sort_by_cached_key(Order::id);
        orders.dedup();

        self.cache.orders.insert(unit.province.clone(), orders.clone());
        orders
    }

    /// Returns the hold and move options of the unit, unsorted.
    ///
    /// This is the index support generation reads from.
    pub fn move_options(&mut self, unit: &Unit) -> Vec<Order> {
        if let Some(cached) = self.cache.moves.get(&unit.province) {
            return cached.clone();
        }

        let mut orders = vec![Order::hold(&unit.province)];
        for edge in self.map.edges_from(&unit.province, &unit.coast) {
            if edge.water != unit.is_fleet() {
                continue;
            }
            orders.push(Order::direct_move(&unit.province, edge.to, edge.to_coast));
        }
        if unit.is_army() {
            for dest in convoy_pathfind(self.map, self.state, &unit.province, &[]) {
                orders.push(Order::convoyed_move(&unit.province, &dest));
            }
        }

        self.cache.moves.insert(unit.province.clone(), orders.clone());
        orders
    }

    /// Returns the provinces of units, other than those at `province` and
    /// `exclude`, that have a move into `province`.
    ///
    /// Convoyed moves only count if convoy pathfind still reaches `province`
    /// when `convoy_ignore` is left out.
    pub fn units_movable_to(&mut self, province: &str, exclude: &str, convoy_ignore: &str) -> Vec<String> {
        let state = self.state;
        let map = self.map;
        let mut movers = Vec::new();

        for (_, unit) in state.units() {
            if unit.province == province || unit.province == exclude {
                continue;
            }
            let moves = self.move_options(unit);
            let can_reach = moves.iter().any(|order| match order {
                Order::Move { dest, convoy: false, .. } => dest == province,
                Order::Move { dest, convoy: true, .. } => {
                    dest == province
                        && (convoy_ignore.is_empty()
                            || convoy_pathfind(map, state, &unit.province, &[convoy_ignore])
                                .iter()
                                .any(|p| p == province))
                }
                _ => false,
            });
            if can_reach {
                movers.push(unit.province.clone());
            }
        }

        movers
    }

    /// Land provinces reachable by convoy from `start`.
    pub fn convoy_pathfind(&self, start: &str, ignore: &[&str]) -> Vec<String> {
        convoy_pathfind(self.map, self.state, start, ignore)
    }

    /// Fleet chain carrying an army from `start` to `end`, if any.
    pub fn fleets_required(&self, start: &str, end: &str) -> Option<Vec<String>> {
        fleets_required(self.map, self.state, start, end, &[])
    }

    /// Returns true if an army moving `from` -> `to` has no land route and
    /// needs fleets to get there.
    pub fn requires_convoy(&self, from: &str, to: &str) -> bool {
        !self.map.adjacent(from, "", to, "") && self.fleets_required(from, to).is_some()
    }

    /// Convoy offers of a fleet at sea: carry any army on the fleet's chain to
    /// any other land province on it.
    ///
    /// Only the start must host an army; the end may be empty, since it is
    /// the army's destination.
    fn convoy_offers(&self, fleet: &Unit) -> Vec<Order> {
        let reachable = convoy_pathfind(self.map, self.state, &fleet.province, &[]);
        let mut orders = Vec::new();
        for start in reachable.iter().filter(|p| self.state.has_army(p)) {
            for end in reachable.iter().filter(|p| *p != start) {
                orders.push(Order::convoy(&fleet.province, start, end));
            }
        }
        orders
    }

    /// Support offers for every province the unit borders directly.
    fn support_offers(&mut self, unit: &Unit) -> Vec<Order> {
        let map = self.map;
        let mut targets: Vec<&str> = Vec::new();
        for edge in map.edges_from(&unit.province, &unit.coast) {
            if edge.water == unit.is_fleet() && !targets.contains(&edge.to) {
                targets.push(edge.to);
            }
        }

        let mut orders = Vec::new();
        for target in targets {
            if self.state.unit_at(target).is_some() {
                orders.push(Order::support_hold(&unit.province, target));
            }
            for mover in self.units_movable_to(target, &unit.province, &unit.province) {
                orders.push(Order::support_move(&unit.province, target, &mover));
            }
        }
        orders
    }
}
