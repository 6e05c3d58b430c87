//! Legal move generation.
//!
//! Generates the legal orders of a nation in the current turn, covering the
//! order-writing, retreat and build/disband phases.

pub mod build;
pub mod convoy;
pub mod movement;
pub mod retreat;

pub use build::{valid_build_orders, valid_disband_orders};
pub use convoy::{convoy_pathfind, fleets_required};
pub use movement::{OrderCache, OrderGenerator, TurnStamp};
pub use retreat::valid_retreats;

use rand::Rng;

use crate::board::{Order, Phase};

impl OrderGenerator<'_> {
    /// Returns the nation's option lists for the current phase. The nation
    /// submits one order out of each list.
    ///
    /// - Order writing: one list per unit.
    /// - Retreating: one list per dislodged unit, its retreats then a disband.
    /// - Creating/disbanding: one list per pending build (builds plus pass)
    ///   or per pending disband.
    /// - Other phases: nothing.
    pub fn legal_orders_for(&mut self, nation: &str) -> Vec<Vec<Order>> {
        let map = self.map;
        let state = self.state;
        match state.phase {
            Phase::OrderWriting => {
                let units: Vec<_> = state
                    .nation(nation)
                    .map(|n| n.units.clone())
                    .unwrap_or_default();
                units.iter().map(|u| self.valid_orders(u)).collect()
            }
            Phase::Retreating => state
                .retreats
                .iter()
                .filter(|(_, d)| d.nation == nation)
                .map(|(province, d)| {
                    let mut options = valid_retreats(map, state, d);
                    options.push(Order::disband(nation, province));
                    options
                })
                .collect(),
            Phase::CreatingDisbanding => {
                let delta = state.pending_adjustment(nation);
                let options = if delta > 0 {
                    valid_build_orders(map, state, nation)
                } else {
                    valid_disband_orders(state, nation)
                };
                (0..delta.unsigned_abs()).map(|_| options.clone()).collect()
            }
            Phase::CountryClaiming | Phase::Finished => Vec::new(),
        }
    }
}

/// Picks one random legal order out of each of the nation's option lists.
///
/// Builds and disbands never pick the same province twice; when a build list
/// runs out of free provinces the pick falls back to the list's remaining
/// options (pass).
pub fn random_orders(generator: &mut OrderGenerator<'_>, nation: &str, rng: &mut impl Rng) -> Vec<Order> {
    let mut orders = Vec::new();
    let mut used_provinces: Vec<String> = Vec::new();

    for options in generator.legal_orders_for(nation) {
        let available: Vec<&Order> = options
            .iter()
            .filter(|o| match o {
                Order::Build { province, .. } | Order::Disband { province, .. } => {
                    !used_provinces.contains(province)
                }
                _ => true,
            })
            .collect();

        if available.is_empty() {
            continue;
        }

        let idx = rng.gen_range(0..available.len());
        let chosen = available[idx].clone();
        if let Order::Build { province, .. } | Order::Disband { province, .. } = &chosen {
            used_provinces.push(province.clone());
        }
        orders.push(chosen);
    }

    orders
}
