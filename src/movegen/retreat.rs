//! Retreat-phase move generation.
//!
//! Enumerates the retreat destinations open to a dislodged unit.

use crate::board::{Dislodgement, Map, Order, TurnState};

/// Generates every legal retreat for a dislodged unit.
///
/// A unit may retreat along any route it could move along, except into the
/// province the attack came from or into an occupied province.
pub fn valid_retreats(map: &Map, state: &TurnState, dislodgement: &Dislodgement) -> Vec<Order> {
    let unit = &dislodgement.unit;
    let mut orders: Vec<Order> = Vec::new();

    for edge in map.edges_from(&unit.province, &unit.coast) {
        if edge.water != unit.is_fleet() {
            continue;
        }
        if edge.to == dislodgement.attacker {
            continue;
        }
        if state.unit_at(edge.to).is_some() {
            continue;
        }
        let order = Order::retreat(&unit.province, edge.to, edge.to_coast);
        if !orders.contains(&order) {
            orders.push(order);
        }
    }

    orders
}
