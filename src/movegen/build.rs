//! Build/disband-phase move generation.
//!
//! Enumerates legal build, disband and pass orders for the adjustment phase
//! following a Fall turn.

use crate::board::{Map, Order, TurnState, UnitType};

/// Generates the build options of a country, followed by `Pass`.
///
/// Builds are offered at every home supply center the country still owns
/// and that is not occupied: one fleet per coast plus an army on coastal
/// centers, a fleet on water centers, an army elsewhere.
pub fn valid_build_orders(map: &Map, state: &TurnState, country: &str) -> Vec<Order> {
    let mut orders = Vec::new();

    let homes = map.country(country).map(|c| c.home_centers.as_slice()).unwrap_or(&[]);
    let nation = state.nation(country);

    for home in homes {
        if !nation.map(|n| n.owns_center(home)).unwrap_or(false) {
            continue;
        }
        if state.unit_at(home).is_some() {
            continue;
        }
        let Some(province) = map.find_province(home) else {
            continue;
        };

        if province.has_coasts() {
            for coast in &province.coasts {
                orders.push(Order::build(country, home, UnitType::Fleet, &coast.id));
            }
            orders.push(Order::build(country, home, UnitType::Army, ""));
        } else if province.water {
            orders.push(Order::build(country, home, UnitType::Fleet, ""));
        } else {
            orders.push(Order::build(country, home, UnitType::Army, ""));
        }
    }

    orders.push(Order::pass(country));
    orders
}

/// Generates one disband per unit the country owns.
pub fn valid_disband_orders(state: &TurnState, country: &str) -> Vec<Order> {
    state
        .nation(country)
        .map(|n| {
            n.units
                .iter()
                .map(|u| Order::disband(country, &u.province))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::map::tests::small_map;
    use crate::board::{Phase, Season, Unit};

    fn adjustment_state() -> TurnState {
        TurnState::empty(1901, Season::Fall, Phase::CreatingDisbanding)
    }

    fn builds_at<'a>(orders: &'a [Order], province: &str) -> Vec<&'a Order> {
        orders
            .iter()
            .filter(|o| matches!(o, Order::Build { province: p, .. } if p == province))
            .collect()
    }

    #[test]
    fn two_coast_center_offers_three_builds() {
        let map = small_map();
        let mut state = adjustment_state();
        state.set_supply_center("spn", "spa");
        let orders = valid_build_orders(&map, &state, "spn");
        assert_eq!(builds_at(&orders, "spa").len(), 3);
        assert_eq!(orders.len(), 4);
        assert_eq!(orders.last(), Some(&Order::pass("spn")));
        assert!(orders.contains(&Order::build("spn", "spa", UnitType::Fleet, "nc")));
        assert!(orders.contains(&Order::build("spn", "spa", UnitType::Fleet, "sc")));
        assert!(orders.contains(&Order::build("spn", "spa", UnitType::Army, "")));
    }

    #[test]
    fn landlocked_center_offers_army_only() {
        let map = small_map();
        let mut state = adjustment_state();
        state.set_supply_center("fra", "par");
        let orders = valid_build_orders(&map, &state, "fra");
        assert_eq!(
            orders,
            vec![Order::build("fra", "par", UnitType::Army, ""), Order::pass("fra")]
        );
    }

    #[test]
    fn no_build_in_occupied_or_lost_center() {
        let map = small_map();
        let mut state = adjustment_state();
        state.set_supply_center("fra", "bre");
        state.set_supply_center("spn", "par");
        state.place_unit("fra", Unit::fleet("bre", "c"));
        let orders = valid_build_orders(&map, &state, "fra");
        assert_eq!(orders, vec![Order::pass("fra")]);
    }

    #[test]
    fn no_build_in_foreign_center() {
        let map = small_map();
        let mut state = adjustment_state();
        state.set_supply_center("fra", "spa");
        let orders = valid_build_orders(&map, &state, "fra");
        assert!(builds_at(&orders, "spa").is_empty());
    }

    #[test]
    fn unknown_country_can_only_pass() {
        let map = small_map();
        let state = adjustment_state();
        assert_eq!(valid_build_orders(&map, &state, "xyz"), vec![Order::pass("xyz")]);
    }

    #[test]
    fn one_disband_per_unit() {
        let mut state = adjustment_state();
        state.place_unit("fra", Unit::army("par"));
        state.place_unit("fra", Unit::fleet("mao", ""));
        state.place_unit("spn", Unit::army("spa"));
        let orders = valid_disband_orders(&state, "fra");
        assert_eq!(
            orders,
            vec![Order::disband("fra", "par"), Order::disband("fra", "mao")]
        );
        assert!(valid_disband_orders(&state, "xyz").is_empty());
    }
}
