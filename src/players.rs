//! Player configuration resolver.
//!
//! Maps the number of seated players to the groups of countries each player
//! controls. A group is owned, and colored, by its first country.

use crate::board::{Map, MapCountry};

/// Countries played together by one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableGroup {
    pub countries: Vec<String>,
}

impl PlayableGroup {
    /// Returns the country that owns the group.
    pub fn owner(&self) -> &str {
        self.countries.first().map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c == country)
    }
}

/// Returns the countries removed from play with `players` seated.
pub fn eliminated_countries(map: &Map, players: u32) -> Vec<&str> {
    match map.configuration(players) {
        Some(configuration) => map
            .countries()
            .iter()
            .filter(|c| configuration.eliminated.contains(&c.id))
            .map(|c| c.id.as_str())
            .collect(),
        None => Vec::new(),
    }
}

/// Returns the playable groups for `players` seated players.
///
/// Every country not eliminated lands in exactly one group: first the combine
/// rules in configuration order, each keeping only members still ungrouped,
/// then one singleton per remaining country in map order. Without a
/// configuration for this player count every country plays alone.
pub fn playable_groups(map: &Map, players: u32) -> Vec<PlayableGroup> {
    let eliminated = eliminated_countries(map, players);
    let mut ungrouped: Vec<&str> = map
        .countries()
        .iter()
        .map(|c| c.id.as_str())
        .filter(|id| !eliminated.contains(id))
        .collect();

    let mut groups = Vec::new();
    if let Some(configuration) = map.configuration(players) {
        for rule in &configuration.combine {
            let members: Vec<String> = rule
                .iter()
                .filter(|id| ungrouped.contains(&id.as_str()))
                .cloned()
                .collect();
            if members.is_empty() {
                continue;
            }
            ungrouped.retain(|id| !members.iter().any(|m| m == id));
            groups.push(PlayableGroup { countries: members });
        }
    }

    groups.extend(ungrouped.into_iter().map(|id| PlayableGroup {
        countries: vec![id.to_string()],
    }));
    groups
}

/// Returns the group a country plays in, or `None` if it is eliminated.
pub fn group_of(map: &Map, players: u32, country: &str) -> Option<PlayableGroup> {
    playable_groups(map, players)
        .into_iter()
        .find(|g| g.contains(country))
}

/// Returns the country a country is drawn as: its group owner.
pub fn display_country<'m>(map: &'m Map, players: u32, country: &str) -> Option<&'m MapCountry> {
    let group = group_of(map, players, country)?;
    map.country(group.owner())
}

/// Returns the color a country is drawn in.
pub fn group_color<'m>(map: &'m Map, players: u32, country: &str) -> Option<&'m str> {
    display_country(map, players, country).map(|c| c.color.as_str())
}
