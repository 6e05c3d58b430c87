//! Adjacency graph built from map routes.
//!
//! Each route is an undirected edge between two (province, coast) endpoints.
//! Land routes carry armies, water routes carry fleets. The index stores
//! every route under both endpoint provinces so adjacency is queryable from
//! either side.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::unit::UnitType;

/// An undirected edge between two (province, coast) endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub p0: String,
    #[serde(default)]
    pub c0: String,
    pub p1: String,
    #[serde(default)]
    pub c1: String,
    /// Navigable only by fleets when set, only by armies otherwise.
    #[serde(default)]
    pub water: bool,
}

impl Route {
    /// Returns true if units of the given type travel along this route.
    pub fn carries(&self, unit_type: UnitType) -> bool {
        match unit_type {
            UnitType::Army => !self.water,
            UnitType::Fleet => self.water,
        }
    }

    /// Returns true if the route joins the two endpoints, in either direction.
    pub fn joins(&self, p0: &str, c0: &str, p1: &str, c1: &str) -> bool {
        (self.p0 == p0 && self.c0 == c0 && self.p1 == p1 && self.c1 == c1)
            || (self.p0 == p1 && self.c0 == c1 && self.p1 == p0 && self.c1 == c0)
    }
}

/// A route seen from one of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a> {
    pub from: &'a str,
    pub from_coast: &'a str,
    pub to: &'a str,
    pub to_coast: &'a str,
    pub water: bool,
}

/// Route index keyed by province id.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    routes: Vec<Route>,
    by_province: HashMap<String, Vec<usize>>,
}

impl AdjacencyIndex {
    /// Indexes the given routes under both endpoints.
    pub fn new(routes: Vec<Route>) -> Self {
        let mut by_province: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, route) in routes.iter().enumerate() {
            by_province.entry(route.p0.clone()).or_default().push(i);
            if route.p1 != route.p0 {
                by_province.entry(route.p1.clone()).or_default().push(i);
            }
        }
        AdjacencyIndex { routes, by_province }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns directed views of every route touching `province` at any coast.
    pub fn edges_of<'a>(&'a self, province: &str) -> impl Iterator<Item = Edge<'a>> + 'a {
        let province = province.to_string();
        self.by_province
            .get(province.as_str())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .flat_map(move |&i| {
                let r = &self.routes[i];
                let mut out = Vec::with_capacity(2);
                if r.p0 == province {
                    out.push(Edge {
                        from: &r.p0,
                        from_coast: &r.c0,
                        to: &r.p1,
                        to_coast: &r.c1,
                        water: r.water,
                    });
                }
                if r.p1 == province {
                    out.push(Edge {
                        from: &r.p1,
                        from_coast: &r.c1,
                        to: &r.p0,
                        to_coast: &r.c0,
                        water: r.water,
                    });
                }
                out
            })
    }

    /// Returns directed views of every route leaving exactly `(province, coast)`.
    pub fn edges_from<'a>(
        &'a self,
        province: &str,
        coast: &'a str,
    ) -> impl Iterator<Item = Edge<'a>> + 'a {
        self.edges_of(province).filter(move |e| e.from_coast == coast)
    }

    /// Returns true if a route joins `(p0, c0)` and `(p1, c1)`.
    pub fn is_adjacent(&self, p0: &str, c0: &str, p1: &str, c1: &str) -> bool {
        self.by_province
            .get(p0)
            .map(|v| v.iter().any(|&i| self.routes[i].joins(p0, c0, p1, c1)))
            .unwrap_or(false)
    }

    /// Returns the provinces adjacent to `province` ignoring coasts, in
    /// route order and without duplicates.
    pub fn neighbours(&self, province: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for edge in self.edges_of(province) {
            if edge.to != province && !out.contains(&edge.to) {
                out.push(edge.to);
            }
        }
        out
    }
}
