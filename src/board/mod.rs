//! Board representation and game-state types.
//!
//! Contains the map graph (provinces, coasts, routes), units, orders, and
//! the per-turn state snapshot.

pub mod adjacency;
pub mod map;
pub mod order;
pub mod province;
pub mod state;
pub mod unit;

pub use adjacency::{AdjacencyIndex, Edge, Route};
pub use map::{Map, MapCountry, MapDefinition, MapError, PlayerConfiguration};
pub use order::{Order, OrderEntry, OrderKind, OrderResult};
pub use province::{Coast, Province};
pub use state::{Dislodgement, Nation, Phase, Season, TurnState};
pub use unit::{Unit, UnitType};
