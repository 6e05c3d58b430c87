//! Entente rules library.
//!
//! Exposes the map graph, turn state, order generation, configuration
//! resolver and data formats for use by integration tests and the binary
//! entry point.

pub mod board;
pub mod engine;
pub mod game;
pub mod movegen;
pub mod players;
pub mod protocol;
