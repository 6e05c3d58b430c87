//! External data formats.
//!
//! This module implements the wire records orders are exchanged in, loading
//! of game snapshots, and the command parser for the host main loop.

pub mod parser;
pub mod snapshot;
pub mod wire;

pub use parser::{parse_command, Command};
pub use snapshot::{load_game, save_game, validate_game, SnapshotError};
pub use wire::{export_order, import_order, import_order_json, ImportError, OrderRecord};
