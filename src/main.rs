//! Entente -- a line-protocol host for the Diplomacy rules substrate.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr through `env_logger` (see `RUST_LOG`).

use std::io::{self, BufRead};

use log::error;

use entente::engine::Engine;
use entente::protocol::parser::parse_command;

/// Runs the main command loop, reading commands from stdin
/// and writing responses to stdout.
fn main() {
    env_logger::init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match engine.execute(cmd, &mut out) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!("cannot write response: {}", e);
                break;
            }
        }
    }
}
