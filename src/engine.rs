//! Host session state.
//!
//! Holds the loaded map, the game in progress, host options and the order
//! cache, and answers the line commands of the main loop.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::board::{Map, MapError, Order, Phase, TurnState};
use crate::game::{GameData, SubmitError};
use crate::movegen::{random_orders, valid_retreats, OrderCache};
use crate::players::playable_groups;
use crate::protocol::parser::Command;
use crate::protocol::snapshot::{self, SnapshotError};
use crate::protocol::wire::export_order;

/// Errors reported back to the host's client.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("cannot encode record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no map loaded")]
    NoMap,
    #[error("no game in progress")]
    NoGame,
    #[error("no unit to order at {0}")]
    NoUnit(String),
    #[error("{nation} has no order {id}")]
    UnknownOrder { nation: String, id: String },
    #[error("invalid value '{value}' for option {name}")]
    InvalidOption { name: String, value: String },
}

/// Holds the mutable state of the host between commands.
pub struct Engine {
    pub map: Option<Map>,
    pub game: Option<GameData>,
    pub options: HashMap<String, String>,
    cache: OrderCache,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates a host with no map or game.
    pub fn new() -> Self {
        Engine {
            map: None,
            game: None,
            options: HashMap::new(),
            cache: OrderCache::new(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Runs one command. Returns false once the session should end.
    ///
    /// Command failures are reported to the client as `error <message>`
    /// lines; only output failures are returned.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<bool> {
        let result = match command {
            Command::Quit => return Ok(false),
            Command::IsReady => self.handle_isready(out),
            Command::SetOption { name, value } => self.set_option(name, value),
            Command::LoadMap { path } => self.load_map(&path),
            Command::LoadGame { path } => self.load_game(&path),
            Command::NewGame => self.new_game(),
            Command::Orders { province } => self.handle_orders(&province, out),
            Command::Legal { nation } => self.handle_legal(&nation, out),
            Command::Select { nation, order_id } => self.handle_select(&nation, &order_id, out),
            Command::Export => self.handle_export(out),
            Command::Groups => self.handle_groups(out),
            Command::Random { nation } => self.handle_random(&nation, out),
        };

        match result {
            Ok(()) => {}
            Err(EngineError::Io(e)) => return Err(e),
            Err(e) => {
                warn!("{}", e);
                writeln!(out, "error {}", e)?;
            }
        }
        out.flush()?;
        Ok(true)
    }

    /// Sets a host option. `Seed` reseeds the random order picker at once.
    pub fn set_option(&mut self, name: String, value: Option<String>) -> Result<(), EngineError> {
        let value = value.unwrap_or_default();
        match name.as_str() {
            "Seed" => {
                let seed = value.parse::<u64>().map_err(|_| EngineError::InvalidOption {
                    name: name.clone(),
                    value: value.clone(),
                })?;
                self.rng = SmallRng::seed_from_u64(seed);
            }
            "Players" => {
                value.parse::<u32>().map_err(|_| EngineError::InvalidOption {
                    name: name.clone(),
                    value: value.clone(),
                })?;
            }
            _ => {}
        }
        self.options.insert(name, value);
        Ok(())
    }

    /// Root directory map assets are resolved against.
    pub fn maps_dir(&self) -> PathBuf {
        PathBuf::from(self.options.get("MapsDir").map(String::as_str).unwrap_or("."))
    }

    /// Seated-player count: the `Players` option, else the game's roster,
    /// else one player per country.
    pub fn players(&self) -> u32 {
        if let Some(players) = self.options.get("Players").and_then(|v| v.parse().ok()) {
            return players;
        }
        if let Some(game) = self.game.as_ref().filter(|g| !g.players.is_empty()) {
            return game.seated();
        }
        self.map.as_ref().map(|m| m.countries().len() as u32).unwrap_or(0)
    }

    /// Loads a map definition, dropping any game in progress.
    pub fn load_map(&mut self, path: &str) -> Result<(), EngineError> {
        let json = read_file(path)?;
        let map = Map::from_json(&json)?;
        info!(
            "loaded map '{}' ({} provinces, {} routes), image at {}",
            map.id,
            map.provinces().len(),
            map.routes().len(),
            map.image_path(&self.maps_dir()).display()
        );
        self.map = Some(map);
        self.game = None;
        self.cache.invalidate();
        Ok(())
    }

    /// Loads a game snapshot played on the loaded map.
    pub fn load_game(&mut self, path: &str) -> Result<(), EngineError> {
        let map = self.map.as_ref().ok_or(EngineError::NoMap)?;
        let json = read_file(path)?;
        let game = snapshot::load_game(&json, map)?;
        self.game = Some(game);
        self.cache.invalidate();
        Ok(())
    }

    /// Starts a game from the loaded map's opening position.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        let players = self.players();
        let map = self.map.as_ref().ok_or(EngineError::NoMap)?;
        let game = GameData::new(&map.id, TurnState::initial(map, players));
        info!("new game on map '{}' for {} players", map.id, players);
        self.game = Some(game);
        self.cache.invalidate();
        Ok(())
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> Result<(), EngineError> {
        writeln!(out, "readyok")?;
        Ok(())
    }

    /// Lists the legal orders of the unit in a province.
    pub fn handle_orders<W: Write>(&mut self, province: &str, out: &mut W) -> Result<(), EngineError> {
        let map = self.map.as_ref().ok_or(EngineError::NoMap)?;
        let game = self.game.as_ref().ok_or(EngineError::NoGame)?;
        map.province(province)?;
        let turn = game.current();

        let orders = match turn.phase {
            Phase::OrderWriting => {
                let (_, unit) = turn
                    .unit_at(province)
                    .ok_or_else(|| EngineError::NoUnit(province.to_string()))?;
                game.generator(map, &mut self.cache).valid_orders(unit)
            }
            Phase::Retreating => {
                let dislodged = turn
                    .retreats
                    .get(province)
                    .ok_or_else(|| EngineError::NoUnit(province.to_string()))?;
                valid_retreats(map, turn, dislodged)
            }
            _ => Vec::new(),
        };

        write_orders(out, &orders)?;
        writeln!(out, "ordersok")?;
        Ok(())
    }

    /// Lists every option list of a nation, each headed by `list <n> <count>`.
    pub fn handle_legal<W: Write>(&mut self, nation: &str, out: &mut W) -> Result<(), EngineError> {
        let map = self.map.as_ref().ok_or(EngineError::NoMap)?;
        let game = self.game.as_ref().ok_or(EngineError::NoGame)?;

        let lists = game.generator(map, &mut self.cache).legal_orders_for(nation);
        for (i, options) in lists.iter().enumerate() {
            writeln!(out, "list {} {}", i, options.len())?;
            write_orders(out, options)?;
        }
        writeln!(out, "ordersok")?;
        Ok(())
    }

    /// Submits the order with the given id for a nation.
    pub fn handle_select<W: Write>(
        &mut self,
        nation: &str,
        id: &str,
        out: &mut W,
    ) -> Result<(), EngineError> {
        let map = self.map.as_ref().ok_or(EngineError::NoMap)?;
        let game = self.game.as_mut().ok_or(EngineError::NoGame)?;

        let order = match id.strip_prefix("cancel-") {
            Some(province) => Some(Order::cancel(province)),
            None => game
                .generator(map, &mut self.cache)
                .legal_orders_for(nation)
                .into_iter()
                .flatten()
                .find(|o| o.id() == id),
        };
        let order = order.ok_or_else(|| EngineError::UnknownOrder {
            nation: nation.to_string(),
            id: id.to_string(),
        })?;

        game.submit_order(map, &mut self.cache, nation, order)?;
        writeln!(out, "selected {}", id)?;
        Ok(())
    }

    /// Prints every submitted order of the current turn as a wire record.
    pub fn handle_export<W: Write>(&self, out: &mut W) -> Result<(), EngineError> {
        let game = self.game.as_ref().ok_or(EngineError::NoGame)?;
        let turn = game.current();

        let orders = turn.orders.values().flat_map(|m| m.values());
        let adjustments = turn.adjustments.values().flatten();
        for entry in orders.chain(adjustments) {
            let record = export_order(&entry.order, entry.result);
            writeln!(out, "record {}", serde_json::to_string(&record)?)?;
        }
        writeln!(out, "exportok")?;
        Ok(())
    }

    /// Prints the playable groups for the seated-player count.
    pub fn handle_groups<W: Write>(&self, out: &mut W) -> Result<(), EngineError> {
        let map = self.map.as_ref().ok_or(EngineError::NoMap)?;
        for group in playable_groups(map, self.players()) {
            writeln!(out, "group {} {}", group.owner(), group.countries.join(" "))?;
        }
        writeln!(out, "groupsok")?;
        Ok(())
    }

    /// Prints one random legal order per option list of a nation.
    pub fn handle_random<W: Write>(&mut self, nation: &str, out: &mut W) -> Result<(), EngineError> {
        let map = self.map.as_ref().ok_or(EngineError::NoMap)?;
        let game = self.game.as_ref().ok_or(EngineError::NoGame)?;

        let mut generator = game.generator(map, &mut self.cache);
        let orders = random_orders(&mut generator, nation, &mut self.rng);
        write_orders(out, &orders)?;
        writeln!(out, "ordersok")?;
        Ok(())
    }
}

fn read_file(path: &str) -> Result<String, EngineError> {
    fs::read_to_string(path).map_err(|source| EngineError::Read {
        path: path.to_string(),
        source,
    })
}

fn write_orders<W: Write>(out: &mut W, orders: &[Order]) -> io::Result<()> {
    for order in orders {
        writeln!(out, "order {} {}", order.id(), order)?;
    }
    Ok(())
}
