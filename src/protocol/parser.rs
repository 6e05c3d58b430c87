//! Host command parser.
//!
//! Parses incoming line commands from raw text into structured `Command`
//! variants that the host main loop can dispatch on.

use log::warn;

/// A parsed command for the rules host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Synchronization ping; the host must reply `readyok`.
    IsReady,

    /// Set a host option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Load a map definition from a JSON file.
    LoadMap { path: String },

    /// Load a game snapshot from a JSON file, checked against the loaded map.
    LoadGame { path: String },

    /// Start a fresh game from the loaded map's opening position.
    NewGame,

    /// List the legal orders of the unit in a province.
    Orders { province: String },

    /// List every option list of a nation for the current phase.
    Legal { nation: String },

    /// Submit an order by id for a nation.
    Select { nation: String, order_id: String },

    /// Print the orders submitted in the current turn as wire records.
    Export,

    /// Print the playable groups for the seated-player count.
    Groups,

    /// Pick a random legal order set for a nation.
    Random { nation: String },

    /// Terminate the host process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    match tokens[0] {
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),
        "export" => Some(Command::Export),
        "groups" => Some(Command::Groups),

        "setoption" => parse_setoption(&tokens),
        "loadmap" => rest_of_line(trimmed, "loadmap").map(|path| Command::LoadMap { path }),
        "loadgame" => rest_of_line(trimmed, "loadgame").map(|path| Command::LoadGame { path }),
        "orders" => single_arg(&tokens).map(|province| Command::Orders { province }),
        "legal" => single_arg(&tokens).map(|nation| Command::Legal { nation }),
        "random" => single_arg(&tokens).map(|nation| Command::Random { nation }),
        "select" => parse_select(&tokens),

        other => {
            warn!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");

    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                warn!("malformed setoption: empty name");
                return None;
            }
            let name = name_parts.join(" ");
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name, value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `select <nation> <order-id>`.
fn parse_select(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 3 {
        warn!("malformed select: expected 'select <nation> <order-id>'");
        return None;
    }
    Some(Command::Select {
        nation: tokens[1].to_string(),
        order_id: tokens[2].to_string(),
    })
}

/// The one argument of `orders`, `legal` and `random`.
fn single_arg(tokens: &[&str]) -> Option<String> {
    if tokens.len() != 2 {
        warn!("malformed {}: expected '{} <id>'", tokens[0], tokens[0]);
        return None;
    }
    Some(tokens[1].to_string())
}

/// Everything after the command word, so paths may contain spaces.
fn rest_of_line(line: &str, command: &str) -> Option<String> {
    let rest = line.strip_prefix(command).unwrap_or("").trim();
    if rest.is_empty() {
        warn!("malformed {}: expected '{} <path>'", command, command);
        return None;
    }
    Some(rest.to_string())
}
