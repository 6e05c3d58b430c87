//! Order types for all phases.
//!
//! Each variant carries exactly the parameters that identify it. The id
//! string of an order is a pure function of its kind and parameters, so two
//! orders are the same order exactly when their ids match.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::unit::UnitType;

/// The closed set of order kinds, with their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderKind {
    Cancel,
    Hold,
    Move,
    SupportHold,
    SupportMove,
    Convoy,
    Retreat,
    Disband,
    Build,
    Pass,
}

impl OrderKind {
    /// Returns the integer code used on the wire.
    pub const fn code(self) -> i32 {
        match self {
            OrderKind::Cancel => -1,
            OrderKind::Hold => 0,
            OrderKind::Move => 1,
            OrderKind::SupportHold => 2,
            OrderKind::SupportMove => 3,
            OrderKind::Convoy => 4,
            OrderKind::Retreat => 5,
            OrderKind::Disband => 6,
            OrderKind::Build => 7,
            OrderKind::Pass => 8,
        }
    }

    /// Parses a kind from its wire code.
    pub fn from_code(code: i32) -> Option<OrderKind> {
        match code {
            -1 => Some(OrderKind::Cancel),
            0 => Some(OrderKind::Hold),
            1 => Some(OrderKind::Move),
            2 => Some(OrderKind::SupportHold),
            3 => Some(OrderKind::SupportMove),
            4 => Some(OrderKind::Convoy),
            5 => Some(OrderKind::Retreat),
            6 => Some(OrderKind::Disband),
            7 => Some(OrderKind::Build),
            8 => Some(OrderKind::Pass),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            OrderKind::Cancel => "cancel",
            OrderKind::Hold => "hold",
            OrderKind::Move => "move",
            OrderKind::SupportHold => "supportHold",
            OrderKind::SupportMove => "supportMove",
            OrderKind::Convoy => "convoy",
            OrderKind::Retreat => "retreat",
            OrderKind::Disband => "disband",
            OrderKind::Build => "build",
            OrderKind::Pass => "pass",
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome tag written by the adjudicator. Serialized as its wire code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum OrderResult {
    #[default]
    Unprocessed,
    Fail,
    Success,
    Dislodged,
}

impl TryFrom<i32> for OrderResult {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(OrderResult::Unprocessed),
            1 => Ok(OrderResult::Fail),
            2 => Ok(OrderResult::Success),
            3 => Ok(OrderResult::Dislodged),
            other => Err(format!("unknown order result code {}", other)),
        }
    }
}

impl From<OrderResult> for i32 {
    fn from(result: OrderResult) -> i32 {
        match result {
            OrderResult::Unprocessed => 0,
            OrderResult::Fail => 1,
            OrderResult::Success => 2,
            OrderResult::Dislodged => 3,
        }
    }
}

/// An order for any phase.
///
/// `province` is always the acting province; empty `coast` fields mean the
/// destination has no named coast.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Order {
    /// Withdraws the order previously selected for `province`.
    Cancel { province: String },

    Hold { province: String },

    /// `convoy` marks a move that needs an unbroken fleet chain.
    Move {
        province: String,
        dest: String,
        coast: String,
        convoy: bool,
    },

    /// A fleet offers to carry the army at `start` to `end`.
    Convoy {
        province: String,
        start: String,
        end: String,
    },

    SupportHold { province: String, supporting: String },

    /// Supports the unit at `from` moving into `supporting`.
    SupportMove {
        province: String,
        supporting: String,
        from: String,
    },

    Retreat {
        province: String,
        dest: String,
        coast: String,
    },

    Build {
        country: String,
        province: String,
        unit_type: UnitType,
        coast: String,
    },

    Disband { country: String, province: String },

    /// Declines one build.
    Pass { country: String },
}

impl Order {
    pub fn cancel(province: &str) -> Order {
        Order::Cancel { province: province.to_string() }
    }

    pub fn hold(province: &str) -> Order {
        Order::Hold { province: province.to_string() }
    }

    pub fn direct_move(province: &str, dest: &str, coast: &str) -> Order {
        Order::Move {
            province: province.to_string(),
            dest: dest.to_string(),
            coast: coast.to_string(),
            convoy: false,
        }
    }

    pub fn convoyed_move(province: &str, dest: &str) -> Order {
        Order::Move {
            province: province.to_string(),
            dest: dest.to_string(),
            coast: String::new(),
            convoy: true,
        }
    }

    pub fn convoy(province: &str, start: &str, end: &str) -> Order {
        Order::Convoy {
            province: province.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn support_hold(province: &str, supporting: &str) -> Order {
        Order::SupportHold {
            province: province.to_string(),
            supporting: supporting.to_string(),
        }
    }

    pub fn support_move(province: &str, supporting: &str, from: &str) -> Order {
        Order::SupportMove {
            province: province.to_string(),
            supporting: supporting.to_string(),
            from: from.to_string(),
        }
    }

    pub fn retreat(province: &str, dest: &str, coast: &str) -> Order {
        Order::Retreat {
            province: province.to_string(),
            dest: dest.to_string(),
            coast: coast.to_string(),
        }
    }

    pub fn build(country: &str, province: &str, unit_type: UnitType, coast: &str) -> Order {
        Order::Build {
            country: country.to_string(),
            province: province.to_string(),
            unit_type,
            coast: coast.to_string(),
        }
    }

    pub fn disband(country: &str, province: &str) -> Order {
        Order::Disband {
            country: country.to_string(),
            province: province.to_string(),
        }
    }

    pub fn pass(country: &str) -> Order {
        Order::Pass { country: country.to_string() }
    }

    pub fn kind(&self) -> OrderKind {
        match self {
            Order::Cancel { .. } => OrderKind::Cancel,
            Order::Hold { .. } => OrderKind::Hold,
            Order::Move { .. } => OrderKind::Move,
            Order::Convoy { .. } => OrderKind::Convoy,
            Order::SupportHold { .. } => OrderKind::SupportHold,
            Order::SupportMove { .. } => OrderKind::SupportMove,
            Order::Retreat { .. } => OrderKind::Retreat,
            Order::Build { .. } => OrderKind::Build,
            Order::Disband { .. } => OrderKind::Disband,
            Order::Pass { .. } => OrderKind::Pass,
        }
    }

    /// Returns the acting province, or "" for `Pass`.
    pub fn province(&self) -> &str {
        match self {
            Order::Cancel { province }
            | Order::Hold { province }
            | Order::Move { province, .. }
            | Order::Convoy { province, .. }
            | Order::SupportHold { province, .. }
            | Order::SupportMove { province, .. }
            | Order::Retreat { province, .. }
            | Order::Build { province, .. }
            | Order::Disband { province, .. } => province.as_str(),
            Order::Pass { .. } => "",
        }
    }

    /// Returns the destination province of a move or retreat.
    pub fn destination(&self) -> Option<&str> {
        match self {
            Order::Move { dest, .. } | Order::Retreat { dest, .. } => Some(dest.as_str()),
            _ => None,
        }
    }

    /// Returns true for orders of the build/disband phase.
    pub fn is_adjustment(&self) -> bool {
        matches!(
            self,
            Order::Build { .. } | Order::Disband { .. } | Order::Pass { .. }
        )
    }

    /// Returns the content-addressed id of this order.
    pub fn id(&self) -> String {
        match self {
            Order::Cancel { province } => format!("cancel-{}", province),
            Order::Hold { province } => format!("hold-{}", province),
            Order::Move { province, dest, coast, convoy } => format!(
                "move-{}-{}{}{}",
                province,
                dest,
                coast_suffix(coast),
                if *convoy { "-convoy" } else { "" }
            ),
            Order::Convoy { province, start, end } => {
                format!("convoy-{}-{}-{}", province, start, end)
            }
            Order::SupportHold { province, supporting } => {
                format!("support-{}-{}", province, supporting)
            }
            Order::SupportMove { province, supporting, from } => {
                format!("support-{}-{}-{}", province, from, supporting)
            }
            Order::Retreat { province, dest, coast } => {
                format!("retreat-{}-{}{}", province, dest, coast_suffix(coast))
            }
            Order::Build { country, province, unit_type, coast } => format!(
                "build-{}-{}-{}{}",
                country,
                province,
                unit_type.name(),
                coast_suffix(coast)
            ),
            Order::Disband { country, province } => format!("disband-{}-{}", country, province),
            Order::Pass { .. } => "pass".to_string(),
        }
    }
}

fn coast_suffix(coast: &str) -> String {
    if coast.is_empty() {
        String::new()
    } else {
        format!("/{}", coast)
    }
}

fn location(province: &str, coast: &str) -> String {
    format!("{}{}", province, coast_suffix(coast))
}

/// Human-readable notation: `bre - mao`, `mao C par - spa`, `gas S par - bre`,
/// `B F spa/sc`, `W`.
impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Cancel { province } => write!(f, "{} X", province),
            Order::Hold { province } => write!(f, "{} H", province),
            Order::Move { province, dest, coast, convoy } => {
                write!(f, "{} - {}", province, location(dest, coast))?;
                if *convoy {
                    f.write_str(" via C")?;
                }
                Ok(())
            }
            Order::Convoy { province, start, end } => {
                write!(f, "{} C {} - {}", province, start, end)
            }
            Order::SupportHold { province, supporting } => {
                write!(f, "{} S {} H", province, supporting)
            }
            Order::SupportMove { province, supporting, from } => {
                write!(f, "{} S {} - {}", province, from, supporting)
            }
            Order::Retreat { province, dest, coast } => {
                write!(f, "{} R {}", province, location(dest, coast))
            }
            Order::Build { province, unit_type, coast, .. } => {
                write!(f, "B {} {}", unit_type.notation_char(), location(province, coast))
            }
            Order::Disband { province, .. } => write!(f, "{} D", province),
            Order::Pass { .. } => f.write_str("W"),
        }
    }
}

/// A submitted order together with its adjudication result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEntry {
    pub order: Order,
    pub result: OrderResult,
}

impl OrderEntry {
    pub fn unprocessed(order: Order) -> Self {
        OrderEntry {
            order,
            result: OrderResult::Unprocessed,
        }
    }
}
