//! Unit types and positions.
//!
//! A unit belongs to whichever nation's roster lists it; the unit itself
//! only records where it stands and what it is.

use serde::{Deserialize, Serialize};

/// The type of a military unit. Serialized as its wire code (army=0, fleet=1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum UnitType {
    Army,
    Fleet,
}

impl UnitType {
    /// Returns the integer code used on the wire.
    pub const fn code(self) -> i32 {
        match self {
            UnitType::Army => 0,
            UnitType::Fleet => 1,
        }
    }

    /// Returns the lowercase name used in order ids.
    pub const fn name(self) -> &'static str {
        match self {
            UnitType::Army => "army",
            UnitType::Fleet => "fleet",
        }
    }

    /// Returns the uppercase abbreviation used in order notation.
    pub const fn notation_char(self) -> char {
        match self {
            UnitType::Army => 'A',
            UnitType::Fleet => 'F',
        }
    }

    /// Parses a unit type from its uppercase abbreviation.
    pub fn from_notation_char(c: char) -> Option<UnitType> {
        match c {
            'A' => Some(UnitType::Army),
            'F' => Some(UnitType::Fleet),
            _ => None,
        }
    }
}

impl TryFrom<i32> for UnitType {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(UnitType::Army),
            1 => Ok(UnitType::Fleet),
            other => Err(format!("unknown unit type code {}", other)),
        }
    }
}

impl From<UnitType> for i32 {
    fn from(unit_type: UnitType) -> i32 {
        unit_type.code()
    }
}

/// A military unit on the board.
///
/// `coast` is empty unless the unit is a fleet on a multi-coast province.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub province: String,
    #[serde(default)]
    pub coast: String,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
}

impl Unit {
    /// Creates an army in the given province.
    pub fn army(province: &str) -> Self {
        Unit {
            province: province.to_string(),
            coast: String::new(),
            unit_type: UnitType::Army,
        }
    }

    /// Creates a fleet in the given province at the given coast ("" for none).
    pub fn fleet(province: &str, coast: &str) -> Self {
        Unit {
            province: province.to_string(),
            coast: coast.to_string(),
            unit_type: UnitType::Fleet,
        }
    }

    pub fn is_army(&self) -> bool {
        self.unit_type == UnitType::Army
    }

    pub fn is_fleet(&self) -> bool {
        self.unit_type == UnitType::Fleet
    }
}
