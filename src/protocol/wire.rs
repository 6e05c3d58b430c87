//! Flat wire records for orders.
//!
//! Every order exports to an `OrderRecord`: the integer kind code, the acting
//! province under `unit`, the adjudication result, and the variant's own
//! fields. Import is the inverse and checks the fields each kind requires,
//! failing on the first one that is missing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::board::order::{Order, OrderEntry, OrderKind, OrderResult};
use crate::board::unit::UnitType;

/// Errors that can occur when importing an order record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("unknown order kind {0}")]
    UnknownKind(i32),

    #[error("{kind} order is missing required field '{field}'")]
    MissingField { kind: OrderKind, field: &'static str },

    #[error("malformed order record: {0}")]
    Malformed(String),
}

/// An order as transferred over the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub kind: i32,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub result: OrderResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convoy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supporting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<UnitType>,
}

impl OrderRecord {
    /// Exports an order and its result.
    pub fn export(order: &Order, result: OrderResult) -> OrderRecord {
        let mut record = OrderRecord {
            kind: order.kind().code(),
            unit: Some(order.province().to_string()),
            result,
            ..OrderRecord::default()
        };
        match order {
            Order::Cancel { .. } | Order::Hold { .. } => {}
            Order::Move { dest, coast, convoy, .. } => {
                record.dest = Some(dest.clone());
                record.coast = Some(coast.clone());
                record.convoy = Some(*convoy);
            }
            Order::Convoy { start, end, .. } => {
                record.start = Some(start.clone());
                record.end = Some(end.clone());
            }
            Order::SupportHold { supporting, .. } => {
                record.supporting = Some(supporting.clone());
            }
            Order::SupportMove { supporting, from, .. } => {
                record.supporting = Some(supporting.clone());
                record.from = Some(from.clone());
            }
            Order::Retreat { dest, coast, .. } => {
                record.dest = Some(dest.clone());
                record.coast = Some(coast.clone());
            }
            Order::Build { country, unit_type, coast, .. } => {
                record.country = Some(country.clone());
                record.unit_type = Some(*unit_type);
                record.coast = Some(coast.clone());
            }
            Order::Disband { country, .. } | Order::Pass { country } => {
                record.country = Some(country.clone());
            }
        }
        record
    }

    /// Reconstructs the order and result described by this record.
    pub fn import(&self) -> Result<(Order, OrderResult), ImportError> {
        let kind = OrderKind::from_code(self.kind).ok_or(ImportError::UnknownKind(self.kind))?;
        let field = |value: &Option<String>, name: &'static str| -> Result<String, ImportError> {
            match value {
                Some(v) if !v.is_empty() => Ok(v.clone()),
                _ => Err(ImportError::MissingField { kind, field: name }),
            }
        };
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();

        let order = match kind {
            OrderKind::Cancel => Order::Cancel {
                province: field(&self.unit, "unit")?,
            },
            OrderKind::Hold => Order::Hold {
                province: field(&self.unit, "unit")?,
            },
            OrderKind::Move => Order::Move {
                province: field(&self.unit, "unit")?,
                dest: field(&self.dest, "dest")?,
                coast: optional(&self.coast),
                convoy: self.convoy.unwrap_or(false),
            },
            OrderKind::SupportHold => Order::SupportHold {
                province: field(&self.unit, "unit")?,
                supporting: field(&self.supporting, "supporting")?,
            },
            OrderKind::SupportMove => Order::SupportMove {
                province: field(&self.unit, "unit")?,
                supporting: field(&self.supporting, "supporting")?,
                from: field(&self.from, "from")?,
            },
            OrderKind::Convoy => Order::Convoy {
                province: field(&self.unit, "unit")?,
                start: field(&self.start, "start")?,
                end: field(&self.end, "end")?,
            },
            OrderKind::Retreat => Order::Retreat {
                province: field(&self.unit, "unit")?,
                dest: field(&self.dest, "dest")?,
                coast: optional(&self.coast),
            },
            OrderKind::Disband => Order::Disband {
                country: field(&self.country, "country")?,
                province: field(&self.unit, "unit")?,
            },
            OrderKind::Build => Order::Build {
                country: field(&self.country, "country")?,
                province: field(&self.unit, "unit")?,
                unit_type: self.unit_type.ok_or(ImportError::MissingField {
                    kind,
                    field: "unitType",
                })?,
                coast: optional(&self.coast),
            },
            OrderKind::Pass => Order::Pass {
                country: field(&self.country, "country")?,
            },
        };
        Ok((order, self.result))
    }
}

/// Exports an order with its result to a wire record.
pub fn export_order(order: &Order, result: OrderResult) -> OrderRecord {
    OrderRecord::export(order, result)
}

/// Imports an order from a wire record.
pub fn import_order(record: &OrderRecord) -> Result<(Order, OrderResult), ImportError> {
    record.import()
}

/// Imports an order from a JSON wire record.
pub fn import_order_json(json: &str) -> Result<(Order, OrderResult), ImportError> {
    let record: OrderRecord =
        serde_json::from_str(json).map_err(|e| ImportError::Malformed(e.to_string()))?;
    record.import()
}

impl Serialize for OrderEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OrderRecord::export(&self.order, self.result).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OrderEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = OrderRecord::deserialize(deserializer)?;
        let (order, result) = record.import().map_err(serde::de::Error::custom)?;
        Ok(OrderEntry { order, result })
    }
}
