use crate::error::{GreenGrowError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type RecordId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeType {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Quantity of one tree type held at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub id: RecordId,
    pub tree_type_id: RecordId,
    pub location_id: RecordId,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A completed sale. Rows are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: RecordId,
    pub tree_type_id: RecordId,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub sold_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTreeType {
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub tree_type_id: RecordId,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl NewSale {
    pub fn total_amount(&self) -> Result<Decimal> {
        line_amount(self.unit_price, self.quantity)
    }
}

/// Stock entry joined with the names it references, for display.
#[derive(Debug, Clone, Serialize)]
pub struct StockLine {
    pub entry: StockEntry,
    pub tree_type: String,
    pub location: String,
    pub unit_price: Decimal,
    /// `unit_price` times the entry's quantity.
    pub value: Decimal,
}

/// Sale joined with its tree type name, for display.
#[derive(Debug, Clone, Serialize)]
pub struct SaleLine {
    pub sale: Sale,
    pub tree_type: String,
}

/// A user-supplied reference to a tree type or location.
///
/// Anything that parses as a positive integer is an id; everything else is a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
    Id(RecordId),
    Name(String),
}

impl FromStr for RecordRef {
    type Err = GreenGrowError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(GreenGrowError::InvalidName);
        }
        match trimmed.parse::<RecordId>() {
            Ok(id) if id > 0 => Ok(RecordRef::Id(id)),
            _ => Ok(RecordRef::Name(trimmed.to_string())),
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Id(id) => write!(f, "#{}", id),
            RecordRef::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for RecordRef {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| RecordRef::Name(s.to_string()))
    }
}

/// Rejects zero and negative quantities.
pub fn positive_quantity(quantity: i64) -> Result<i64> {
    if quantity <= 0 {
        return Err(GreenGrowError::InvalidQuantity(quantity));
    }
    Ok(quantity)
}

/// `unit_price × quantity`, failing instead of overflowing.
pub fn line_amount(unit_price: Decimal, quantity: i64) -> Result<Decimal> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| GreenGrowError::Overflow(format!("{} x {}", quantity, unit_price)))
}

/// Adds up amounts, failing instead of overflowing. `what` names the total in the error.
pub fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>, what: &str) -> Result<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(|| GreenGrowError::Overflow(what.to_string()))
}

/// Trims a record name, rejecting blank ones.
pub fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GreenGrowError::InvalidName);
    }
    Ok(trimmed.to_string())
}

pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub(crate) fn from_ms(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}
