//! # Stock Ledger
//!
//! The rules every stock movement obeys. Functions here take an open
//! [`StoreWriter`], so the caller decides the transaction boundary; each command
//! runs exactly one ledger operation per transaction.
//!
//! Invariants:
//! - no operation leaves a stock entry with a negative quantity
//! - a failed operation writes nothing the caller could commit by accident:
//!   every check runs before the first write
//! - a sale stores the tree type's base price as read inside the same transaction

use crate::config::SalePolicy;
use crate::error::{GreenGrowError, RecordKind, Result};
use crate::model::{positive_quantity, Location, NewSale, Sale, StockEntry, TreeType};
use crate::store::{StockFilter, StoreWriter};
use tracing::debug;

/// Both sides of a completed transfer, after the move.
#[derive(Debug, Clone)]
pub struct Transfer {
    pub source: StockEntry,
    pub destination: StockEntry,
}

/// A recorded sale and the entries it drew from, after decrementing.
#[derive(Debug, Clone)]
pub struct SaleOutcome {
    pub sale: Sale,
    pub drawn: Vec<Draw>,
}

#[derive(Debug, Clone)]
pub struct Draw {
    pub entry: StockEntry,
    pub taken: i64,
}

/// Add `quantity` to the (type, location) entry, creating it on first restock.
pub fn restock<W: StoreWriter + ?Sized>(
    tx: &mut W,
    tree_type: &TreeType,
    location: &Location,
    quantity: i64,
) -> Result<StockEntry> {
    let quantity = positive_quantity(quantity)?;
    let entry = deposit(tx, tree_type, location, quantity)?;
    debug!(
        tree_type = %tree_type.name,
        location = %location.name,
        quantity,
        total = entry.quantity,
        "restocked"
    );
    Ok(entry)
}

/// Move `quantity` of one type from `source` to `destination`.
pub fn transfer<W: StoreWriter + ?Sized>(
    tx: &mut W,
    tree_type: &TreeType,
    source: &Location,
    destination: &Location,
    quantity: i64,
) -> Result<Transfer> {
    let quantity = positive_quantity(quantity)?;
    if source.id == destination.id {
        return Err(GreenGrowError::SameLocation(source.name.clone()));
    }

    let from = entry_at(&*tx, tree_type, source)?;
    if from.quantity < quantity {
        return Err(GreenGrowError::InsufficientStock {
            tree_type: tree_type.name.clone(),
            requested: quantity,
            available: from.quantity,
        });
    }

    let source_entry = tx.set_stock_quantity(from.id, from.quantity - quantity)?;
    let destination_entry = deposit(tx, tree_type, destination, quantity)?;
    debug!(
        tree_type = %tree_type.name,
        from = %source.name,
        to = %destination.name,
        quantity,
        "transferred"
    );
    Ok(Transfer {
        source: source_entry,
        destination: destination_entry,
    })
}

/// Decrement stock for a sale and append the sale record.
///
/// With a location, only that location's entry is drawn from. Without one,
/// `policy` decides which entries cover the quantity.
pub fn record_sale<W: StoreWriter + ?Sized>(
    tx: &mut W,
    tree_type: &TreeType,
    quantity: i64,
    location: Option<&Location>,
    policy: SalePolicy,
) -> Result<SaleOutcome> {
    let quantity = positive_quantity(quantity)?;
    let new_sale = NewSale {
        tree_type_id: tree_type.id,
        quantity,
        unit_price: tree_type.base_price,
    };
    new_sale.total_amount()?;

    let plan = match location {
        Some(location) => {
            let entry = entry_at(&*tx, tree_type, location)?;
            if entry.quantity < quantity {
                return Err(insufficient(tree_type, quantity, entry.quantity));
            }
            vec![(entry, quantity)]
        }
        None => plan_unlocated_sale(&*tx, tree_type, quantity, policy)?,
    };

    let mut drawn = Vec::with_capacity(plan.len());
    for (entry, taken) in plan {
        let entry = tx.set_stock_quantity(entry.id, entry.quantity - taken)?;
        drawn.push(Draw { entry, taken });
    }

    let sale = tx.insert_sale(&new_sale)?;
    debug!(
        tree_type = %tree_type.name,
        quantity,
        unit_price = %sale.unit_price,
        entries = drawn.len(),
        "sale recorded"
    );
    Ok(SaleOutcome { sale, drawn })
}

fn plan_unlocated_sale<W: StoreWriter + ?Sized>(
    tx: &W,
    tree_type: &TreeType,
    quantity: i64,
    policy: SalePolicy,
) -> Result<Vec<(StockEntry, i64)>> {
    let mut entries: Vec<StockEntry> = tx
        .stock_entries(&StockFilter::for_type(tree_type.id))?
        .into_iter()
        .filter(|e| e.quantity > 0)
        .collect();

    match policy {
        SalePolicy::SingleEntry => {
            match entries.iter().find(|e| e.quantity >= quantity) {
                Some(entry) => Ok(vec![(entry.clone(), quantity)]),
                None => {
                    let largest = entries.iter().map(|e| e.quantity).max().unwrap_or(0);
                    Err(insufficient(tree_type, quantity, largest))
                }
            }
        }
        SalePolicy::Fifo => {
            // Saturates at i64::MAX, which still covers any requested quantity.
            let available = entries
                .iter()
                .fold(0i64, |total, e| total.saturating_add(e.quantity));
            if available < quantity {
                return Err(insufficient(tree_type, quantity, available));
            }
            entries.sort_by_key(|e| (e.created_at, e.id));

            let mut remaining = quantity;
            let mut plan = Vec::new();
            for entry in entries {
                if remaining == 0 {
                    break;
                }
                let taken = remaining.min(entry.quantity);
                remaining -= taken;
                plan.push((entry, taken));
            }
            Ok(plan)
        }
    }
}

fn deposit<W: StoreWriter + ?Sized>(
    tx: &mut W,
    tree_type: &TreeType,
    location: &Location,
    quantity: i64,
) -> Result<StockEntry> {
    let existing = tx
        .stock_entries(&StockFilter::for_pair(tree_type.id, location.id))?
        .into_iter()
        .next();
    match existing {
        Some(entry) => {
            let total = entry
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| {
                    GreenGrowError::Overflow(format!(
                        "{} at {} cannot hold {} more seedlings (has {})",
                        tree_type.name, location.name, quantity, entry.quantity
                    ))
                })?;
            tx.set_stock_quantity(entry.id, total)
        }
        None => tx.insert_stock_entry(tree_type.id, location.id, quantity),
    }
}

fn entry_at<W: StoreWriter + ?Sized>(
    tx: &W,
    tree_type: &TreeType,
    location: &Location,
) -> Result<StockEntry> {
    tx.stock_entries(&StockFilter::for_pair(tree_type.id, location.id))?
        .into_iter()
        .next()
        .ok_or_else(|| {
            GreenGrowError::not_found(
                RecordKind::StockEntry,
                format!("{} at {}", tree_type.name, location.name),
            )
        })
}

fn insufficient(tree_type: &TreeType, requested: i64, available: i64) -> GreenGrowError {
    GreenGrowError::InsufficientStock {
        tree_type: tree_type.name.clone(),
        requested,
        available,
    }
}
