//! # Storage Layer
//!
//! Persistence is abstracted behind the [`DataStore`] trait so the command layer can
//! run against SQLite in production and a plain in-memory store in tests.
//!
//! ## Transactions
//!
//! Every write goes through [`DataStore::transaction`]. The closure receives a
//! [`StoreWriter`] handle; returning `Ok` commits everything it wrote, returning
//! `Err` (or unwinding early with `?`) discards all of it. Reads that need no
//! isolation go through [`DataStore::read`].
//!
//! ## Implementations
//!
//! - [`sqlite::SqliteStore`]: production storage in a single SQLite file
//!   - Tables: `tree_types`, `locations`, `stock_entries`, `sales`, `meta`
//!   - Quantity and uniqueness invariants are also enforced by the schema
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!   - Works on a copy of its tables inside a transaction and swaps it in on commit

use crate::error::Result;
use crate::model::{
    Location, NewLocation, NewSale, NewTreeType, RecordId, Sale, StockEntry, TreeType,
};
use chrono::{DateTime, Utc};

pub mod memory;
pub mod sqlite;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockFilter {
    pub tree_type_id: Option<RecordId>,
    pub location_id: Option<RecordId>,
}

impl StockFilter {
    pub fn for_type(tree_type_id: RecordId) -> Self {
        Self {
            tree_type_id: Some(tree_type_id),
            location_id: None,
        }
    }

    pub fn for_pair(tree_type_id: RecordId, location_id: RecordId) -> Self {
        Self {
            tree_type_id: Some(tree_type_id),
            location_id: Some(location_id),
        }
    }

    pub(crate) fn matches(&self, entry: &StockEntry) -> bool {
        self.tree_type_id.map_or(true, |id| id == entry.tree_type_id)
            && self.location_id.map_or(true, |id| id == entry.location_id)
    }
}

/// Half-open time window: `from <= sold_at < until`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleFilter {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl SaleFilter {
    pub(crate) fn matches(&self, sale: &Sale) -> bool {
        self.from.map_or(true, |from| sale.sold_at >= from)
            && self.until.map_or(true, |until| sale.sold_at < until)
    }
}

/// Read access to persisted records. All listings come back in id order.
pub trait StoreReader {
    fn tree_types(&self) -> Result<Vec<TreeType>>;

    fn tree_type(&self, id: RecordId) -> Result<Option<TreeType>>;

    /// Name lookups are case-insensitive.
    fn tree_type_by_name(&self, name: &str) -> Result<Option<TreeType>>;

    fn locations(&self) -> Result<Vec<Location>>;

    fn location(&self, id: RecordId) -> Result<Option<Location>>;

    fn location_by_name(&self, name: &str) -> Result<Option<Location>>;

    fn stock_entries(&self, filter: &StockFilter) -> Result<Vec<StockEntry>>;

    fn sales(&self, filter: &SaleFilter) -> Result<Vec<Sale>>;
}

/// Write access, only available inside a transaction.
pub trait StoreWriter: StoreReader {
    fn insert_tree_type(&mut self, new: &NewTreeType) -> Result<TreeType>;

    fn insert_location(&mut self, new: &NewLocation) -> Result<Location>;

    fn insert_stock_entry(
        &mut self,
        tree_type_id: RecordId,
        location_id: RecordId,
        quantity: i64,
    ) -> Result<StockEntry>;

    /// Overwrite an entry's quantity. Negative quantities are rejected.
    fn set_stock_quantity(&mut self, entry_id: RecordId, quantity: i64) -> Result<StockEntry>;

    fn insert_sale(&mut self, new: &NewSale) -> Result<Sale>;
}

/// Abstract interface for inventory storage.
pub trait DataStore {
    /// Create the schema if it does not exist yet.
    fn migrate(&mut self) -> Result<()>;

    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn StoreReader) -> Result<T>;

    /// Run `f` as one atomic unit: commit on `Ok`, roll back on `Err`.
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn StoreWriter) -> Result<T>;
}
