use super::{DataStore, SaleFilter, StockFilter, StoreReader, StoreWriter};
use crate::error::{GreenGrowError, RecordKind, Result};
use crate::model::{
    from_ms, now_ms, Location, NewLocation, NewSale, NewTreeType, RecordId, Sale, StockEntry,
    TreeType,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    tree_types: Vec<TreeType>,
    locations: Vec<Location>,
    stock: Vec<StockEntry>,
    sales: Vec<Sale>,
    last_id: RecordId,
    fail_sale_inserts: bool,
}

impl Tables {
    fn next_id(&mut self) -> RecordId {
        self.last_id += 1;
        self.last_id
    }
}

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Tables,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every sale insert fail, to exercise rollback paths.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn with_failing_sale_inserts(mut self) -> Self {
        self.tables.fail_sale_inserts = true;
        self
    }
}

impl DataStore for InMemoryStore {
    fn migrate(&mut self) -> Result<()> {
        Ok(())
    }

    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn StoreReader) -> Result<T>,
    {
        f(&self.tables)
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn StoreWriter) -> Result<T>,
    {
        let mut working = self.tables.clone();
        let value = f(&mut working)?;
        self.tables = working;
        Ok(value)
    }
}

impl StoreReader for Tables {
    fn tree_types(&self) -> Result<Vec<TreeType>> {
        Ok(self.tree_types.clone())
    }

    fn tree_type(&self, id: RecordId) -> Result<Option<TreeType>> {
        Ok(self.tree_types.iter().find(|t| t.id == id).cloned())
    }

    fn tree_type_by_name(&self, name: &str) -> Result<Option<TreeType>> {
        Ok(self
            .tree_types
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    fn locations(&self) -> Result<Vec<Location>> {
        Ok(self.locations.clone())
    }

    fn location(&self, id: RecordId) -> Result<Option<Location>> {
        Ok(self.locations.iter().find(|l| l.id == id).cloned())
    }

    fn location_by_name(&self, name: &str) -> Result<Option<Location>> {
        Ok(self
            .locations
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    fn stock_entries(&self, filter: &StockFilter) -> Result<Vec<StockEntry>> {
        Ok(self
            .stock
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    fn sales(&self, filter: &SaleFilter) -> Result<Vec<Sale>> {
        Ok(self
            .sales
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }
}

impl StoreWriter for Tables {
    fn insert_tree_type(&mut self, new: &NewTreeType) -> Result<TreeType> {
        if self.tree_type_by_name(&new.name)?.is_some() {
            return Err(GreenGrowError::DuplicateName {
                kind: RecordKind::TreeType,
                name: new.name.clone(),
            });
        }
        let tree_type = TreeType {
            id: self.next_id(),
            name: new.name.clone(),
            description: new.description.clone(),
            base_price: new.base_price,
            created_at: from_ms(now_ms()),
        };
        self.tree_types.push(tree_type.clone());
        Ok(tree_type)
    }

    fn insert_location(&mut self, new: &NewLocation) -> Result<Location> {
        if self.location_by_name(&new.name)?.is_some() {
            return Err(GreenGrowError::DuplicateName {
                kind: RecordKind::Location,
                name: new.name.clone(),
            });
        }
        let location = Location {
            id: self.next_id(),
            name: new.name.clone(),
            description: new.description.clone(),
            created_at: from_ms(now_ms()),
        };
        self.locations.push(location.clone());
        Ok(location)
    }

    fn insert_stock_entry(
        &mut self,
        tree_type_id: RecordId,
        location_id: RecordId,
        quantity: i64,
    ) -> Result<StockEntry> {
        if quantity < 0 {
            return Err(GreenGrowError::InvalidQuantity(quantity));
        }
        let now = from_ms(now_ms());
        let entry = StockEntry {
            id: self.next_id(),
            tree_type_id,
            location_id,
            quantity,
            created_at: now,
            updated_at: now,
        };
        self.stock.push(entry.clone());
        Ok(entry)
    }

    fn set_stock_quantity(&mut self, entry_id: RecordId, quantity: i64) -> Result<StockEntry> {
        if quantity < 0 {
            return Err(GreenGrowError::InvalidQuantity(quantity));
        }
        let entry = self
            .stock
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| {
                GreenGrowError::not_found(RecordKind::StockEntry, format!("#{}", entry_id))
            })?;
        entry.quantity = quantity;
        entry.updated_at = from_ms(now_ms());
        Ok(entry.clone())
    }

    fn insert_sale(&mut self, new: &NewSale) -> Result<Sale> {
        if self.fail_sale_inserts {
            return Err(GreenGrowError::Io(std::io::Error::other(
                "sale insert disabled",
            )));
        }
        let sale = Sale {
            id: self.next_id(),
            tree_type_id: new.tree_type_id,
            quantity: new.quantity,
            unit_price: new.unit_price,
            total_amount: new.total_amount()?,
            sold_at: from_ms(now_ms()),
        };
        self.sales.push(sale.clone());
        Ok(sale)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use rust_decimal::Decimal;

    /// Builder for a store pre-populated with catalog records and stock.
    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_type(mut self, name: &str, price: Decimal) -> Self {
            self.store
                .transaction(|tx| {
                    tx.insert_tree_type(&NewTreeType {
                        name: name.to_string(),
                        description: None,
                        base_price: price,
                    })
                })
                .unwrap();
            self
        }

        pub fn with_location(mut self, name: &str) -> Self {
            self.store
                .transaction(|tx| {
                    tx.insert_location(&NewLocation {
                        name: name.to_string(),
                        description: None,
                    })
                })
                .unwrap();
            self
        }

        /// Adds a stock entry; the type and location must already exist.
        pub fn with_stock(mut self, tree_type: &str, location: &str, quantity: i64) -> Self {
            self.store
                .transaction(|tx| {
                    let t = tx.tree_type_by_name(tree_type)?.unwrap();
                    let l = tx.location_by_name(location)?.unwrap();
                    tx.insert_stock_entry(t.id, l.id, quantity)
                })
                .unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rollback_discards_working_copy() {
        let mut store = StoreFixture::new().with_type("Oak", dec!(10)).store;
        let result: Result<()> = store.transaction(|tx| {
            tx.insert_location(&NewLocation {
                name: "Shed".into(),
                description: None,
            })?;
            Err(GreenGrowError::InvalidName)
        });
        assert!(result.is_err());
        assert!(store.read(|r| r.locations()).unwrap().is_empty());
        assert_eq!(store.read(|r| r.tree_types()).unwrap().len(), 1);
    }

    #[test]
    fn failing_sale_inserts_error_out() {
        let mut store = StoreFixture::new()
            .with_type("Oak", dec!(10))
            .store
            .with_failing_sale_inserts();
        let err = store
            .transaction(|tx| {
                tx.insert_sale(&NewSale {
                    tree_type_id: 1,
                    quantity: 1,
                    unit_price: dec!(10),
                })
            })
            .unwrap_err();
        assert!(matches!(err, GreenGrowError::Io(_)));
    }

    #[test]
    fn rejects_duplicate_names_ignoring_case() {
        let mut store = StoreFixture::new().with_location("Shed").store;
        let err = store
            .transaction(|tx| {
                tx.insert_location(&NewLocation {
                    name: "SHED".into(),
                    description: None,
                })
            })
            .unwrap_err();
        assert!(matches!(
            err,
            GreenGrowError::DuplicateName {
                kind: RecordKind::Location,
                ..
            }
        ));
    }
}
