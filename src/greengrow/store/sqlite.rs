use super::{DataStore, SaleFilter, StockFilter, StoreReader, StoreWriter};
use crate::error::{GreenGrowError, RecordKind, Result};
use crate::model::{
    from_ms, now_ms, Location, NewLocation, NewSale, NewTreeType, RecordId, Sale, StockEntry,
    TreeType,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, Transaction};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const SCHEMA_VERSION: &str = "1";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS meta (
      key TEXT PRIMARY KEY,
      value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS tree_types (
      id INTEGER PRIMARY KEY,
      name TEXT NOT NULL UNIQUE COLLATE NOCASE,
      description TEXT,
      base_price TEXT NOT NULL,
      created_at_ms INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS locations (
      id INTEGER PRIMARY KEY,
      name TEXT NOT NULL UNIQUE COLLATE NOCASE,
      description TEXT,
      created_at_ms INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS stock_entries (
      id INTEGER PRIMARY KEY,
      tree_type_id INTEGER NOT NULL REFERENCES tree_types(id),
      location_id INTEGER NOT NULL REFERENCES locations(id),
      quantity INTEGER NOT NULL CHECK (quantity >= 0),
      created_at_ms INTEGER NOT NULL,
      updated_at_ms INTEGER NOT NULL,
      UNIQUE (tree_type_id, location_id)
    );

    CREATE TABLE IF NOT EXISTS sales (
      id INTEGER PRIMARY KEY,
      tree_type_id INTEGER NOT NULL REFERENCES tree_types(id),
      quantity INTEGER NOT NULL CHECK (quantity > 0),
      unit_price TEXT NOT NULL,
      total_amount TEXT NOT NULL,
      sold_at_ms INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_sales_sold_at ON sales(sold_at_ms);
"#;

const TREE_TYPE_COLUMNS: &str = "id, name, description, base_price, created_at_ms";
const LOCATION_COLUMNS: &str = "id, name, description, created_at_ms";
const STOCK_COLUMNS: &str =
    "id, tree_type_id, location_id, quantity, created_at_ms, updated_at_ms";
const SALE_COLUMNS: &str = "id, tree_type_id, quantity, unit_price, total_amount, sold_at_ms";

/// SQLite-backed storage. One file holds the whole inventory.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the store file at `path` and make sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %path.display(), "opening sqlite store");
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.migrate()?;
        Ok(store)
    }
}

impl DataStore for SqliteStore {
    fn migrate(&mut self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
            params!["schema_version", SCHEMA_VERSION],
        )?;
        debug!(version = SCHEMA_VERSION, "schema ready");
        Ok(())
    }

    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn StoreReader) -> Result<T>,
    {
        f(&self.conn)
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn StoreWriter) -> Result<T>,
    {
        let mut tx = SqliteTx {
            tx: self.conn.transaction()?,
        };
        match f(&mut tx) {
            Ok(value) => {
                tx.tx.commit()?;
                debug!("transaction committed");
                Ok(value)
            }
            // Dropping the transaction rolls it back.
            Err(err) => {
                debug!(error = %err, "transaction rolled back");
                Err(err)
            }
        }
    }
}

struct SqliteTx<'c> {
    tx: Transaction<'c>,
}

impl StoreReader for Connection {
    fn tree_types(&self) -> Result<Vec<TreeType>> {
        let mut stmt = self.prepare(&format!(
            "SELECT {TREE_TYPE_COLUMNS} FROM tree_types ORDER BY id"
        ))?;
        let rows = stmt
            .query_map([], tree_type_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn tree_type(&self, id: RecordId) -> Result<Option<TreeType>> {
        let row = self
            .query_row(
                &format!("SELECT {TREE_TYPE_COLUMNS} FROM tree_types WHERE id = ?1"),
                params![id],
                tree_type_from_row,
            )
            .optional()?;
        Ok(row)
    }

    fn tree_type_by_name(&self, name: &str) -> Result<Option<TreeType>> {
        let row = self
            .query_row(
                &format!("SELECT {TREE_TYPE_COLUMNS} FROM tree_types WHERE name = ?1"),
                params![name],
                tree_type_from_row,
            )
            .optional()?;
        Ok(row)
    }

    fn locations(&self) -> Result<Vec<Location>> {
        let mut stmt = self.prepare(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations ORDER BY id"
        ))?;
        let rows = stmt
            .query_map([], location_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn location(&self, id: RecordId) -> Result<Option<Location>> {
        let row = self
            .query_row(
                &format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE id = ?1"),
                params![id],
                location_from_row,
            )
            .optional()?;
        Ok(row)
    }

    fn location_by_name(&self, name: &str) -> Result<Option<Location>> {
        let row = self
            .query_row(
                &format!("SELECT {LOCATION_COLUMNS} FROM locations WHERE name = ?1"),
                params![name],
                location_from_row,
            )
            .optional()?;
        Ok(row)
    }

    fn stock_entries(&self, filter: &StockFilter) -> Result<Vec<StockEntry>> {
        let mut stmt = self.prepare(&format!(
            "SELECT {STOCK_COLUMNS} FROM stock_entries
             WHERE (?1 IS NULL OR tree_type_id = ?1)
               AND (?2 IS NULL OR location_id = ?2)
             ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(
                params![filter.tree_type_id, filter.location_id],
                stock_entry_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn sales(&self, filter: &SaleFilter) -> Result<Vec<Sale>> {
        let from = filter.from.map(|t| t.timestamp_millis());
        let until = filter.until.map(|t| t.timestamp_millis());
        let mut stmt = self.prepare(&format!(
            "SELECT {SALE_COLUMNS} FROM sales
             WHERE (?1 IS NULL OR sold_at_ms >= ?1)
               AND (?2 IS NULL OR sold_at_ms < ?2)
             ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![from, until], sale_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

impl StoreReader for SqliteTx<'_> {
    fn tree_types(&self) -> Result<Vec<TreeType>> {
        self.tx.tree_types()
    }

    fn tree_type(&self, id: RecordId) -> Result<Option<TreeType>> {
        self.tx.tree_type(id)
    }

    fn tree_type_by_name(&self, name: &str) -> Result<Option<TreeType>> {
        self.tx.tree_type_by_name(name)
    }

    fn locations(&self) -> Result<Vec<Location>> {
        self.tx.locations()
    }

    fn location(&self, id: RecordId) -> Result<Option<Location>> {
        self.tx.location(id)
    }

    fn location_by_name(&self, name: &str) -> Result<Option<Location>> {
        self.tx.location_by_name(name)
    }

    fn stock_entries(&self, filter: &StockFilter) -> Result<Vec<StockEntry>> {
        self.tx.stock_entries(filter)
    }

    fn sales(&self, filter: &SaleFilter) -> Result<Vec<Sale>> {
        self.tx.sales(filter)
    }
}

impl StoreWriter for SqliteTx<'_> {
    fn insert_tree_type(&mut self, new: &NewTreeType) -> Result<TreeType> {
        let created_at_ms = now_ms();
        self.tx
            .execute(
                "INSERT INTO tree_types(name, description, base_price, created_at_ms)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    new.name,
                    new.description,
                    new.base_price.to_string(),
                    created_at_ms
                ],
            )
            .map_err(|e| duplicate_or_storage(e, RecordKind::TreeType, &new.name))?;
        Ok(TreeType {
            id: self.tx.last_insert_rowid(),
            name: new.name.clone(),
            description: new.description.clone(),
            base_price: new.base_price,
            created_at: from_ms(created_at_ms),
        })
    }

    fn insert_location(&mut self, new: &NewLocation) -> Result<Location> {
        let created_at_ms = now_ms();
        self.tx
            .execute(
                "INSERT INTO locations(name, description, created_at_ms) VALUES (?1, ?2, ?3)",
                params![new.name, new.description, created_at_ms],
            )
            .map_err(|e| duplicate_or_storage(e, RecordKind::Location, &new.name))?;
        Ok(Location {
            id: self.tx.last_insert_rowid(),
            name: new.name.clone(),
            description: new.description.clone(),
            created_at: from_ms(created_at_ms),
        })
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
        let now = now_ms();
        self.tx.execute(
            "INSERT INTO stock_entries(tree_type_id, location_id, quantity, created_at_ms, updated_at_ms)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![tree_type_id, location_id, quantity, now],
        )?;
        Ok(StockEntry {
            id: self.tx.last_insert_rowid(),
            tree_type_id,
            location_id,
            quantity,
            created_at: from_ms(now),
            updated_at: from_ms(now),
        })
    }

    fn set_stock_quantity(&mut self, entry_id: RecordId, quantity: i64) -> Result<StockEntry> {
        if quantity < 0 {
            return Err(GreenGrowError::InvalidQuantity(quantity));
        }
        let changed = self.tx.execute(
            "UPDATE stock_entries SET quantity = ?2, updated_at_ms = ?3 WHERE id = ?1",
            params![entry_id, quantity, now_ms()],
        )?;
        if changed == 0 {
            return Err(GreenGrowError::not_found(
                RecordKind::StockEntry,
                format!("#{}", entry_id),
            ));
        }
        let entry = self.tx.query_row(
            &format!("SELECT {STOCK_COLUMNS} FROM stock_entries WHERE id = ?1"),
            params![entry_id],
            stock_entry_from_row,
        )?;
        Ok(entry)
    }

    fn insert_sale(&mut self, new: &NewSale) -> Result<Sale> {
        let sold_at_ms = now_ms();
        let total_amount = new.total_amount()?;
        self.tx.execute(
            "INSERT INTO sales(tree_type_id, quantity, unit_price, total_amount, sold_at_ms)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.tree_type_id,
                new.quantity,
                new.unit_price.to_string(),
                total_amount.to_string(),
                sold_at_ms
            ],
        )?;
        Ok(Sale {
            id: self.tx.last_insert_rowid(),
            tree_type_id: new.tree_type_id,
            quantity: new.quantity,
            unit_price: new.unit_price,
            total_amount,
            sold_at: from_ms(sold_at_ms),
        })
    }
}

fn duplicate_or_storage(err: rusqlite::Error, kind: RecordKind, name: &str) -> GreenGrowError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            GreenGrowError::DuplicateName {
                kind,
                name: name.to_string(),
            }
        }
        _ => GreenGrowError::Storage(err),
    }
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn tree_type_from_row(row: &Row<'_>) -> rusqlite::Result<TreeType> {
    Ok(TreeType {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        base_price: decimal_column(row, 3)?,
        created_at: from_ms(row.get(4)?),
    })
}

fn location_from_row(row: &Row<'_>) -> rusqlite::Result<Location> {
    Ok(Location {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: from_ms(row.get(3)?),
    })
}

fn stock_entry_from_row(row: &Row<'_>) -> rusqlite::Result<StockEntry> {
    Ok(StockEntry {
        id: row.get(0)?,
        tree_type_id: row.get(1)?,
        location_id: row.get(2)?,
        quantity: row.get(3)?,
        created_at: from_ms(row.get(4)?),
        updated_at: from_ms(row.get(5)?),
    })
}

fn sale_from_row(row: &Row<'_>) -> rusqlite::Result<Sale> {
    Ok(Sale {
        id: row.get(0)?,
        tree_type_id: row.get(1)?,
        quantity: row.get(2)?,
        unit_price: decimal_column(row, 3)?,
        total_amount: decimal_column(row, 4)?,
        sold_at: from_ms(row.get(5)?),
    })
}
