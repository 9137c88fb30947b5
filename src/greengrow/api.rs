//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all greengrow operations, regardless of the UI in front of it.
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (raw reference strings become [`RecordRef`]s)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no business logic, no I/O and no formatting.
//!
//! ## Generic Over DataStore
//!
//! `GreenGrowApi<S: DataStore>` is generic over the storage backend:
//! - Production: `GreenGrowApi<SqliteStore>`
//! - Testing: `GreenGrowApi<InMemoryStore>`

use crate::commands;
use crate::config::SalePolicy;
use crate::error::Result;
use crate::model::RecordRef;
use crate::store::DataStore;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// The main API facade for greengrow operations.
pub struct GreenGrowApi<S: DataStore> {
    store: S,
    paths: commands::GreenGrowPaths,
    sale_policy: SalePolicy,
}

impl<S: DataStore> GreenGrowApi<S> {
    pub fn new(store: S, paths: commands::GreenGrowPaths) -> Self {
        Self {
            store,
            paths,
            sale_policy: SalePolicy::default(),
        }
    }

    pub fn with_sale_policy(mut self, policy: SalePolicy) -> Self {
        self.sale_policy = policy;
        self
    }

    pub fn init(&mut self) -> Result<commands::CmdResult> {
        commands::init::run(&mut self.store, &self.paths)
    }

    pub fn add_tree_type(
        &mut self,
        name: &str,
        base_price: Decimal,
        description: Option<String>,
    ) -> Result<commands::CmdResult> {
        commands::add_type::run(&mut self.store, name, base_price, description)
    }

    pub fn add_location(
        &mut self,
        name: &str,
        description: Option<String>,
    ) -> Result<commands::CmdResult> {
        commands::add_location::run(&mut self.store, name, description)
    }

    pub fn restock(
        &mut self,
        tree_type: &str,
        location: &str,
        quantity: i64,
    ) -> Result<commands::CmdResult> {
        let tree_type: RecordRef = tree_type.parse()?;
        let location: RecordRef = location.parse()?;
        commands::restock::run(&mut self.store, &tree_type, &location, quantity)
    }

    pub fn transfer(
        &mut self,
        tree_type: &str,
        source: &str,
        destination: &str,
        quantity: i64,
    ) -> Result<commands::CmdResult> {
        let tree_type: RecordRef = tree_type.parse()?;
        let source: RecordRef = source.parse()?;
        let destination: RecordRef = destination.parse()?;
        commands::transfer::run(&mut self.store, &tree_type, &source, &destination, quantity)
    }

    pub fn sell(
        &mut self,
        tree_type: &str,
        quantity: i64,
        location: Option<&str>,
    ) -> Result<commands::CmdResult> {
        let tree_type: RecordRef = tree_type.parse()?;
        let location = parse_optional(location)?;
        commands::sell::run(
            &mut self.store,
            &tree_type,
            quantity,
            location.as_ref(),
            self.sale_policy,
        )
    }

    pub fn list_stock(
        &self,
        tree_type: Option<&str>,
        location: Option<&str>,
    ) -> Result<commands::CmdResult> {
        let tree_type = parse_optional(tree_type)?;
        let location = parse_optional(location)?;
        commands::list::stock(&self.store, tree_type.as_ref(), location.as_ref())
    }

    pub fn list_sales(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<commands::CmdResult> {
        commands::list::sales(&self.store, from, to)
    }

    pub fn list_tree_types(&self) -> Result<commands::CmdResult> {
        commands::list::tree_types(&self.store)
    }

    pub fn list_locations(&self) -> Result<commands::CmdResult> {
        commands::list::locations(&self.store)
    }

}

/// Read or change configuration. Needs only the paths, so a store that cannot be
/// opened never blocks fixing the config that points at it.
pub fn config(
    paths: &commands::GreenGrowPaths,
    action: ConfigAction,
) -> Result<commands::CmdResult> {
    commands::config::run(paths, action)
}

fn parse_optional(input: Option<&str>) -> Result<Option<RecordRef>> {
    input.map(str::parse).transpose()
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, GreenGrowPaths, MessageLevel};
