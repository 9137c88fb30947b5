//! # Command Layer
//!
//! This module contains the business logic of greengrow. Each command lives in its
//! own submodule and implements pure Rust functions over a [`DataStore`].
//!
//! Commands:
//! - validate their arguments before opening a transaction
//! - resolve type/location references inside the transaction that uses them
//! - return a structured [`CmdResult`], never strings for the terminal
//!
//! Commands never print, prompt, or exit; that is the CLI's job.
//!
//! ## Testing Strategy
//!
//! This is where most tests live. Command tests run against `InMemoryStore`
//! fixtures and check both the returned `CmdResult` and what ended up in the store.
//!
//! ## Command Modules
//!
//! - [`add_type`], [`add_location`]: catalog setup
//! - [`restock`], [`transfer`], [`sell`]: stock movements through the [`crate::ledger`]
//! - [`list`]: stock, sales, type and location listings
//! - [`init`]: create the store
//! - [`config`]: read and change configuration
//! - [`helpers`]: reference resolution and display joins
//!
//! [`DataStore`]: crate::store::DataStore

use crate::config::GreenGrowConfig;
use crate::error::Result;
use crate::model::{sum_amounts, Location, SaleLine, StockLine, TreeType};
use rust_decimal::Decimal;
use std::path::PathBuf;

pub mod add_location;
pub mod add_type;
pub mod config;
pub mod helpers;
pub mod init;
pub mod list;
pub mod restock;
pub mod sell;
pub mod transfer;

/// Where greengrow keeps its files.
#[derive(Debug, Clone)]
pub struct GreenGrowPaths {
    pub data_dir: PathBuf,
    pub database: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub tree_types: Vec<TreeType>,
    pub locations: Vec<Location>,
    pub stock: Vec<StockLine>,
    pub sales: Vec<SaleLine>,
    pub config: Option<GreenGrowConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_tree_types(mut self, tree_types: Vec<TreeType>) -> Self {
        self.tree_types = tree_types;
        self
    }

    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_stock(mut self, stock: Vec<StockLine>) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_sales(mut self, sales: Vec<SaleLine>) -> Self {
        self.sales = sales;
        self
    }

    pub fn with_config(mut self, config: GreenGrowConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Estimated value of the listed stock at current base prices.
    pub fn stock_value(&self) -> Result<Decimal> {
        sum_amounts(self.stock.iter().map(|line| line.value), "total stock value")
    }

    pub fn revenue(&self) -> Result<Decimal> {
        sum_amounts(
            self.sales.iter().map(|line| line.sale.total_amount),
            "total revenue",
        )
    }
}
