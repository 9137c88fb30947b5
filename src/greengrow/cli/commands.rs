//! # CLI Layer
//!
//! This module is **one possible UI client** for greengrow, not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! Exit codes are chosen in `main.rs` from the returned error.
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` with the API over the opened store
//! - `handle_config()`: Reads or changes config without opening the store
//! - `handle_*()`: Per-command handlers that call the API and print the result

use super::render::{
    print_config, print_locations, print_messages, print_sales, print_stock, print_tree_types,
};
use super::setup::{Cli, Commands};
use chrono::NaiveDate;
use clap::Parser;
use greengrow::api::{self, ConfigAction, GreenGrowApi};
use greengrow::error::Result;
use greengrow::init::{initialize, resolve_paths};
use greengrow::logging;
use greengrow::store::sqlite::SqliteStore;
use rust_decimal::Decimal;
use std::path::Path;

struct AppContext {
    api: GreenGrowApi<SqliteStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let db = cli.db.as_deref();

    match cli.command {
        Commands::Init => handle_init(&mut init_context(db)?),
        Commands::AddType {
            name,
            price,
            description,
        } => handle_add_type(&mut init_context(db)?, &name, price, description),
        Commands::AddLocation { name, description } => {
            handle_add_location(&mut init_context(db)?, &name, description)
        }
        Commands::Restock {
            tree_type,
            location,
            quantity,
        } => handle_restock(&mut init_context(db)?, &tree_type, &location, quantity),
        Commands::Transfer {
            tree_type,
            from,
            to,
            quantity,
        } => handle_transfer(&mut init_context(db)?, &tree_type, &from, &to, quantity),
        Commands::Sell {
            tree_type,
            quantity,
            location,
        } => handle_sell(
            &mut init_context(db)?,
            &tree_type,
            quantity,
            location.as_deref(),
        ),
        Commands::ListStock {
            tree_type,
            location,
        } => handle_list_stock(
            &init_context(db)?,
            tree_type.as_deref(),
            location.as_deref(),
        ),
        Commands::ListSales { from, to } => handle_list_sales(&init_context(db)?, from, to),
        Commands::ListTypes => handle_list_types(&init_context(db)?),
        Commands::ListLocations => handle_list_locations(&init_context(db)?),
        // Never opens the store, so a bad database-path can still be fixed.
        Commands::Config { key, value } => handle_config(db, key, value),
    }
}

fn init_context(db: Option<&Path>) -> Result<AppContext> {
    let api = initialize(db)?;
    Ok(AppContext { api })
}

fn handle_init(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.init()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_add_type(
    ctx: &mut AppContext,
    name: &str,
    price: Decimal,
    description: Option<String>,
) -> Result<()> {
    let result = ctx.api.add_tree_type(name, price, description)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_add_location(
    ctx: &mut AppContext,
    name: &str,
    description: Option<String>,
) -> Result<()> {
    let result = ctx.api.add_location(name, description)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_restock(
    ctx: &mut AppContext,
    tree_type: &str,
    location: &str,
    quantity: i64,
) -> Result<()> {
    let result = ctx.api.restock(tree_type, location, quantity)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_transfer(
    ctx: &mut AppContext,
    tree_type: &str,
    from: &str,
    to: &str,
    quantity: i64,
) -> Result<()> {
    let result = ctx.api.transfer(tree_type, from, to, quantity)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_sell(
    ctx: &mut AppContext,
    tree_type: &str,
    quantity: i64,
    location: Option<&str>,
) -> Result<()> {
    let result = ctx.api.sell(tree_type, quantity, location)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list_stock(
    ctx: &AppContext,
    tree_type: Option<&str>,
    location: Option<&str>,
) -> Result<()> {
    let result = ctx.api.list_stock(tree_type, location)?;
    print_stock(&result.stock, result.stock_value()?);
    print_messages(&result.messages);
    Ok(())
}

fn handle_list_sales(
    ctx: &AppContext,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let result = ctx.api.list_sales(from, to)?;
    print_sales(&result.sales, result.revenue()?);
    print_messages(&result.messages);
    Ok(())
}

fn handle_list_types(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_tree_types()?;
    print_tree_types(&result.tree_types);
    Ok(())
}

fn handle_list_locations(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_locations()?;
    print_locations(&result.locations);
    Ok(())
}

fn handle_config(
    db_flag: Option<&Path>,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let (paths, _) = resolve_paths(db_flag)?;
    let result = api::config(&paths, action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
