//! # GreenGrow Architecture
//!
//! GreenGrow tracks seedling stock across nursery locations and records sales
//! against it. The library holds all of the logic; the `greengrow` binary is a thin
//! terminal client on top of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats tables, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (reference strings → RecordRef)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One transaction per command                              │
//! │  - Stock rules live in ledger.rs                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait with scoped transactions                 │
//! │  - SqliteStore (production), InMemoryStore (testing)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Invariants
//!
//! A stock entry's quantity is never negative, and every restock, transfer or
//! sale either applies completely or not at all. See [`ledger`] for the rules
//! and [`store`] for how transactions are scoped.
//!
//! ## Testing Strategy
//!
//! 1. **Ledger and commands**: unit tests against `InMemoryStore` fixtures.
//! 2. **Store**: SQLite tests on in-memory and temp-file databases, including
//!    rollback after a failed write.
//! 3. **CLI**: argument parsing and rendering tests next to the code, plus
//!    black-box tests of the binary in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: facade used by every client
//! - [`commands`]: business logic per verb
//! - [`ledger`]: restock, transfer and sale rules
//! - [`store`]: persistence
//! - [`model`]: records and references
//! - [`config`]: `config.json` settings
//! - [`init`]: path resolution and store opening
//! - [`logging`]: tracing subscriber setup
//! - [`error`]: error kinds and exit codes

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod store;
