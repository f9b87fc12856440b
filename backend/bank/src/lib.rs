//! # Bank
//!
//! Shared data layer for the gift redemption backend.
//!
//! Holds the staff pass mapping and the redemption ledger, both persisted in one SQLite file.
//! The server, the offline importer and the tests all go through [`Store`].
//!
//! ## Tables
//! - `mapping_entries`: staff pass id (**primary key**) to team name (**string**) and creation
//!   time (**epoch millis**). Loaded once from CSV before serving, read-only afterwards.
//! - `redemption_entries`: team name (**primary key**) to redemption time (**epoch millis**) and the
//!   staff pass id that redeemed. Append only, one row per team, never updated or deleted.
//!
//! ## Redemption
//! - One gift per team, ever
//! - Check and insert run inside a single `BEGIN IMMEDIATE` transaction so every connection to the
//!   same file queues behind the write lock
//! - Primary key on `team_name` catches anything that slips past the check
//! - Losers of a race get the winning row back, never a retryable error
pub mod database;
pub mod error;
pub mod import;
pub mod mapping;
pub mod models;
pub mod redemption;

pub use database::Store;
pub use error::BankError;
pub use models::{MappingEntry, RedemptionEntry};
