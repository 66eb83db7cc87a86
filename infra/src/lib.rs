//! # Infrastructure Layer
//!
//! MySQL-backed implementations of the `tm_core` repository traits,
//! plus connection-pool management. The credential store's atomic
//! upsert (`INSERT ... ON DUPLICATE KEY UPDATE` on the natural key) is
//! what carries the one-record-per-key invariant for the domain layer.

pub mod database;

pub use database::{
    connect, DatabaseConfig, MySqlCredentialRepository, MySqlIdentityRepository,
};
