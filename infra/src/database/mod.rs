//! Database module - MySQL implementations using SQLx.

pub mod connection;
pub mod mysql;

pub use connection::{connect, DatabaseConfig};
pub use mysql::{MySqlCredentialRepository, MySqlIdentityRepository};
