//! Token service module for the credential lifecycle.
//!
//! This module handles all token-related operations:
//! - signing and parsing of the four token classes (codec)
//! - generation, verification, and deletion with encrypted shadow
//!   records for the persisted classes (service)
//! - bulk expiry sweep of dead records (sweep)

mod codec;
mod config;
mod service;
mod sweep;

#[cfg(test)]
mod tests;

pub use codec::TokenCodec;
pub use config::{ClassConfig, TokenServiceConfig};
pub use service::TokenService;
pub use sweep::{CredentialSweeper, SweepConfig};
