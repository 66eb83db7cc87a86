//! # TokenMint Core
//!
//! Core domain layer for the TokenMint credential service. This crate
//! contains the domain entities, services, repository interfaces, and
//! error types that make up the credential lifecycle: issuing,
//! verifying, rotating, and revoking bearer tokens, with an encrypted
//! shadow record kept for every long-lived token.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
