//! Domain layer containing the credential and token entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
