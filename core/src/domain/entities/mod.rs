//! Domain entities representing credentials and their bearers.

pub mod credential;
pub mod identity;
pub mod token;

// Re-export commonly used types
pub use credential::{CredentialRecord, TokenClass};
pub use identity::Identity;
pub use token::{Claims, TokenPair};
