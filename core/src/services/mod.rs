//! Business services for the credential lifecycle.

pub mod cipher;
pub mod rotation;
pub mod token;

// Re-export commonly used types
pub use cipher::{CipherBox, CipherConfig};
pub use rotation::RotationService;
pub use token::{
    ClassConfig, CredentialSweeper, SweepConfig, TokenCodec, TokenService, TokenServiceConfig,
};
