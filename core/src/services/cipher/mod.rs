//! Symmetric cipher box for protecting stored tokens at rest.

mod config;
mod service;

pub use config::CipherConfig;
pub use service::CipherBox;
