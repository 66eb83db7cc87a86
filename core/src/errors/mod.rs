//! Domain-specific error types and error handling.

mod types;

pub use types::{CipherError, ConfigError, TokenError};

use thiserror::Error;

use crate::domain::entities::credential::TokenClass;

/// Core domain errors.
///
/// Token and cipher failures are annotated with the token class they
/// occurred for, so callers can map them to protocol responses without
/// this crate knowing anything about transports. `StoreUnavailable` is
/// the only variant a caller may retry; everything else is terminal for
/// the request.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{class} token error: {source}")]
    Token {
        class: TokenClass,
        source: TokenError,
    },

    #[error("{class} token envelope error: {source}")]
    Cipher {
        class: TokenClass,
        source: CipherError,
    },

    #[error("credential store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Annotate a token error with the class it occurred for.
    pub fn token(class: TokenClass, source: TokenError) -> Self {
        Self::Token { class, source }
    }

    /// Annotate a cipher error with the class it occurred for.
    pub fn cipher(class: TokenClass, source: CipherError) -> Self {
        Self::Cipher { class, source }
    }

    /// A transient store failure the caller may retry.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Whether a retry of the failed operation could succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
