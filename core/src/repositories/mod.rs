//! Repository interfaces for credential and identity persistence.

pub mod credential;
pub mod identity;

pub use credential::CredentialRepository;
pub use identity::IdentityRepository;

#[cfg(test)]
pub use credential::MockCredentialRepository;
#[cfg(test)]
pub use identity::MockIdentityRepository;
