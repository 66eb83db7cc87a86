//! MySQL repository implementations using SQLx.

pub mod credential_repository_impl;
pub mod identity_repository_impl;

pub use credential_repository_impl::MySqlCredentialRepository;
pub use identity_repository_impl::MySqlIdentityRepository;
