mod service_tests;

use crate::repositories::{MockCredentialRepository, MockIdentityRepository};
use crate::services::cipher::{CipherBox, CipherConfig};
use crate::services::token::{ClassConfig, TokenService, TokenServiceConfig};

pub(crate) fn test_config() -> TokenServiceConfig {
    TokenServiceConfig {
        access: ClassConfig::new("access-secret", 15 * 60),
        refresh: ClassConfig::new("refresh-secret", 7 * 24 * 60 * 60),
        verify_email: ClassConfig::new("verify-email-secret", 24 * 60 * 60),
        recover_password: ClassConfig::new("recover-password-secret", 60 * 60),
        record_grace_seconds: 300,
    }
}

pub(crate) fn test_cipher() -> CipherBox {
    let config = CipherConfig::new(
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
    );
    CipherBox::new(&config).unwrap()
}

pub(crate) fn test_service_with(
    credentials: MockCredentialRepository,
    identities: MockIdentityRepository,
    config: TokenServiceConfig,
) -> TokenService<MockCredentialRepository, MockIdentityRepository> {
    TokenService::new(credentials, identities, test_cipher(), config).unwrap()
}

pub(crate) fn test_service() -> TokenService<MockCredentialRepository, MockIdentityRepository> {
    test_service_with(
        MockCredentialRepository::new(),
        MockIdentityRepository::new(),
        test_config(),
    )
}
