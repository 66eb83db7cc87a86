//! Unit tests for the token service.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::credential::TokenClass;
use crate::domain::entities::identity::Identity;
use crate::errors::{DomainError, TokenError};
use crate::repositories::credential::CredentialRepository;
use crate::repositories::{MockCredentialRepository, MockIdentityRepository};
use crate::services::token::ClassConfig;

use super::{test_config, test_service, test_service_with};

#[tokio::test]
async fn test_generate_refresh_token_stores_sealed_record() {
    let credentials = MockCredentialRepository::new();
    let service = test_service_with(
        credentials.clone(),
        MockIdentityRepository::new(),
        test_config(),
    );
    let user_id = Uuid::new_v4();

    let token = service
        .generate_refresh_token(user_id, "deviceA")
        .await
        .unwrap();
    assert!(!token.is_empty());

    let record = credentials
        .find(TokenClass::Refresh, &user_id.to_string(), Some("deviceA"))
        .await
        .unwrap()
        .expect("record should exist");

    // Only the sealed form is persisted, never the plaintext token.
    assert_ne!(record.cipher_text, token);
    assert_eq!(record.cipher_text.matches(':').count(), 2);
    assert!(!record.cipher_text.contains(&token));
}

#[tokio::test]
async fn test_access_token_is_never_persisted() {
    let credentials = MockCredentialRepository::new();
    let service = test_service_with(
        credentials.clone(),
        MockIdentityRepository::new(),
        test_config(),
    );

    service
        .generate_access_token(Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(credentials.record_count().await, 0);
}

#[tokio::test]
async fn test_per_key_singleton_on_regenerate() {
    let credentials = MockCredentialRepository::new();
    let service = test_service_with(
        credentials.clone(),
        MockIdentityRepository::new(),
        test_config(),
    );
    let user_id = Uuid::new_v4();

    let first = service
        .generate_refresh_token(user_id, "deviceA")
        .await
        .unwrap();
    let second = service
        .generate_refresh_token(user_id, "deviceA")
        .await
        .unwrap();
    assert_ne!(first, second);

    // Exactly one record for the key, holding the second token.
    assert_eq!(credentials.record_count().await, 1);
    assert_eq!(
        service.verify_refresh_token(&second, "deviceA").await.unwrap(),
        user_id
    );
    let err = service
        .verify_refresh_token(&first, "deviceA")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token {
            class: TokenClass::Refresh,
            source: TokenError::TokenMismatch
        }
    ));
}

#[tokio::test]
async fn test_verify_refresh_token_returns_subject() {
    let service = test_service();
    let user_id = Uuid::new_v4();

    let token = service
        .generate_refresh_token(user_id, "deviceA")
        .await
        .unwrap();
    assert_eq!(
        service.verify_refresh_token(&token, "deviceA").await.unwrap(),
        user_id
    );
}

#[tokio::test]
async fn test_verify_without_record_is_not_found() {
    let service = test_service();
    let user_id = Uuid::new_v4();

    let token = service
        .generate_refresh_token(user_id, "deviceA")
        .await
        .unwrap();
    service
        .delete_refresh_token(user_id, "deviceA")
        .await
        .unwrap();

    let err = service
        .verify_refresh_token(&token, "deviceA")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token {
            class: TokenClass::Refresh,
            source: TokenError::TokenNotFound
        }
    ));
}

#[tokio::test]
async fn test_device_mismatch_is_invalid() {
    let service = test_service();
    let user_id = Uuid::new_v4();

    let token = service
        .generate_refresh_token(user_id, "deviceA")
        .await
        .unwrap();
    let err = service
        .verify_refresh_token(&token, "deviceB")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token {
            class: TokenClass::Refresh,
            source: TokenError::TokenInvalid
        }
    ));
}

#[tokio::test]
async fn test_expired_token_fails_before_store_lookup() {
    let mut config = test_config();
    config.recover_password = ClassConfig::new("recover-password-secret", -10);
    let service = test_service_with(
        MockCredentialRepository::new(),
        MockIdentityRepository::new(),
        config,
    );
    let user_id = Uuid::new_v4();

    let token = service
        .generate_recover_password_token(user_id)
        .await
        .unwrap();
    let err = service
        .verify_recover_password_token(&token)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token {
            class: TokenClass::RecoverPassword,
            source: TokenError::TokenExpired
        }
    ));
}

#[tokio::test]
async fn test_dead_record_is_treated_as_missing() {
    let credentials = MockCredentialRepository::new();
    let service = test_service_with(
        credentials.clone(),
        MockIdentityRepository::new(),
        test_config(),
    );
    let user_id = Uuid::new_v4();

    let token = service
        .generate_refresh_token(user_id, "deviceA")
        .await
        .unwrap();

    // Age the record past its expiry without touching the token; the
    // sweep would remove it, but verification must not wait for that.
    let mut record = credentials
        .find(TokenClass::Refresh, &user_id.to_string(), Some("deviceA"))
        .await
        .unwrap()
        .unwrap();
    record.expires_at = Utc::now() - Duration::seconds(1);
    credentials.upsert(record).await.unwrap();

    let err = service
        .verify_refresh_token(&token, "deviceA")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token {
            class: TokenClass::Refresh,
            source: TokenError::TokenNotFound
        }
    ));
}

#[tokio::test]
async fn test_class_isolation() {
    let service = test_service();

    let token = service
        .generate_verify_email_token("user@example.com")
        .await
        .unwrap();
    let err = service
        .verify_recover_password_token(&token)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token {
            class: TokenClass::RecoverPassword,
            source: TokenError::TokenInvalid
        }
    ));
}

#[tokio::test]
async fn test_verify_email_token_round_trip() {
    let service = test_service();

    let token = service
        .generate_verify_email_token("user@example.com")
        .await
        .unwrap();
    assert_eq!(
        service.verify_email_token(&token).await.unwrap(),
        "user@example.com"
    );
}

#[tokio::test]
async fn test_recover_password_token_round_trip() {
    let service = test_service();
    let user_id = Uuid::new_v4();

    let token = service
        .generate_recover_password_token(user_id)
        .await
        .unwrap();
    assert_eq!(
        service.verify_recover_password_token(&token).await.unwrap(),
        user_id
    );
}

#[tokio::test]
async fn test_verify_access_token_resolves_identity() {
    let identities = MockIdentityRepository::new();
    let user_id = Uuid::new_v4();
    identities
        .insert(Identity::new(user_id, "user@example.com"))
        .await;
    let service = test_service_with(
        MockCredentialRepository::new(),
        identities,
        test_config(),
    );

    let token = service.generate_access_token(user_id).await.unwrap();
    let identity = service.verify_access_token(&token).await.unwrap();
    assert_eq!(identity.id, user_id);
    assert_eq!(identity.email, "user@example.com");
}

#[tokio::test]
async fn test_access_token_for_unknown_identity_is_invalid() {
    let service = test_service();

    let token = service
        .generate_access_token(Uuid::new_v4())
        .await
        .unwrap();
    let err = service.verify_access_token(&token).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token {
            class: TokenClass::Access,
            source: TokenError::TokenInvalid
        }
    ));
}

#[tokio::test]
async fn test_delete_refresh_token_is_idempotent() {
    let service = test_service();
    let user_id = Uuid::new_v4();

    service
        .generate_refresh_token(user_id, "deviceA")
        .await
        .unwrap();
    assert!(service
        .delete_refresh_token(user_id, "deviceA")
        .await
        .unwrap());
    assert!(!service
        .delete_refresh_token(user_id, "deviceA")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_delete_all_refresh_tokens() {
    let service = test_service();
    let user_id = Uuid::new_v4();

    service
        .generate_refresh_token(user_id, "deviceA")
        .await
        .unwrap();
    service
        .generate_refresh_token(user_id, "deviceB")
        .await
        .unwrap();
    service
        .generate_refresh_token(Uuid::new_v4(), "deviceA")
        .await
        .unwrap();

    assert_eq!(service.delete_all_refresh_tokens(user_id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_store_outage_propagates_as_retriable() {
    let credentials = MockCredentialRepository::new();
    let service = test_service_with(
        credentials.clone(),
        MockIdentityRepository::new(),
        test_config(),
    );
    credentials.set_fail_writes(true).await;

    let err = service
        .generate_refresh_token(Uuid::new_v4(), "deviceA")
        .await
        .unwrap_err();
    assert!(err.is_retriable());
    assert!(matches!(err, DomainError::StoreUnavailable { .. }));
}
