//! Authenticated encryption of opaque strings using AES-256-GCM.

use aes_gcm::{
    aead::{consts::U16, Aead, KeyInit},
    aes::Aes256,
    AesGcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use tracing::debug;

use crate::errors::{CipherError, ConfigError};

use super::config::CipherConfig;

/// AES-256-GCM with a 16-byte nonce, matching the persisted envelope
/// format.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 16;
const TAG_LEN: usize = 16;

/// Authenticated encryption/decryption of opaque strings with a static
/// server-held key.
///
/// Envelopes are persisted as `<nonce-hex>:<tag-hex>:<ciphertext-hex>`,
/// exactly two colons, and must round-trip byte for byte. The box has no
/// awareness of tokens or users.
pub struct CipherBox {
    cipher: Aes256Gcm16,
}

impl CipherBox {
    /// Creates a cipher box from the configured key.
    ///
    /// Fails fast with a [`ConfigError`] when the key is absent, not
    /// valid hex, or not exactly 32 bytes.
    pub fn new(config: &CipherConfig) -> Result<Self, ConfigError> {
        if config.key_hex.trim().is_empty() {
            return Err(ConfigError::MissingCipherKey);
        }

        let key = hex::decode(config.key_hex.trim()).map_err(|_| ConfigError::InvalidCipherKey)?;
        if key.len() != KEY_LEN {
            return Err(ConfigError::InvalidCipherKey);
        }

        let cipher =
            Aes256Gcm16::new_from_slice(&key).map_err(|_| ConfigError::InvalidCipherKey)?;
        Ok(Self { cipher })
    }

    /// Encrypts a plaintext into an envelope, drawing a fresh random
    /// nonce per call.
    pub fn seal(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::<U16>::from_slice(&nonce_bytes);

        let sealed = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptionFailed)?;

        // The AEAD implementation appends the tag to the ciphertext;
        // the envelope format keeps them as separate fields.
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);

        debug!("sealed plaintext into envelope");
        Ok(format!(
            "{}:{}:{}",
            hex::encode(nonce_bytes),
            hex::encode(tag),
            hex::encode(ciphertext)
        ))
    }

    /// Decrypts an envelope produced by [`seal`](Self::seal).
    ///
    /// Returns [`CipherError::MalformedEnvelope`] when the envelope does
    /// not split into exactly three hex fields of the expected widths,
    /// and [`CipherError::AuthenticationFailure`] when the tag does not
    /// verify (tampering or wrong key).
    pub fn open(&self, envelope: &str) -> Result<String, CipherError> {
        let fields: Vec<&str> = envelope.split(':').collect();
        if fields.len() != 3 {
            return Err(CipherError::MalformedEnvelope);
        }

        let nonce_bytes = hex::decode(fields[0]).map_err(|_| CipherError::MalformedEnvelope)?;
        let tag = hex::decode(fields[1]).map_err(|_| CipherError::MalformedEnvelope)?;
        let ciphertext = hex::decode(fields[2]).map_err(|_| CipherError::MalformedEnvelope)?;

        if nonce_bytes.len() != NONCE_LEN || tag.len() != TAG_LEN {
            return Err(CipherError::MalformedEnvelope);
        }

        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);

        let nonce = Nonce::<U16>::from_slice(&nonce_bytes);
        let plaintext = self
            .cipher
            .decrypt(nonce, sealed.as_ref())
            .map_err(|_| CipherError::AuthenticationFailure)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::MalformedEnvelope)
    }
}
