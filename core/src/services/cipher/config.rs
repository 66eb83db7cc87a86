//! Configuration for the cipher box.

/// Configuration for the cipher box.
///
/// The key is supplied out of band by the deployment (hex encoded,
/// 256-bit) and is read-only after construction. There is no key
/// versioning; a single active key is assumed.
#[derive(Debug, Clone)]
pub struct CipherConfig {
    /// Hex-encoded 32-byte encryption key.
    pub key_hex: String,
}

impl CipherConfig {
    pub fn new(key_hex: impl Into<String>) -> Self {
        Self {
            key_hex: key_hex.into(),
        }
    }
}
