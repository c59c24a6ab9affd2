//! Key material types. Every type here zeroizes its bytes on drop and
//! redacts them from `Debug` output.

use rand::RngCore;
use zeroize::Zeroize;

use crate::KEY_SIZE;

/// Fill an array with bytes from the OS CSPRNG.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// The password-derived key-encryption-key. Exists only transiently while
/// wrapping or unwrapping the master key ring.
#[derive(Clone)]
pub struct Kek {
    bytes: [u8; KEY_SIZE],
}

impl Kek {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for Kek {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for Kek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kek").field("bytes", &"[REDACTED]").finish()
    }
}

/// A per-content 256-bit encryption key, generated fresh for every
/// `encrypt_content` call and persisted only in wrapped form inside the
/// blob header.
#[derive(Clone)]
pub struct ContentKey {
    bytes: [u8; KEY_SIZE],
}

impl ContentKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh random content key.
    pub fn generate() -> Self {
        Self::from_bytes(random_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for ContentKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The unlocked master key pair: one key for content encryption, one for
/// index-item HMACs. Session-scoped; wiped on drop.
pub struct KeyRing {
    master_encryption_key: [u8; KEY_SIZE],
    master_hmac_key: [u8; KEY_SIZE],
}

impl KeyRing {
    pub fn new(master_encryption_key: [u8; KEY_SIZE], master_hmac_key: [u8; KEY_SIZE]) -> Self {
        Self {
            master_encryption_key,
            master_hmac_key,
        }
    }

    /// Generate a fresh random key ring (used by `master::init`).
    pub fn generate() -> Self {
        Self::new(random_bytes(), random_bytes())
    }

    pub fn master_encryption_key(&self) -> &[u8; KEY_SIZE] {
        &self.master_encryption_key
    }

    pub fn master_hmac_key(&self) -> &[u8; KEY_SIZE] {
        &self.master_hmac_key
    }
}

impl Drop for KeyRing {
    fn drop(&mut self) {
        self.master_encryption_key.zeroize();
        self.master_hmac_key.zeroize();
    }
}

impl std::fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRing")
            .field("master_encryption_key", &"[REDACTED]")
            .field("master_hmac_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_differ() {
        let k1 = ContentKey::generate();
        let k2 = ContentKey::generate();
        assert_ne!(k1.as_bytes(), k2.as_bytes(), "random keys must differ");
    }

    #[test]
    fn generated_key_rings_differ() {
        let a = KeyRing::generate();
        let b = KeyRing::generate();
        assert_ne!(a.master_encryption_key(), b.master_encryption_key());
        assert_ne!(a.master_hmac_key(), b.master_hmac_key());
        assert_ne!(a.master_encryption_key(), a.master_hmac_key());
    }

    #[test]
    fn debug_output_redacts_key_bytes() {
        let key = Kek::from_bytes([7u8; KEY_SIZE]);
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains('7'));
    }
}
