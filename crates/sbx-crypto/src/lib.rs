//! sbx-crypto: the cryptographic engine of the strongbox encrypted
//! index/content store.
//!
//! Protects arbitrary-size content blobs and small metadata records at
//! rest under a password-derived key hierarchy that supports password
//! rotation without re-encrypting content.
//!
//! Key hierarchy:
//! ```text
//! Password ──scrypt──▶ KEK (256-bit, never persisted)
//!   ├── Master Encryption Key (256-bit random, AES-key-wrapped by KEK)
//!   │     └── Content Key (per-content, 256-bit random,
//!   │           AES-GCM-wrapped into the blob header)
//!   │           └── Chunk AEAD: AES-256-GCM, AAD = "{contentId}__{index}"
//!   └── Master HMAC Key (256-bit random, AES-key-wrapped by KEK)
//!         └── HMAC-SHA-256 over each index item's canonical form
//! ```
//!
//! Cipher suite: `scrypt-aeskeywrap256-aesgcm256-hmacsha256`, recorded in
//! every master record to allow future algorithm migration.

pub mod aead;
pub mod content;
pub mod integrity;
pub mod kdf;
pub mod keys;
pub mod keywrap;
pub mod master;
pub mod session;

pub use content::{decrypt_content, encrypt_content, CHUNK_SIZE};
pub use integrity::{check_index_item_hmac, update_index_item_hmac};
pub use kdf::{derive_kek, KdfParams};
pub use keys::{ContentKey, Kek, KeyRing};
pub use master::{
    change_password, get_key_ring, init, init_with_params, MasterItem, CIPHER_SUITE,
    MASTER_ITEM_ID,
};
pub use session::Session;

/// Size of every symmetric key in bytes (256-bit).
pub const KEY_SIZE: usize = 32;

/// Size of an AES-GCM nonce (96-bit).
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag.
pub const TAG_SIZE: usize = 16;
