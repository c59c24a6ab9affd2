//! Master key manager: the password-derived top of the key hierarchy.
//!
//! A store has exactly one master record. It carries the scrypt salt and
//! cost parameters, the two master keys in AES-key-wrapped form, and an
//! HMAC computed under the master HMAC key itself — the record
//! authenticates itself under the very key it describes, once unwrapped.
//!
//! Changing the password only re-wraps the key ring; the master keys (and
//! therefore all encrypted content and item HMACs) stay valid. The salt is
//! deliberately kept across password changes; the KEK still changes
//! because the password does. Rotating the salt is optional hardening this
//! protocol leaves out.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use sbx_core::{IndexItem, SbxError, SbxResult};

use crate::integrity::update_index_item_hmac;
use crate::kdf::{derive_kek, KdfParams};
use crate::keys::{random_bytes, Kek, KeyRing};
use crate::keywrap::{unwrap_key, wrap_key};

/// Names the exact algorithm combination in use, persisted per record to
/// allow future algorithm migration without breaking old stores.
pub const CIPHER_SUITE: &str = "scrypt-aeskeywrap256-aesgcm256-hmacsha256";

/// Well-known id of the master record.
pub const MASTER_ITEM_ID: &str = "master";

/// The persisted master record. Binary fields are base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterItem {
    pub id: String,
    pub hmac: String,
    /// Last modified, milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// scrypt salt, 32 random bytes.
    pub salt: String,
    pub cpu_factor: u32,
    pub memory_factor: u32,
    pub parallelism: u32,
    /// Master encryption key, RFC 3394-wrapped under the KEK (40 bytes).
    pub wrapped_master_encryption_key: String,
    /// Master HMAC key, RFC 3394-wrapped under the KEK (40 bytes).
    pub wrapped_master_hmac_key: String,
    pub cipher_suite: String,
}

impl IndexItem for MasterItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn hmac(&self) -> &str {
        &self.hmac
    }

    fn set_hmac(&mut self, hmac: String) {
        self.hmac = hmac;
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl MasterItem {
    fn kdf_params(&self) -> KdfParams {
        KdfParams {
            cpu_factor: self.cpu_factor,
            memory_factor: self.memory_factor,
            parallelism: self.parallelism,
        }
    }

    fn decoded_salt(&self) -> SbxResult<Vec<u8>> {
        Ok(STANDARD.decode(&self.salt)?)
    }
}

fn now_epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Only key-wrap integrity failures become `InvalidPassword`; a wrong
/// password and a corrupted wrapped field must be indistinguishable, and
/// everything else propagates unchanged.
fn remap_unauthentic(error: SbxError) -> SbxError {
    match error {
        SbxError::Unauthentic => SbxError::InvalidPassword,
        other => other,
    }
}

/// Create a fresh master record for a new store: random salt, random key
/// ring, both keys wrapped under the password-derived KEK.
pub fn init(password: &SecretString) -> SbxResult<MasterItem> {
    init_with_params(password, KdfParams::default())
}

/// [`init`] with explicit KDF cost parameters.
pub fn init_with_params(password: &SecretString, params: KdfParams) -> SbxResult<MasterItem> {
    let salt: [u8; 32] = random_bytes();
    let ring = KeyRing::generate();

    let kek = derive_kek(password, &salt, params)?;
    let wrapped_master_encryption_key = wrap_key(ring.master_encryption_key(), &kek)?;
    let wrapped_master_hmac_key = wrap_key(ring.master_hmac_key(), &kek)?;

    let mut item = MasterItem {
        id: MASTER_ITEM_ID.to_string(),
        hmac: String::new(),
        timestamp: now_epoch_millis(),
        salt: STANDARD.encode(salt),
        cpu_factor: params.cpu_factor,
        memory_factor: params.memory_factor,
        parallelism: params.parallelism,
        wrapped_master_encryption_key: STANDARD.encode(wrapped_master_encryption_key),
        wrapped_master_hmac_key: STANDARD.encode(wrapped_master_hmac_key),
        cipher_suite: CIPHER_SUITE.to_string(),
    };

    update_index_item_hmac(&mut item, ring.master_hmac_key())?;
    tracing::info!(id = MASTER_ITEM_ID, "master record initialized");

    Ok(item)
}

fn unwrap_ring(item: &MasterItem, kek: &Kek) -> SbxResult<KeyRing> {
    let wrapped_encryption_key = STANDARD.decode(&item.wrapped_master_encryption_key)?;
    let wrapped_hmac_key = STANDARD.decode(&item.wrapped_master_hmac_key)?;

    let master_encryption_key =
        Zeroizing::new(unwrap_key(&wrapped_encryption_key, kek).map_err(remap_unauthentic)?);
    let master_hmac_key =
        Zeroizing::new(unwrap_key(&wrapped_hmac_key, kek).map_err(remap_unauthentic)?);

    Ok(KeyRing::new(*master_encryption_key, *master_hmac_key))
}

/// Re-derive the KEK from the stored salt and parameters, and unwrap the
/// master key ring.
///
/// Fails with `InvalidPassword` on any key-wrap integrity failure —
/// callers never learn whether the password was wrong or the record was
/// tampered with.
pub fn get_key_ring(password: &SecretString, item: &MasterItem) -> SbxResult<KeyRing> {
    let kek = derive_kek(password, &item.decoded_salt()?, item.kdf_params())?;
    unwrap_ring(item, &kek)
}

/// Re-wrap the master key ring under a KEK derived from `new_password`,
/// updating the record's wrapped keys, timestamp and HMAC in place.
///
/// The master keys themselves do not change, so existing content and item
/// HMACs stay valid. The record's HMAC key is unchanged too — only its
/// wrapping is.
pub fn change_password(
    old_password: &SecretString,
    new_password: &SecretString,
    item: &mut MasterItem,
) -> SbxResult<()> {
    let salt = item.decoded_salt()?;
    let params = item.kdf_params();

    let old_kek = derive_kek(old_password, &salt, params)?;
    let new_kek = derive_kek(new_password, &salt, params)?;

    let ring = unwrap_ring(item, &old_kek)?;

    let wrapped_master_encryption_key = wrap_key(ring.master_encryption_key(), &new_kek)?;
    let wrapped_master_hmac_key = wrap_key(ring.master_hmac_key(), &new_kek)?;

    item.wrapped_master_encryption_key = STANDARD.encode(wrapped_master_encryption_key);
    item.wrapped_master_hmac_key = STANDARD.encode(wrapped_master_hmac_key);
    item.timestamp = now_epoch_millis();
    update_index_item_hmac(item, ring.master_hmac_key())?;

    tracing::info!(id = %item.id, "master record re-wrapped under new password");
    Ok(())
}
