//! Keyed-HMAC integrity protection for index items.
//!
//! The HMAC-SHA-256 is computed over the item's canonical representation
//! (every field except `hmac`, stable order — see `sbx_core::item`) and
//! stored base64-encoded in the `hmac` field.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use sbx_core::{IndexItem, SbxError, SbxResult};

use crate::KEY_SIZE;

type HmacSha256 = Hmac<Sha256>;

fn create_hmac(data: &[u8], key: &[u8; KEY_SIZE]) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(data);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Recompute the item's HMAC under `key` and store it in the `hmac` field.
pub fn update_index_item_hmac(item: &mut impl IndexItem, key: &[u8; KEY_SIZE]) -> SbxResult<()> {
    let canonical = item.canonical_bytes()?;
    item.set_hmac(create_hmac(&canonical, key));
    Ok(())
}

/// Verify the item's stored HMAC under `key`.
///
/// Comparison is constant time. An undecodable stored value counts as a
/// mismatch; both fail with `IndexItemNotAuthentic`.
pub fn check_index_item_hmac(item: &impl IndexItem, key: &[u8; KEY_SIZE]) -> SbxResult<()> {
    let not_authentic = || SbxError::IndexItemNotAuthentic(item.id().to_string());

    let stored = STANDARD.decode(item.hmac()).map_err(|_| not_authentic())?;

    let mut mac = HmacSha256::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(&item.canonical_bytes()?);
    mac.verify_slice(&stored).map_err(|_| not_authentic())
}
