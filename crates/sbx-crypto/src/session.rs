//! Lockable session: the caller-owned handle to an unlocked key ring.
//!
//! A [`Session`] starts locked and holds no key material. `unlock`
//! populates it from a master record and password; `lock` wipes it. Every
//! key-using operation on a locked session fails with `SessionLocked`
//! instead of silently operating on empty keys.
//!
//! The session is an owned value, not process-global state: multiple
//! independent sessions can coexist, and callers that share one across
//! threads wrap it in their own `Mutex`.

use secrecy::SecretString;

use sbx_core::{IndexItem, SbxResult};

use crate::keys::KeyRing;
use crate::master::{self, MasterItem};
use crate::{content, integrity};

#[derive(Debug, Default)]
pub struct Session {
    ring: Option<KeyRing>,
}

impl Session {
    /// A new, locked session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.ring.is_none()
    }

    fn ring(&self) -> SbxResult<&KeyRing> {
        self.ring.as_ref().ok_or(sbx_core::SbxError::SessionLocked)
    }

    /// Unlock with `password` against the store's master record.
    ///
    /// On failure the session is left untouched (and stays locked if it
    /// was locked).
    pub fn unlock(&mut self, password: &SecretString, item: &MasterItem) -> SbxResult<()> {
        match master::get_key_ring(password, item) {
            Ok(ring) => {
                self.ring = Some(ring);
                tracing::info!("session unlocked");
                Ok(())
            }
            Err(error) => {
                tracing::warn!("unlock failed: {error}");
                Err(error)
            }
        }
    }

    /// Discard the key material. Dropping the ring zeroizes it.
    pub fn lock(&mut self) {
        self.ring = None;
        tracing::info!("session locked");
    }

    /// Change the store password. Only re-wraps the persisted record; the
    /// live key ring (if any) is unchanged because the master keys are.
    pub fn change_password(
        &self,
        old_password: &SecretString,
        new_password: &SecretString,
        item: &mut MasterItem,
    ) -> SbxResult<()> {
        master::change_password(old_password, new_password, item)
    }

    pub fn encrypt_content(&self, content: &[u8], content_id: &str) -> SbxResult<Vec<u8>> {
        content::encrypt_content(content, self.ring()?.master_encryption_key(), content_id)
    }

    pub fn decrypt_content(&self, blob: &[u8], content_id: &str) -> SbxResult<Vec<u8>> {
        content::decrypt_content(blob, self.ring()?.master_encryption_key(), content_id)
    }

    pub fn update_index_item_hmac(&self, item: &mut impl IndexItem) -> SbxResult<()> {
        integrity::update_index_item_hmac(item, self.ring()?.master_hmac_key())
    }

    pub fn check_index_item_hmac(&self, item: &impl IndexItem) -> SbxResult<()> {
        integrity::check_index_item_hmac(item, self.ring()?.master_hmac_key())
    }
}
