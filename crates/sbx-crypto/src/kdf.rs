//! Password-based key derivation: scrypt password → KEK.
//!
//! scrypt is deliberately CPU- and memory-expensive (tunable via the cost
//! parameters); callers on latency-sensitive paths should run derivation
//! on a blocking pool.

use scrypt::{scrypt, Params};
use secrecy::{ExposeSecret, SecretString};

use sbx_core::{SbxError, SbxResult};

use crate::keys::Kek;
use crate::KEY_SIZE;

/// scrypt cost parameters, persisted in plaintext alongside the master
/// record so the same KEK can be re-derived later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// scrypt N. Must be a power of two (default: 32768)
    pub cpu_factor: u32,
    /// scrypt r (default: 8)
    pub memory_factor: u32,
    /// scrypt p (default: 1)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            cpu_factor: 32_768,
            memory_factor: 8,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    fn to_scrypt_params(self) -> SbxResult<Params> {
        if !self.cpu_factor.is_power_of_two() {
            return Err(SbxError::Kdf(format!(
                "cpu factor must be a power of two, got {}",
                self.cpu_factor
            )));
        }

        let log_n = self.cpu_factor.trailing_zeros() as u8;
        Params::new(log_n, self.memory_factor, self.parallelism, KEY_SIZE)
            .map_err(|e| SbxError::Kdf(format!("invalid scrypt params: {e}")))
    }
}

/// Derive a 256-bit KEK from a password and salt.
///
/// Deterministic for identical inputs; the salt is random per store and
/// does not need to be secret.
pub fn derive_kek(password: &SecretString, salt: &[u8], params: KdfParams) -> SbxResult<Kek> {
    let scrypt_params = params.to_scrypt_params()?;

    let mut kek = [0u8; KEY_SIZE];
    scrypt(
        password.expose_secret().as_bytes(),
        salt,
        &scrypt_params,
        &mut kek,
    )
    .map_err(|e| SbxError::Kdf(format!("scrypt derivation failed: {e}")))?;

    Ok(Kek::from_bytes(kek))
}
