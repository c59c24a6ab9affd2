//! AES Key Wrap (RFC 3394) under a 256-bit key-encryption-key.
//!
//! Deterministic, non-randomized wrapping with 64 bits of built-in
//! integrity checking, built on raw single-block AES-256-ECB operations
//! (no padding semantics involved).
//!
//! Two input-size policies exist:
//! - [`wrap`]/[`unwrap`]: generic data, any multiple of 8 bytes, at least
//!   16 in / 24 out.
//! - [`wrap_key`]/[`unwrap_key`]: the master-key policy, exactly 32 bytes
//!   in / 40 bytes out. Used for the master key ring.

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes256;
use zeroize::Zeroize;

use sbx_core::{SbxError, SbxResult};

use crate::keys::Kek;
use crate::KEY_SIZE;

/// RFC 3394 integrity check value.
const ICV: u64 = 0xA6A6_A6A6_A6A6_A6A6;

/// Wrapped length of a 32-byte key: 8-byte integrity block + 32 bytes.
pub const WRAPPED_KEY_SIZE: usize = 40;

fn check_wrap_input(key_data: &[u8]) -> SbxResult<()> {
    if key_data.len() % 8 != 0 || key_data.len() < 16 {
        return Err(SbxError::InvalidLength {
            input: "key data",
            expected: "a multiple of 8 and at least 16",
            actual: key_data.len(),
        });
    }
    Ok(())
}

fn check_unwrap_input(wrapped: &[u8]) -> SbxResult<()> {
    if wrapped.len() % 8 != 0 || wrapped.len() < 24 {
        return Err(SbxError::InvalidLength {
            input: "wrapped key data",
            expected: "a multiple of 8 and at least 24",
            actual: wrapped.len(),
        });
    }
    Ok(())
}

/// Wrap `key_data` under `kek`. Generic size policy.
///
/// Output is 8 bytes longer than the input.
pub fn wrap(key_data: &[u8], kek: &Kek) -> SbxResult<Vec<u8>> {
    check_wrap_input(key_data)?;

    let cipher = Aes256::new(GenericArray::from_slice(kek.as_bytes()));
    let n = key_data.len() / 8;

    let mut a = ICV;
    let mut r: Vec<[u8; 8]> = key_data
        .chunks_exact(8)
        .map(|chunk| chunk.try_into().expect("chunks_exact yields 8 bytes"))
        .collect();

    for j in 0..6u64 {
        for i in 0..n {
            let mut buf = [0u8; 16];
            buf[..8].copy_from_slice(&a.to_be_bytes());
            buf[8..].copy_from_slice(&r[i]);

            let mut block = GenericArray::from(buf);
            cipher.encrypt_block(&mut block);
            let out: [u8; 16] = block.into();

            let t = (n as u64) * j + (i as u64) + 1;
            a = u64::from_be_bytes(out[..8].try_into().expect("8-byte slice")) ^ t;
            r[i].copy_from_slice(&out[8..]);
        }
    }

    let mut wrapped = Vec::with_capacity(key_data.len() + 8);
    wrapped.extend_from_slice(&a.to_be_bytes());
    for part in &r {
        wrapped.extend_from_slice(part);
    }
    Ok(wrapped)
}

/// Unwrap `wrapped` under `kek`. Generic size policy.
///
/// Fails with `Unauthentic` if the integrity check value does not match
/// after unwrapping. A wrong KEK and tampered data produce the same error.
pub fn unwrap(wrapped: &[u8], kek: &Kek) -> SbxResult<Vec<u8>> {
    check_unwrap_input(wrapped)?;

    let cipher = Aes256::new(GenericArray::from_slice(kek.as_bytes()));
    let n = wrapped.len() / 8 - 1;

    let mut a = u64::from_be_bytes(wrapped[..8].try_into().expect("8-byte slice"));
    let mut r: Vec<[u8; 8]> = wrapped[8..]
        .chunks_exact(8)
        .map(|chunk| chunk.try_into().expect("chunks_exact yields 8 bytes"))
        .collect();

    for j in (0..6u64).rev() {
        for i in (0..n).rev() {
            let t = (n as u64) * j + (i as u64) + 1;

            let mut buf = [0u8; 16];
            buf[..8].copy_from_slice(&(a ^ t).to_be_bytes());
            buf[8..].copy_from_slice(&r[i]);

            let mut block = GenericArray::from(buf);
            cipher.decrypt_block(&mut block);
            let out: [u8; 16] = block.into();

            a = u64::from_be_bytes(out[..8].try_into().expect("8-byte slice"));
            r[i].copy_from_slice(&out[8..]);
        }
    }

    if a != ICV {
        for part in &mut r {
            part.zeroize();
        }
        return Err(SbxError::Unauthentic);
    }

    let mut key_data = Vec::with_capacity(n * 8);
    for part in &r {
        key_data.extend_from_slice(part);
    }
    Ok(key_data)
}

/// Wrap a 32-byte key under `kek`. Fixed master-key policy: exactly
/// 32 bytes in, 40 bytes out.
pub fn wrap_key(key: &[u8; KEY_SIZE], kek: &Kek) -> SbxResult<[u8; WRAPPED_KEY_SIZE]> {
    let wrapped = wrap(key, kek)?;
    Ok(wrapped.try_into().expect("32-byte input wraps to 40 bytes"))
}

/// Unwrap a 40-byte wrapped key under `kek`. Fixed master-key policy.
pub fn unwrap_key(wrapped: &[u8], kek: &Kek) -> SbxResult<[u8; KEY_SIZE]> {
    if wrapped.len() != WRAPPED_KEY_SIZE {
        return Err(SbxError::InvalidLength {
            input: "wrapped key",
            expected: "40",
            actual: wrapped.len(),
        });
    }

    let mut key_data = unwrap(wrapped, kek)?;
    let key = key_data
        .as_slice()
        .try_into()
        .expect("40-byte input unwraps to 32 bytes");
    key_data.zeroize();
    Ok(key)
}
