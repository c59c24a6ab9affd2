//! AES-256-GCM authenticated encryption.
//!
//! `encrypt` returns `ciphertext || tag` (tag is always 16 bytes);
//! `decrypt` takes the same shape back. Associated data is authenticated
//! but not encrypted; callers bind context into it (content id, chunk
//! index) to prevent cross-context replay.
//!
//! Key and nonce sizes are checked before any cipher call. No partial
//! computation happens on malformed input.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};

use sbx_core::{SbxError, SbxResult};

use crate::{KEY_SIZE, NONCE_SIZE, TAG_SIZE};

fn check_input(key: &[u8], iv: &[u8]) -> SbxResult<()> {
    if key.len() != KEY_SIZE {
        return Err(SbxError::InvalidLength {
            input: "key",
            expected: "32",
            actual: key.len(),
        });
    }
    if iv.len() != NONCE_SIZE {
        return Err(SbxError::InvalidLength {
            input: "iv",
            expected: "12",
            actual: iv.len(),
        });
    }
    Ok(())
}

/// Encrypt `plain` under `key`/`iv`, authenticating `associated` as well.
///
/// Returns `ciphertext || tag`.
pub fn encrypt(plain: &[u8], key: &[u8], iv: &[u8], associated: &[u8]) -> SbxResult<Vec<u8>> {
    check_input(key, iv)?;

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| SbxError::InvalidLength {
        input: "key",
        expected: "32",
        actual: key.len(),
    })?;
    let nonce = Nonce::from_slice(iv);

    cipher
        .encrypt(
            nonce,
            Payload {
                msg: plain,
                aad: associated,
            },
        )
        .map_err(|_| SbxError::Unauthentic)
}

/// Decrypt `cipher_and_tag` (ciphertext with the 16-byte tag appended).
///
/// Fails with `Unauthentic` if the tag does not verify, for any reason:
/// wrong key, wrong iv, wrong associated data, or tampered ciphertext.
pub fn decrypt(
    cipher_and_tag: &[u8],
    key: &[u8],
    iv: &[u8],
    associated: &[u8],
) -> SbxResult<Vec<u8>> {
    check_input(key, iv)?;

    if cipher_and_tag.len() < TAG_SIZE {
        return Err(SbxError::InvalidLength {
            input: "ciphertext",
            expected: "at least 16",
            actual: cipher_and_tag.len(),
        });
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| SbxError::InvalidLength {
        input: "key",
        expected: "32",
        actual: key.len(),
    })?;
    let nonce = Nonce::from_slice(iv);

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: cipher_and_tag,
                aad: associated,
            },
        )
        .map_err(|_| SbxError::Unauthentic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::random_bytes;

    // boringssl cipher_test.txt line 65 (AES-256-GCM):
    // KEY, IV, PLAIN, CIPHER || TAG, AAD
    const VECTOR_KEY: &str = "feffe9928665731c6d6a8f9467308308feffe9928665731c6d6a8f9467308308";
    const VECTOR_IV: &str = "cafebabefacedbaddecaf888";
    const VECTOR_PLAIN: &str = "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a72\
                                1c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b39";
    const VECTOR_AAD: &str = "feedfacedeadbeeffeedfacedeadbeefabaddad2";
    const VECTOR_CIPHER_AND_TAG: &str =
        "522dc1f099567d07f47f37a32a84427d643a8cdcbfe5c0c97598a2bd2555d1aa\
         8cb08e48590dbb3da7b08b1056828838c5f61e6393ba7a0abcc9f66276fc6ece\
         0f4e1768cddf8853bb2d551b";

    #[test]
    fn encrypts_boringssl_test_vector() {
        let result = encrypt(
            &hex::decode(VECTOR_PLAIN).unwrap(),
            &hex::decode(VECTOR_KEY).unwrap(),
            &hex::decode(VECTOR_IV).unwrap(),
            &hex::decode(VECTOR_AAD).unwrap(),
        )
        .unwrap();

        assert_eq!(result, hex::decode(VECTOR_CIPHER_AND_TAG).unwrap());
    }

    #[test]
    fn decrypts_boringssl_test_vector() {
        let result = decrypt(
            &hex::decode(VECTOR_CIPHER_AND_TAG).unwrap(),
            &hex::decode(VECTOR_KEY).unwrap(),
            &hex::decode(VECTOR_IV).unwrap(),
            &hex::decode(VECTOR_AAD).unwrap(),
        )
        .unwrap();

        assert_eq!(result, hex::decode(VECTOR_PLAIN).unwrap());
    }

    #[test]
    fn round_trip_with_random_values() {
        let key: [u8; 32] = random_bytes();
        let iv: [u8; 12] = random_bytes();
        let plain: [u8; 42] = random_bytes();
        let associated: [u8; 21] = random_bytes();

        let cipher_and_tag = encrypt(&plain, &key, &iv, &associated).unwrap();
        assert_eq!(cipher_and_tag.len(), plain.len() + TAG_SIZE);

        let back = decrypt(&cipher_and_tag, &key, &iv, &associated).unwrap();
        assert_eq!(back, plain);
    }

    #[test]
    fn tampered_tag_is_unauthentic() {
        let key: [u8; 32] = random_bytes();
        let iv: [u8; 12] = random_bytes();

        let mut cipher_and_tag = encrypt(b"some content", &key, &iv, b"").unwrap();
        let last = cipher_and_tag.len() - 1;
        cipher_and_tag[last] ^= 0x01;

        let result = decrypt(&cipher_and_tag, &key, &iv, b"");
        assert!(matches!(result, Err(SbxError::Unauthentic)));
    }

    #[test]
    fn tampered_ciphertext_is_unauthentic() {
        let key: [u8; 32] = random_bytes();
        let iv: [u8; 12] = random_bytes();

        let mut cipher_and_tag = encrypt(b"some content", &key, &iv, b"").unwrap();
        cipher_and_tag[0] ^= 0x01;

        let result = decrypt(&cipher_and_tag, &key, &iv, b"");
        assert!(matches!(result, Err(SbxError::Unauthentic)));
    }

    #[test]
    fn changed_associated_data_is_unauthentic() {
        let key: [u8; 32] = random_bytes();
        let iv: [u8; 12] = random_bytes();

        let cipher_and_tag = encrypt(b"some content", &key, &iv, b"context-a").unwrap();
        let result = decrypt(&cipher_and_tag, &key, &iv, b"context-b");
        assert!(matches!(result, Err(SbxError::Unauthentic)));
    }

    #[test]
    fn invalid_key_length_fails_fast() {
        let iv: [u8; 12] = random_bytes();

        let result = encrypt(b"data", &[0u8; 16], &iv, b"");
        assert!(matches!(
            result,
            Err(SbxError::InvalidLength { input: "key", .. })
        ));

        let result = decrypt(&[0u8; 32], &[0u8; 16], &iv, b"");
        assert!(matches!(
            result,
            Err(SbxError::InvalidLength { input: "key", .. })
        ));
    }

    #[test]
    fn invalid_iv_length_fails_fast() {
        let key: [u8; 32] = random_bytes();

        let result = encrypt(b"data", &key, &[0u8; 16], b"");
        assert!(matches!(
            result,
            Err(SbxError::InvalidLength { input: "iv", .. })
        ));
    }

    #[test]
    fn truncated_ciphertext_fails_fast() {
        let key: [u8; 32] = random_bytes();
        let iv: [u8; 12] = random_bytes();

        let result = decrypt(&[0u8; 8], &key, &iv, b"");
        assert!(matches!(result, Err(SbxError::InvalidLength { .. })));
    }
}
