//! Chunked content encryption.
//!
//! Encrypted blob format (binary):
//! ```text
//! [12 bytes: header nonce][48 bytes: wrapped content key + tag]
//! [chunk 0][chunk 1]...
//! chunk = [12 bytes: nonce][<= 4096 bytes: ciphertext][16 bytes: tag]
//! ```
//!
//! The content key is random per content and AES-GCM-wrapped under the
//! master encryption key with AAD `"{contentId}_{chunkCount}"`; each chunk
//! is encrypted with AAD `"{contentId}__{index}"` (0-based). Binding the
//! content id and position into the associated data prevents splicing
//! chunks between blobs or reordering chunks within one, even though every
//! chunk authenticates independently.
//!
//! Empty content encrypts to exactly the 60-byte header with a chunk count
//! of zero bound into the header AAD.

use zeroize::Zeroize;

use sbx_core::{SbxError, SbxResult};

use crate::aead;
use crate::keys::{random_bytes, ContentKey};
use crate::{KEY_SIZE, NONCE_SIZE, TAG_SIZE};

/// Plaintext bytes per chunk.
pub const CHUNK_SIZE: usize = 4096;

/// Size of a full encrypted chunk record: nonce + ciphertext + tag.
const CHUNK_RECORD_SIZE: usize = CHUNK_SIZE + NONCE_SIZE + TAG_SIZE;

/// Size of the blob header: header nonce + wrapped content key + tag.
const HEADER_SIZE: usize = NONCE_SIZE + KEY_SIZE + TAG_SIZE;

fn header_aad(content_id: &str, chunk_count: usize) -> Vec<u8> {
    format!("{content_id}_{chunk_count}").into_bytes()
}

fn chunk_aad(content_id: &str, chunk_index: usize) -> Vec<u8> {
    format!("{content_id}__{chunk_index}").into_bytes()
}

/// Encrypt `content` under a fresh random content key, itself wrapped
/// under `master_encryption_key` into the blob header.
pub fn encrypt_content(
    content: &[u8],
    master_encryption_key: &[u8; KEY_SIZE],
    content_id: &str,
) -> SbxResult<Vec<u8>> {
    let header_nonce: [u8; NONCE_SIZE] = random_bytes();
    let content_key = ContentKey::generate();
    let chunk_count = content.len().div_ceil(CHUNK_SIZE);

    let wrapped_key = aead::encrypt(
        content_key.as_bytes(),
        master_encryption_key,
        &header_nonce,
        &header_aad(content_id, chunk_count),
    )?;

    let mut blob =
        Vec::with_capacity(HEADER_SIZE + content.len() + chunk_count * (NONCE_SIZE + TAG_SIZE));
    blob.extend_from_slice(&header_nonce);
    blob.extend_from_slice(&wrapped_key);

    for (chunk_index, chunk) in content.chunks(CHUNK_SIZE).enumerate() {
        let chunk_nonce: [u8; NONCE_SIZE] = random_bytes();
        let encrypted = aead::encrypt(
            chunk,
            content_key.as_bytes(),
            &chunk_nonce,
            &chunk_aad(content_id, chunk_index),
        )?;
        blob.extend_from_slice(&chunk_nonce);
        blob.extend_from_slice(&encrypted);
    }

    Ok(blob)
}

/// Decrypt a blob produced by [`encrypt_content`] for the same
/// `content_id` under the same master encryption key.
///
/// Header failures (wrong id, wrong key, tampered header) all surface as
/// `UnauthenticHeader`; chunk failures as `UnauthenticChunk` with the
/// 1-based chunk number.
pub fn decrypt_content(
    blob: &[u8],
    master_encryption_key: &[u8; KEY_SIZE],
    content_id: &str,
) -> SbxResult<Vec<u8>> {
    if blob.len() < HEADER_SIZE {
        return Err(SbxError::InvalidLength {
            input: "encrypted content",
            expected: "at least 60",
            actual: blob.len(),
        });
    }

    let header_nonce = &blob[..NONCE_SIZE];
    let wrapped_key = &blob[NONCE_SIZE..HEADER_SIZE];
    let chunk_records: Vec<&[u8]> = blob[HEADER_SIZE..].chunks(CHUNK_RECORD_SIZE).collect();

    let mut content_key_bytes = aead::decrypt(
        wrapped_key,
        master_encryption_key,
        header_nonce,
        &header_aad(content_id, chunk_records.len()),
    )
    .map_err(|_| SbxError::UnauthenticHeader)?;

    let content_key = ContentKey::from_bytes(
        content_key_bytes
            .as_slice()
            .try_into()
            .map_err(|_| SbxError::UnauthenticHeader)?,
    );
    content_key_bytes.zeroize();

    let mut content = Vec::with_capacity(blob.len() - HEADER_SIZE);
    for (chunk_index, record) in chunk_records.iter().enumerate() {
        let chunk = decrypt_chunk(record, &content_key, content_id, chunk_index)?;
        content.extend_from_slice(&chunk);
    }

    Ok(content)
}

fn decrypt_chunk(
    record: &[u8],
    content_key: &ContentKey,
    content_id: &str,
    chunk_index: usize,
) -> SbxResult<Vec<u8>> {
    // A record shorter than nonce + tag cannot carry a valid chunk;
    // report it like any other damage to this chunk.
    if record.len() < NONCE_SIZE + TAG_SIZE {
        return Err(SbxError::UnauthenticChunk(chunk_index as u64 + 1));
    }

    let (chunk_nonce, cipher_and_tag) = record.split_at(NONCE_SIZE);
    aead::decrypt(
        cipher_and_tag,
        content_key.as_bytes(),
        chunk_nonce,
        &chunk_aad(content_id, chunk_index),
    )
    .map_err(|_| SbxError::UnauthenticChunk(chunk_index as u64 + 1))
}
