use thiserror::Error;

pub type SbxResult<T> = Result<T, SbxError>;

#[derive(Debug, Error)]
pub enum SbxError {
    /// A crypto input had the wrong size. Detected before any cipher
    /// operation runs; nothing is ever truncated or padded silently.
    #[error("invalid {input} length: must be {expected}, got {actual} bytes")]
    InvalidLength {
        input: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// AEAD tag mismatch or key-wrap integrity-block mismatch.
    #[error("integrity check failed: data is not authentic")]
    Unauthentic,

    /// The wrapped content key in an encrypted blob failed to authenticate.
    /// Wrong content id, wrong master key and a tampered header all
    /// produce this same error.
    #[error("unauthentic content header")]
    UnauthenticHeader,

    /// A content chunk failed to authenticate. The index is 1-based.
    #[error("unauthentic content chunk {0}")]
    UnauthenticChunk(u64),

    /// Unwrapping the master key ring failed. Deliberately covers both a
    /// wrong password and a corrupted master record, so callers cannot be
    /// used as a distinguishing oracle.
    #[error("invalid password")]
    InvalidPassword,

    /// An index item's stored HMAC does not match its contents.
    #[error("index item {0} is not authentic")]
    IndexItemNotAuthentic(String),

    /// Persistence-layer not-found, surfaced unchanged.
    #[error("index item {0} does not exist")]
    NoSuchIndexItem(String),

    /// A key-using operation was attempted on a locked session.
    #[error("session is locked")]
    SessionLocked,

    #[error("key derivation failed: {0}")]
    Kdf(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] base64::DecodeError),
}
