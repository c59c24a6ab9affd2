//! Index items: small metadata records protected by a keyed HMAC.
//!
//! Every persisted record carries at least `id`, `hmac` and `timestamp`;
//! callers add their own fields. The HMAC covers the item's *canonical
//! representation*: the record as a JSON object with the `hmac` member
//! removed and keys in lexicographic order. Key order is fixed by
//! serde_json's map type, so canonicalization is stable across versions
//! and never depends on struct declaration or insertion order.

use serde::Serialize;
use serde_json::Value;

use crate::error::{SbxError, SbxResult};

/// A metadata record whose integrity is protected by a keyed HMAC.
pub trait IndexItem: Serialize {
    /// Unique record id.
    fn id(&self) -> &str;

    /// The stored HMAC (base64), empty until first updated.
    fn hmac(&self) -> &str;

    /// Replace the stored HMAC.
    fn set_hmac(&mut self, hmac: String);

    /// Last-modified timestamp, milliseconds since the Unix epoch.
    fn timestamp(&self) -> u64;

    /// Canonical serialization of every field except `hmac`.
    ///
    /// This is the HMAC input, never persisted itself.
    fn canonical_bytes(&self) -> SbxResult<Vec<u8>> {
        let mut value = serde_json::to_value(self)?;
        let map = value.as_object_mut().ok_or_else(|| {
            SbxError::Store("index item must serialize to a JSON object".to_string())
        })?;
        map.remove("hmac");
        Ok(serde_json::to_vec(&value)?)
    }
}

/// Read the `id` field of an opaque record.
pub fn record_id(record: &Value) -> SbxResult<&str> {
    record
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| SbxError::Store("record has no string `id` field".to_string()))
}

/// Read the `timestamp` field of an opaque record.
pub fn record_timestamp(record: &Value) -> Option<u64> {
    record.get("timestamp").and_then(Value::as_u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct NoteItem {
        id: String,
        hmac: String,
        timestamp: u64,
        title: String,
    }

    impl IndexItem for NoteItem {
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

    fn note(hmac: &str) -> NoteItem {
        NoteItem {
            id: "note-1".to_string(),
            hmac: hmac.to_string(),
            timestamp: 1_700_000_000_000,
            title: "groceries".to_string(),
        }
    }

    #[test]
    fn canonical_bytes_exclude_hmac() {
        let without = note("").canonical_bytes().unwrap();
        let with = note("c29tZSBobWFj").canonical_bytes().unwrap();

        assert_eq!(without, with, "hmac must not affect the canonical form");
        assert!(!String::from_utf8(without).unwrap().contains("hmac"));
    }

    #[test]
    fn canonical_bytes_are_deterministic() {
        let a = note("x").canonical_bytes().unwrap();
        let b = note("x").canonical_bytes().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_bytes_reflect_field_changes() {
        let a = note("").canonical_bytes().unwrap();
        let mut item = note("");
        item.title = "errands".to_string();
        let b = item.canonical_bytes().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn record_id_of_opaque_record() {
        let record = serde_json::json!({ "id": "abc", "timestamp": 42 });
        assert_eq!(record_id(&record).unwrap(), "abc");
        assert_eq!(record_timestamp(&record), Some(42));

        let bad = serde_json::json!({ "timestamp": 42 });
        assert!(record_id(&bad).is_err());
    }
}
