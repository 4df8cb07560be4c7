//! Canonical CBOR encoding for document records.
//!
//! RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - Absent optionals are encoded as `null`, never omitted
//!
//! The same record always produces identical bytes, so its fingerprint is a
//! byte-for-byte identity check.

use ciborium::value::{Integer, Value};

use crate::error::CoreError;
use crate::identity::Principal;
use crate::record::{DocumentRecord, DocumentStatus};
use crate::types::{BlockHeight, DocumentHash};

/// Encoding version written under key 0.
pub const RECORD_VERSION: u64 = 1;

/// Record field keys. Keys 0-23 encode as single bytes.
mod keys {
    pub const VERSION: u64 = 0;
    pub const HASH: u64 = 1;
    pub const OWNER: u64 = 2;
    pub const NAME: u64 = 3;
    pub const METADATA: u64 = 4;
    pub const EXPIRES_AT: u64 = 5;
    pub const STATUS: u64 = 6;
    pub const CREATED_AT: u64 = 7;
    pub const UPDATED_AT: u64 = 8;
}

/// Encode a record to canonical CBOR bytes.
pub fn canonical_record_bytes(record: &DocumentRecord) -> Vec<u8> {
    let value = record_to_cbor_value(record);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value);
    buf
}

/// Decode a record from canonical bytes.
///
/// Input that decodes but is not in canonical form is rejected.
pub fn decode_record(bytes: &[u8]) -> Result<DocumentRecord, CoreError> {
    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;
    let record = cbor_value_to_record(&value)?;

    if canonical_record_bytes(&record) != bytes {
        return Err(CoreError::MalformedRecord("non-canonical encoding".into()));
    }

    Ok(record)
}

fn record_to_cbor_value(record: &DocumentRecord) -> Value {
    let int = |k: u64| Value::Integer(k.into());
    let optional_text = |t: &Option<String>| match t {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    };

    let expires_at = match record.expires_at {
        Some(height) => Value::Integer(height.get().into()),
        None => Value::Null,
    };

    Value::Map(vec![
        (int(keys::VERSION), Value::Integer(RECORD_VERSION.into())),
        (int(keys::HASH), Value::Bytes(record.hash.0.to_vec())),
        (int(keys::OWNER), Value::Bytes(record.owner.0.to_vec())),
        (int(keys::NAME), Value::Text(record.name.clone())),
        (int(keys::METADATA), optional_text(&record.metadata)),
        (int(keys::EXPIRES_AT), expires_at),
        (int(keys::STATUS), Value::Text(record.status.as_str().to_string())),
        (int(keys::CREATED_AT), Value::Integer(record.created_at.get().into())),
        (int(keys::UPDATED_AT), Value::Integer(record.updated_at.get().into())),
    ])
}

fn cbor_value_to_record(value: &Value) -> Result<DocumentRecord, CoreError> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(CoreError::MalformedRecord("expected map".into())),
    };

    let get = |key: u64| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if u64::try_from(*i).ok() == Some(key)))
            .map(|(_, v)| v)
    };

    let as_u64 = |i: &Integer, field: &str| -> Result<u64, CoreError> {
        u64::try_from(*i).map_err(|_| CoreError::MalformedRecord(format!("invalid {}", field)))
    };

    let as_32 = |v: Option<&Value>, field: &str| -> Result<[u8; 32], CoreError> {
        match v {
            Some(Value::Bytes(b)) if b.len() == 32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(b);
                Ok(arr)
            }
            _ => Err(CoreError::MalformedRecord(format!("invalid {}", field))),
        }
    };

    match get(keys::VERSION) {
        Some(Value::Integer(i)) if as_u64(i, "version")? == RECORD_VERSION => {}
        Some(Value::Integer(i)) => {
            return Err(CoreError::MalformedRecord(format!(
                "unsupported version {}",
                i128::from(*i)
            )))
        }
        _ => return Err(CoreError::MalformedRecord("missing version".into())),
    }

    let hash = DocumentHash(as_32(get(keys::HASH), "hash")?);
    let owner = Principal(as_32(get(keys::OWNER), "owner")?);

    let name = match get(keys::NAME) {
        Some(Value::Text(s)) => s.clone(),
        _ => return Err(CoreError::MalformedRecord("invalid name".into())),
    };

    let metadata = match get(keys::METADATA) {
        Some(Value::Text(s)) => Some(s.clone()),
        Some(Value::Null) => None,
        _ => return Err(CoreError::MalformedRecord("invalid metadata".into())),
    };

    let expires_at = match get(keys::EXPIRES_AT) {
        Some(Value::Integer(i)) => Some(BlockHeight(as_u64(i, "expires_at")?)),
        Some(Value::Null) => None,
        _ => return Err(CoreError::MalformedRecord("invalid expires_at".into())),
    };

    let status = match get(keys::STATUS) {
        Some(Value::Text(s)) => DocumentStatus::parse(s)
            .ok_or_else(|| CoreError::MalformedRecord("empty status".into()))?,
        _ => return Err(CoreError::MalformedRecord("invalid status".into())),
    };

    let created_at = match get(keys::CREATED_AT) {
        Some(Value::Integer(i)) => BlockHeight(as_u64(i, "created_at")?),
        _ => return Err(CoreError::MalformedRecord("missing created_at".into())),
    };

    let updated_at = match get(keys::UPDATED_AT) {
        Some(Value::Integer(i)) => BlockHeight(as_u64(i, "updated_at")?),
        _ => return Err(CoreError::MalformedRecord("missing updated_at".into())),
    };

    Ok(DocumentRecord {
        hash,
        owner,
        name,
        metadata,
        expires_at,
        status,
        created_at,
        updated_at,
    })
}

/// Recursively encode a CBOR value.
///
/// Only the value kinds a record produces are supported.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => {
            encode_uint(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Value::Text(s) => {
            encode_uint(buf, 3, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Map(entries) => encode_map_canonical(buf, entries),
        Value::Null => buf.push(0xf6),
        other => unreachable!("records never encode {:?}", other),
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: Integer) {
    let n = i128::from(i);

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a map canonically (major type 5), keys sorted by encoded bytes.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentRecord {
        let mut record = DocumentRecord::new(
            DocumentHash::from_bytes([0x01; 32]),
            Principal::from_bytes([0x02; 32]),
            "contract.pdf",
            Some("signed copy".into()),
            Some(BlockHeight::new(70_000)),
            BlockHeight::new(12),
        );
        record.status = DocumentStatus::Custom("under-review".into());
        record
    }

    #[test]
    fn test_encoding_deterministic() {
        assert_eq!(canonical_record_bytes(&sample()), canonical_record_bytes(&sample()));
    }

    #[test]
    fn test_record_roundtrip() {
        let record = sample();
        let decoded = decode_record(&canonical_record_bytes(&record)).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn test_absent_optionals_roundtrip_as_none() {
        let record = DocumentRecord::new(
            DocumentHash::from_bytes([0x03; 32]),
            Principal::from_bytes([0x04; 32]),
            "doc",
            None,
            None,
            BlockHeight::ZERO,
        );
        let decoded = decode_record(&canonical_record_bytes(&record)).unwrap();
        assert_eq!(decoded.metadata, None);
        assert_eq!(decoded.expires_at, None);
    }

    #[test]
    fn test_map_header_and_first_key() {
        let bytes = canonical_record_bytes(&sample());
        // Map of 9 entries, then key 0 -> version 1.
        assert_eq!(bytes[0], 0xa9);
        assert_eq!(bytes[1], 0x00);
        assert_eq!(bytes[2], 0x01);
    }

    #[test]
    fn test_integer_encoding() {
        let mut buf = Vec::new();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        buf.clear();
        encode_uint(&mut buf, 0, 70_000);
        assert_eq!(buf, vec![0x1a, 0x00, 0x01, 0x11, 0x70]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_record(&[0xff, 0x00]).is_err());
        assert!(decode_record(&[0xa0]).is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let mut bytes = canonical_record_bytes(&sample());
        bytes[2] = 0x02;
        assert!(matches!(
            decode_record(&bytes),
            Err(CoreError::MalformedRecord(_))
        ));
    }
}
