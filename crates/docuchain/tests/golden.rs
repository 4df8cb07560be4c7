//! Golden vectors for record encoding and signed calls.
//!
//! Any host replaying Docuchain records must produce identical:
//! - record_bytes (canonical CBOR)
//! - fingerprint
//! - owner principal for a given key seed
//! - signature over a call (deterministic Ed25519)

use docuchain::core::{canonical_record_bytes, decode_record};
use docuchain::{
    BlockHeight, DocumentHash, DocumentRecord, DocumentStatus, ErrorCode, Keypair, Operation,
    SignedCall,
};
use serde::{Deserialize, Serialize};

/// A single golden vector.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub owner_seed: String,
    pub document: String,
    pub record_name: String,
    pub metadata: Option<String>,
    pub expires_at: Option<u64>,
    pub status: String,
    pub created_at: u64,

    // Derived outputs (hex)
    pub owner: String,
    pub record_bytes: String,
    pub fingerprint: String,
    pub call_signature: String,
}

#[allow(clippy::too_many_arguments)]
fn generate_vector(
    name: &str,
    description: &str,
    seed: [u8; 32],
    document: &[u8],
    record_name: &str,
    metadata: Option<&str>,
    expires_at: Option<u64>,
    status: &str,
    created_at: u64,
) -> GoldenVector {
    let keypair = Keypair::from_seed(&seed);
    let hash = DocumentHash::digest(document);

    let mut record = DocumentRecord::new(
        hash,
        keypair.principal(),
        record_name,
        metadata.map(String::from),
        expires_at.map(BlockHeight::new),
        BlockHeight::new(created_at),
    );
    record.status = DocumentStatus::parse(status).unwrap();

    let bytes = canonical_record_bytes(&record);
    let operation = Operation::StoreDocument {
        hash,
        name: record_name.to_string(),
        metadata: record.metadata.clone(),
        expires_at: record.expires_at,
    };
    let signed = SignedCall::sign(&keypair, operation).unwrap();

    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        owner_seed: hex::encode(seed),
        document: hash.to_hex(),
        record_name: record_name.to_string(),
        metadata: record.metadata.clone(),
        expires_at,
        status: status.to_string(),
        created_at,
        owner: record.owner.to_hex(),
        record_bytes: hex::encode(&bytes),
        fingerprint: record.fingerprint().to_hex(),
        call_signature: signed.signature.to_hex(),
    }
}

pub fn generate_all_vectors() -> Vec<GoldenVector> {
    vec![
        generate_vector(
            "minimal",
            "No metadata, no expiry, active",
            [0x01; 32],
            b"",
            "a",
            None,
            None,
            "active",
            0,
        ),
        generate_vector(
            "with_metadata",
            "Metadata and an expiry height",
            [0x02; 32],
            b"contract contents",
            "contract.pdf",
            Some("signed by both parties"),
            Some(1_000),
            "active",
            10,
        ),
        generate_vector(
            "inactive",
            "Deactivated record",
            [0x03; 32],
            b"superseded",
            "old-policy.txt",
            None,
            None,
            "inactive",
            42,
        ),
        generate_vector(
            "custom_status",
            "Free-form status label",
            [0x04; 32],
            b"draft",
            "draft.md",
            Some(""),
            None,
            "under-review",
            7,
        ),
        generate_vector(
            "max_name",
            "Name at the maximum allowed length (256 characters)",
            [0x05; 32],
            b"long name",
            &"n".repeat(256),
            None,
            Some(u64::MAX),
            "active",
            1,
        ),
        generate_vector(
            "unicode",
            "Multi-byte characters in name and metadata",
            [0x06; 32],
            b"unicode",
            "r\u{e9}sum\u{e9}.pdf",
            Some("\u{65e5}\u{672c}"),
            Some(24),
            "active",
            24,
        ),
    ]
}

#[test]
fn test_generate_vectors() {
    let vectors = generate_all_vectors();
    assert_eq!(vectors.len(), 6);

    for v in &vectors {
        println!("=== {} ===", v.name);
        println!("  owner: {}", v.owner);
        println!("  fingerprint: {}", v.fingerprint);
        println!();
    }
}

#[test]
fn test_vectors_deterministic() {
    let first = serde_json::to_string(&generate_all_vectors()).unwrap();
    let second = serde_json::to_string(&generate_all_vectors()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_vectors_decode() {
    for v in generate_all_vectors() {
        let bytes = hex::decode(&v.record_bytes).unwrap();
        let record = decode_record(&bytes).unwrap();
        assert_eq!(record.hash.to_hex(), v.document, "{}", v.name);
        assert_eq!(record.owner.to_hex(), v.owner, "{}", v.name);
        assert_eq!(record.status.as_str(), v.status, "{}", v.name);
        assert_eq!(record.fingerprint().to_hex(), v.fingerprint, "{}", v.name);
    }
}

#[test]
fn test_record_bytes_layout() {
    // 9-entry map; key 0 = version 1; key 1 = 32-byte hash.
    for v in generate_all_vectors() {
        assert!(v.record_bytes.starts_with("a90001015820"), "{}", v.name);
    }
}

#[test]
fn test_error_codes_stable() {
    let table = [
        (ErrorCode::Unauthorized, 100),
        (ErrorCode::DuplicateDocument, 101),
        (ErrorCode::NotFound, 102),
        (ErrorCode::Expired, 103),
        (ErrorCode::InvalidName, 104),
        (ErrorCode::Inactive, 105),
        (ErrorCode::InvalidStatus, 106),
        (ErrorCode::InvalidOwner, 107),
        (ErrorCode::MetadataTooLong, 108),
    ];
    for (code, value) in table {
        assert_eq!(code.as_u32(), value);
        assert_eq!(ErrorCode::from_u32(value), Some(code));
    }
}
