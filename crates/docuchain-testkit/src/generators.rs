//! Proptest generators for property-based testing.

use proptest::prelude::*;

use docuchain_core::{BlockHeight, DocumentHash, Keypair, Principal};

/// Generate a random DocumentHash.
pub fn document_hash() -> impl Strategy<Value = DocumentHash> {
    any::<[u8; 32]>().prop_map(DocumentHash::from_bytes)
}

/// Generate a principal derived from a random keypair. Never zero.
pub fn principal() -> impl Strategy<Value = Principal> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed).principal())
}

/// Generate two distinct principals.
pub fn principal_pair() -> impl Strategy<Value = (Principal, Principal)> {
    (principal(), principal()).prop_filter("principals must differ", |(a, b)| a != b)
}

/// Generate a valid document name.
pub fn document_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._-]{1,64}".prop_map(String::from)
}

/// Generate optional metadata.
pub fn metadata() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[ -~]{0,128}".prop_map(String::from))
}

/// Generate a non-empty status label, including the well-known ones.
pub fn status_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("active".to_string()),
        Just("inactive".to_string()),
        "[a-z][a-z-]{0,15}".prop_map(String::from),
    ]
}

/// Generate a block height below `max`.
pub fn block_height(max: u64) -> impl Strategy<Value = BlockHeight> {
    (0..max).prop_map(BlockHeight::new)
}

/// Parameters for a store-document call.
#[derive(Debug, Clone)]
pub struct StoreParams {
    pub hash: DocumentHash,
    pub owner: Principal,
    pub name: String,
    pub metadata: Option<String>,
    pub expires_at: Option<BlockHeight>,
    pub stored_at: BlockHeight,
}

impl Arbitrary for StoreParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            document_hash(),
            principal(),
            document_name(),
            metadata(),
            proptest::option::of(0u64..10_000),
            0u64..5_000,
        )
            .prop_map(|(hash, owner, name, metadata, expires_at, stored_at)| StoreParams {
                hash,
                owner,
                name,
                metadata,
                expires_at: expires_at.map(BlockHeight::new),
                stored_at: BlockHeight::new(stored_at),
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docuchain_core::Limits;

    proptest! {
        #[test]
        fn test_generated_names_pass_limits(name in document_name()) {
            prop_assert!(Limits::default().check_name(&name).is_ok());
        }

        #[test]
        fn test_generated_status_parses(status in status_text()) {
            prop_assert!(Limits::default().parse_status(&status).is_ok());
        }

        #[test]
        fn test_generated_principals_not_zero(p in principal()) {
            prop_assert!(!p.is_zero());
        }
    }
}
