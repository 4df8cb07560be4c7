//! Precondition checks for registry operations.
//!
//! Every check is pure: it looks at its inputs and either passes or names
//! the rule that was broken. The registry runs them in a fixed order
//! (existence, then authorization, then value validity) before any write.

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::identity::Principal;
use crate::record::{DocumentRecord, DocumentStatus};
use crate::types::{BlockHeight, DocumentHash};

/// Default maximum length of a document name, in characters.
pub const MAX_NAME_LEN: usize = 256;

/// Default maximum length of document metadata, in characters.
pub const MAX_METADATA_LEN: usize = 1024;

/// Default maximum length of a status label, in characters.
pub const MAX_STATUS_LEN: usize = 32;

/// Upper bounds on caller-supplied text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_name_len: usize,
    pub max_metadata_len: usize,
    pub max_status_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_name_len: MAX_NAME_LEN,
            max_metadata_len: MAX_METADATA_LEN,
            max_status_len: MAX_STATUS_LEN,
        }
    }
}

impl Limits {
    /// A name must be non-empty and within bounds.
    pub fn check_name(&self, name: &str) -> Result<(), DocumentError> {
        let len = name.chars().count();
        if len == 0 || len > self.max_name_len {
            return Err(DocumentError::InvalidName {
                max: self.max_name_len,
            });
        }
        Ok(())
    }

    /// Absent metadata is always fine.
    pub fn check_metadata(&self, metadata: Option<&str>) -> Result<(), DocumentError> {
        match metadata {
            Some(text) if text.chars().count() > self.max_metadata_len => {
                Err(DocumentError::MetadataTooLong {
                    max: self.max_metadata_len,
                })
            }
            _ => Ok(()),
        }
    }

    /// Parse status text, rejecting empty or over-long labels.
    pub fn parse_status(&self, status: &str) -> Result<DocumentStatus, DocumentError> {
        let invalid = DocumentError::InvalidStatus {
            max: self.max_status_len,
        };
        if status.chars().count() > self.max_status_len {
            return Err(invalid);
        }
        DocumentStatus::parse(status).ok_or(invalid)
    }
}

/// The record must exist.
pub fn require_existing(
    hash: &DocumentHash,
    record: Option<DocumentRecord>,
) -> Result<DocumentRecord, DocumentError> {
    record.ok_or(DocumentError::NotFound(*hash))
}

/// The record must not exist yet.
pub fn require_absent(
    hash: &DocumentHash,
    record: Option<&DocumentRecord>,
) -> Result<(), DocumentError> {
    match record {
        Some(_) => Err(DocumentError::DuplicateDocument(*hash)),
        None => Ok(()),
    }
}

/// Only the current owner may mutate a record.
pub fn require_owner(record: &DocumentRecord, caller: &Principal) -> Result<(), DocumentError> {
    if record.is_owned_by(caller) {
        Ok(())
    } else {
        Err(DocumentError::Unauthorized(record.hash))
    }
}

/// The zero principal can never receive a record.
pub fn require_valid_owner(new_owner: &Principal) -> Result<(), DocumentError> {
    if new_owner.is_zero() {
        Err(DocumentError::InvalidOwner)
    } else {
        Ok(())
    }
}

/// Validity at `now`: not expired, then active.
///
/// Expiration is checked first, so an expired inactive record reports
/// `Expired`.
pub fn check_validity(record: &DocumentRecord, now: BlockHeight) -> Result<(), DocumentError> {
    if let Some(expires_at) = record.expires_at {
        if now > expires_at {
            return Err(DocumentError::Expired {
                hash: record.hash,
                expires_at,
            });
        }
    }

    if !record.is_active() {
        return Err(DocumentError::Inactive {
            hash: record.hash,
            status: record.status.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DocumentRecord {
        DocumentRecord::new(
            DocumentHash::from_bytes([1; 32]),
            Principal::from_bytes([2; 32]),
            "doc",
            None,
            Some(BlockHeight::new(100)),
            BlockHeight::new(1),
        )
    }

    #[test]
    fn test_name_rules() {
        let limits = Limits::default();
        assert!(limits.check_name("doc").is_ok());
        assert_eq!(
            limits.check_name(""),
            Err(DocumentError::InvalidName { max: MAX_NAME_LEN })
        );
        assert!(limits.check_name(&"n".repeat(MAX_NAME_LEN)).is_ok());
        assert!(limits.check_name(&"n".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_limits_count_characters_not_bytes() {
        let limits = Limits {
            max_name_len: 3,
            ..Limits::default()
        };
        assert!(limits.check_name("äöü").is_ok());
    }

    #[test]
    fn test_metadata_rules() {
        let limits = Limits::default();
        assert!(limits.check_metadata(None).is_ok());
        assert!(limits.check_metadata(Some("")).is_ok());
        assert!(limits
            .check_metadata(Some(&"m".repeat(MAX_METADATA_LEN + 1)))
            .is_err());
    }

    #[test]
    fn test_status_rules() {
        let limits = Limits::default();
        assert_eq!(limits.parse_status("inactive"), Ok(DocumentStatus::Inactive));
        assert!(matches!(
            limits.parse_status(""),
            Err(DocumentError::InvalidStatus { .. })
        ));
        assert!(limits.parse_status(&"s".repeat(MAX_STATUS_LEN + 1)).is_err());
    }

    #[test]
    fn test_owner_rules() {
        let r = record();
        assert!(require_owner(&r, &Principal::from_bytes([2; 32])).is_ok());
        assert_eq!(
            require_owner(&r, &Principal::from_bytes([3; 32])),
            Err(DocumentError::Unauthorized(r.hash))
        );
        assert_eq!(
            require_valid_owner(&Principal::ZERO),
            Err(DocumentError::InvalidOwner)
        );
    }

    #[test]
    fn test_validity_expired_takes_precedence() {
        let mut r = record();
        r.status = DocumentStatus::Inactive;
        assert!(matches!(
            check_validity(&r, BlockHeight::new(101)),
            Err(DocumentError::Expired { .. })
        ));
        assert!(matches!(
            check_validity(&r, BlockHeight::new(100)),
            Err(DocumentError::Inactive { .. })
        ));
    }

    #[test]
    fn test_validity_ok() {
        assert!(check_validity(&record(), BlockHeight::new(100)).is_ok());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn name_limit_counts_chars(name in "\\PC{1,40}", max in 1usize..40) {
                let limits = Limits { max_name_len: max, ..Limits::default() };
                let fits = name.chars().count() <= max;
                prop_assert_eq!(limits.check_name(&name).is_ok(), fits);
            }

            #[test]
            fn expiry_never_reverts(expires_at in 0u64..1_000, now in 0u64..2_000, later in 0u64..1_000) {
                let mut r = record();
                r.expires_at = Some(BlockHeight::new(expires_at));
                let now = BlockHeight::new(now);
                if check_validity(&r, now).is_err() {
                    prop_assert!(check_validity(&r, now.advanced_by(later)).is_err());
                }
            }
        }
    }
}
