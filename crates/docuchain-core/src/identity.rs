//! Principals: the identities that own and mutate document records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::Ed25519PublicKey;

/// A 32-byte authenticated caller identity.
///
/// The registry never authenticates principals itself; the host hands it one
/// per call. [`Principal::ZERO`] is reserved and can never own a record.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal(pub [u8; 32]);

impl Principal {
    /// The reserved null identity.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the principal for an Ed25519 public key.
    ///
    /// Blake3("docuchain-principal-v0:" || public_key).
    pub fn from_public_key(public_key: &Ed25519PublicKey) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"docuchain-principal-v0:");
        hasher.update(public_key.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this is the reserved null identity.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl From<[u8; 32]> for Principal {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_principal() {
        assert!(Principal::ZERO.is_zero());
        assert!(!Principal::from_bytes([1; 32]).is_zero());
    }

    #[test]
    fn test_derivation_is_domain_separated() {
        let pk = Ed25519PublicKey::from_bytes([7; 32]);
        let principal = Principal::from_public_key(&pk);
        assert_ne!(principal.as_bytes(), pk.as_bytes());
        assert_eq!(principal, Principal::from_public_key(&pk));
    }

    #[test]
    fn test_principal_hex_roundtrip() {
        let principal = Principal::from_bytes([0x5a; 32]);
        assert_eq!(Principal::from_hex(&principal.to_hex()).unwrap(), principal);
    }

    #[test]
    fn test_principal_accepts_0x_prefix() {
        let principal = Principal::from_bytes([0x5a; 32]);
        let prefixed = format!("0x{}", principal.to_hex());
        assert_eq!(Principal::from_hex(&prefixed).unwrap(), principal);
        assert!(Principal::from_hex("0x5a").is_err());
    }
}
