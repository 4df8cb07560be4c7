//! The host-facing call surface.
//!
//! A host submits an [`Operation`] and gets back a [`Response`]: `(ok true)`
//! or `(err uNNN)` with a stable numeric code. [`SignedCall`] lets a host
//! authenticate the caller from an Ed25519 signature over the operation.

use serde::{Deserialize, Serialize};
use std::fmt;

use docuchain_core::{
    BlockHeight, CoreError, DocumentHash, Ed25519PublicKey, Ed25519Signature, ErrorCode, Keypair,
    Principal,
};

use crate::context::Call;

/// Domain prefix for signed operation bytes.
const SIGN_DOMAIN: &[u8] = b"docuchain-call-v0:";

/// A registry operation with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Operation {
    StoreDocument {
        hash: DocumentHash,
        name: String,
        metadata: Option<String>,
        expires_at: Option<BlockHeight>,
    },
    VerifyDocument {
        hash: DocumentHash,
    },
    UpdateMetadata {
        hash: DocumentHash,
        metadata: Option<String>,
    },
    SetDocumentStatus {
        hash: DocumentHash,
        status: String,
    },
    TransferOwnership {
        hash: DocumentHash,
        new_owner: Principal,
    },
}

impl Operation {
    /// The name the host calls this operation by.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::StoreDocument { .. } => "store-document",
            Operation::VerifyDocument { .. } => "verify-document",
            Operation::UpdateMetadata { .. } => "update-metadata",
            Operation::SetDocumentStatus { .. } => "set-document-status",
            Operation::TransferOwnership { .. } => "transfer-ownership",
        }
    }

    /// The document the operation targets.
    pub fn hash(&self) -> &DocumentHash {
        match self {
            Operation::StoreDocument { hash, .. }
            | Operation::VerifyDocument { hash }
            | Operation::UpdateMetadata { hash, .. }
            | Operation::SetDocumentStatus { hash, .. }
            | Operation::TransferOwnership { hash, .. } => hash,
        }
    }

    /// Bytes a caller signs to submit this operation: SIGN_DOMAIN || CBOR.
    pub fn signing_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let mut buf = SIGN_DOMAIN.to_vec();
        ciborium::into_writer(self, &mut buf).map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(buf)
    }
}

/// The outcome of a dispatched operation as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ok(bool),
    Err(ErrorCode),
}

impl Response {
    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok(_))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok(value) => write!(f, "(ok {})", value),
            Response::Err(code) => write!(f, "(err {})", code),
        }
    }
}

/// An operation signed by the caller's key.
#[derive(Debug, Clone)]
pub struct SignedCall {
    pub public_key: Ed25519PublicKey,
    pub signature: Ed25519Signature,
    pub operation: Operation,
}

impl SignedCall {
    /// Sign `operation` with `keypair`.
    pub fn sign(keypair: &Keypair, operation: Operation) -> Result<Self, CoreError> {
        let signature = keypair.sign(&operation.signing_bytes()?);
        Ok(Self {
            public_key: keypair.public_key(),
            signature,
            operation,
        })
    }

    /// Verify the signature and produce the call context for it.
    pub fn authenticate(&self, block_height: BlockHeight) -> Result<Call, CoreError> {
        let message = self.operation.signing_bytes()?;
        self.public_key.verify(&message, &self.signature)?;
        Ok(Call::new(self.public_key.principal(), block_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify_op(byte: u8) -> Operation {
        Operation::VerifyDocument {
            hash: DocumentHash::from_bytes([byte; 32]),
        }
    }

    #[test]
    fn test_response_display() {
        assert_eq!(Response::Ok(true).to_string(), "(ok true)");
        assert_eq!(Response::Err(ErrorCode::InvalidOwner).to_string(), "(err u107)");
    }

    #[test]
    fn test_operation_json_shape() {
        let op = Operation::SetDocumentStatus {
            hash: DocumentHash::from_bytes([1; 32]),
            status: "inactive".into(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "set-document-status");
        assert_eq!(json["status"], "inactive");

        let back: Operation = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }

    #[test]
    fn test_signed_call_authenticates_signer() {
        let keypair = Keypair::from_seed(&[9; 32]);
        let signed = SignedCall::sign(&keypair, verify_op(1)).unwrap();
        let call = signed.authenticate(BlockHeight::new(3)).unwrap();
        assert_eq!(call.caller, keypair.principal());
        assert_eq!(call.block_height, BlockHeight::new(3));
    }

    #[test]
    fn test_signed_call_rejects_swapped_operation() {
        let keypair = Keypair::from_seed(&[9; 32]);
        let mut signed = SignedCall::sign(&keypair, verify_op(1)).unwrap();
        signed.operation = verify_op(2);
        assert!(matches!(
            signed.authenticate(BlockHeight::new(3)),
            Err(CoreError::InvalidSignature)
        ));
    }

    #[test]
    fn test_signed_call_rejects_other_key() {
        let keypair = Keypair::from_seed(&[9; 32]);
        let other = Keypair::from_seed(&[10; 32]);
        let mut signed = SignedCall::sign(&keypair, verify_op(1)).unwrap();
        signed.public_key = other.public_key();
        assert!(signed.authenticate(BlockHeight::new(3)).is_err());
    }
}
