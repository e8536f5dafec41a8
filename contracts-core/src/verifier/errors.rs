//! Errors stemming from claim verification

use alloy_primitives::Address;
use contracts_common::backends::EcdsaError;
use core::fmt::{self, Display, Formatter};

/// The reasons a claim is rejected.
///
/// All of these are permanent: retrying the same claim & signature
/// yields the same rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifierError {
    /// The signature is structurally invalid, or no signer can be recovered from it
    MalformedSignature,
    /// The signature was produced by someone other than the trusted signer
    SignerMismatch {
        /// The signer recovered from the signature
        recovered: Address,
    },
    /// The claim is validly signed, but for another contract deployment
    ContractMismatch {
        /// The contract the claim was signed for
        presented: Address,
    },
    /// The claim's nonce has already been consumed for its account
    NonceReplayed,
    /// The claim's amount is zero
    AmountInvalid,
    /// The caller may not perform an owner-only operation
    Unauthorized,
    /// The zero address may not be configured as the trusted signer
    InvalidSigner,
}

impl VerifierError {
    /// Whether the rejection points at a forged or wrongly-keyed signature,
    /// and should be surfaced as a security event
    pub fn is_security_event(&self) -> bool {
        matches!(
            self,
            VerifierError::SignerMismatch { .. } | VerifierError::ContractMismatch { .. }
        )
    }
}

impl Display for VerifierError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            VerifierError::MalformedSignature => write!(f, "malformed signature"),
            VerifierError::SignerMismatch { recovered } => {
                write!(f, "signer mismatch: recovered {recovered}")
            }
            VerifierError::ContractMismatch { presented } => {
                write!(f, "claim is bound to another contract: {presented}")
            }
            VerifierError::NonceReplayed => write!(f, "nonce already consumed"),
            VerifierError::AmountInvalid => write!(f, "claim amount must be nonzero"),
            VerifierError::Unauthorized => write!(f, "caller is not the owner"),
            VerifierError::InvalidSigner => write!(f, "invalid trusted signer"),
        }
    }
}

impl From<EcdsaError> for VerifierError {
    fn from(_value: EcdsaError) -> Self {
        VerifierError::MalformedSignature
    }
}
