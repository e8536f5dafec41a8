//! Common types used throughout the signer & verifier.

use alloy_primitives::{Address, FixedBytes, U256};
use core::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        LEGACY_RECOVERY_ID_OFFSET, NUM_BYTES_SIGNATURE, NUM_BYTES_SIGNATURE_SCALAR,
        SECP256K1_HALF_ORDER,
    },
    custom_serde::SerdeError,
};

/// A claim that `account` is owed `amount`, redeemable at most once
/// per `nonce` against the verifying `contract`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    /// The account owed the reward
    pub account: Address,
    /// The reward amount
    pub amount: U256,
    /// The value making this claim unique for the account
    pub nonce: U256,
    /// The address of the contract instance the claim is bound to
    pub contract: Address,
}

/// A secp256k1 ECDSA signature in its 65-byte wire form, `r || s || v`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardSignature(pub FixedBytes<NUM_BYTES_SIGNATURE>);

impl RewardSignature {
    /// Construct a signature from its scalars & y-parity.
    ///
    /// The recovery identifier is emitted in its legacy form, i.e. 27 or 28,
    /// which is what Solidity's `ecrecover` expects.
    pub fn from_parts(r: U256, s: U256, y_parity: bool) -> Self {
        let mut bytes = [0_u8; NUM_BYTES_SIGNATURE];
        bytes[..NUM_BYTES_SIGNATURE_SCALAR].copy_from_slice(&r.to_be_bytes::<32>());
        bytes[NUM_BYTES_SIGNATURE_SCALAR..2 * NUM_BYTES_SIGNATURE_SCALAR]
            .copy_from_slice(&s.to_be_bytes::<32>());
        bytes[NUM_BYTES_SIGNATURE - 1] = LEGACY_RECOVERY_ID_OFFSET + y_parity as u8;
        Self(FixedBytes(bytes))
    }

    /// Parse a signature from a byte slice, which must be exactly 65 bytes long
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SerdeError> {
        let bytes: [u8; NUM_BYTES_SIGNATURE] =
            bytes.try_into().map_err(|_| SerdeError::InvalidLength)?;
        Ok(Self(FixedBytes(bytes)))
    }

    /// The raw bytes of the signature
    pub fn as_bytes(&self) -> &[u8; NUM_BYTES_SIGNATURE] {
        &self.0 .0
    }

    /// The `r` scalar of the signature
    pub fn r(&self) -> U256 {
        U256::from_be_slice(&self.0[..NUM_BYTES_SIGNATURE_SCALAR])
    }

    /// The `s` scalar of the signature
    pub fn s(&self) -> U256 {
        U256::from_be_slice(&self.0[NUM_BYTES_SIGNATURE_SCALAR..2 * NUM_BYTES_SIGNATURE_SCALAR])
    }

    /// The recovery identifier byte, exactly as it appears on the wire
    pub fn v(&self) -> u8 {
        self.0[NUM_BYTES_SIGNATURE - 1]
    }

    /// The recovery identifier normalized to 0 or 1.
    ///
    /// Both the legacy (27 / 28) and the raw (0 / 1) forms are accepted,
    /// anything else has no meaningful recovery identifier.
    pub fn recovery_id(&self) -> Option<u8> {
        match self.v() {
            0 | 27 => Some(0),
            1 | 28 => Some(1),
            _ => None,
        }
    }

    /// Whether the signature is well-formed: nonzero `r`, nonzero low-half `s`,
    /// and a recognized recovery identifier
    pub fn is_well_formed(&self) -> bool {
        let s = self.s();
        !self.r().is_zero()
            && !s.is_zero()
            && s <= SECP256K1_HALF_ORDER
            && self.recovery_id().is_some()
    }

    /// The signature bytes with the recovery identifier normalized to 0 or 1,
    /// as expected by an [`EcRecoverBackend`](crate::backends::EcRecoverBackend)
    pub fn normalized_bytes(&self) -> Option<[u8; NUM_BYTES_SIGNATURE]> {
        let mut bytes = *self.as_bytes();
        bytes[NUM_BYTES_SIGNATURE - 1] = self.recovery_id()?;
        Some(bytes)
    }
}

impl fmt::Display for RewardSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RewardSignature {
    type Err = SerdeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FixedBytes::<NUM_BYTES_SIGNATURE>::from_str(s)
            .map(Self)
            .map_err(|_| SerdeError::InvalidHex)
    }
}

/// A claim together with the trusted signer's authorization of it,
/// as handed from the signing authority to the claimant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedClaim {
    /// The claim being authorized
    pub claim: Claim,
    /// The trusted signer's signature over the claim digest
    pub signature: RewardSignature,
}
