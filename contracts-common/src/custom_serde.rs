//! Custom serialization logic used to encode objects into fixed-width byte arrays
//! for hashing & for use in EVM precompiles.
//!
//! Every value is encoded as one or more 32-byte big-endian ABI words, so that the
//! encoding of a composite type is a plain concatenation which can never be
//! re-segmented into a different sequence of fields.

use alloc::vec::Vec;
use alloy_primitives::{Address, U256};
use core::fmt;

use crate::{
    constants::{NUM_BYTES_ADDRESS, NUM_BYTES_CLAIM, NUM_BYTES_WORD},
    types::Claim,
};

/// An error that occurs during de/serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerdeError {
    /// A sequence of bytes is not the expected length
    InvalidLength,
    /// A string is not valid hex
    InvalidHex,
}

impl fmt::Display for SerdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerdeError::InvalidLength => write!(f, "invalid length"),
            SerdeError::InvalidHex => write!(f, "invalid hex"),
        }
    }
}

// -------------------------------
// | BYTE SERDE TRAIT DEFINITION |
// -------------------------------

/// A trait for serializing types into byte arrays,
/// for hashing or for use in precompiles
pub trait BytesSerializable {
    /// The number of bytes the serialized type occupies
    const SER_LEN: usize;

    /// Serializes a type into a vector of bytes
    fn serialize_to_bytes(&self) -> Vec<u8>;
}

// -------------------------
// | TRAIT IMPLEMENTATIONS |
// -------------------------

impl BytesSerializable for Address {
    const SER_LEN: usize = NUM_BYTES_WORD;

    /// Left-pads the address to a full word, matching Solidity's `abi.encode`
    fn serialize_to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(NUM_BYTES_WORD);
        bytes.extend_from_slice(&[0_u8; NUM_BYTES_WORD - NUM_BYTES_ADDRESS]);
        bytes.extend_from_slice(self.as_slice());
        bytes
    }
}

impl BytesSerializable for U256 {
    const SER_LEN: usize = NUM_BYTES_WORD;

    fn serialize_to_bytes(&self) -> Vec<u8> {
        self.to_be_bytes::<NUM_BYTES_WORD>().to_vec()
    }
}

impl BytesSerializable for Claim {
    const SER_LEN: usize = NUM_BYTES_CLAIM;

    /// Serializes the claim as `abi.encode(account, amount, nonce, contract)`
    fn serialize_to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SER_LEN);
        bytes.extend(self.account.serialize_to_bytes());
        bytes.extend(self.amount.serialize_to_bytes());
        bytes.extend(self.nonce.serialize_to_bytes());
        bytes.extend(self.contract.serialize_to_bytes());
        bytes
    }
}
