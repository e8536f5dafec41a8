//! Hashing & signer recovery, which run on the `keccak256` opcode and the
//! `ecRecover` precompile inside the contract, and natively off-chain.

use crate::constants::{HASH_OUTPUT_SIZE, NUM_BYTES_ADDRESS, NUM_BYTES_SIGNATURE};

/// A hashing backend for muxing between VM-accelerated hashing
/// and native Rust hashing
pub trait HashBackend {
    /// Compute the Keccak-256 hash of the input
    fn hash(input: &[u8]) -> [u8; HASH_OUTPUT_SIZE];
}

/// An error that occurs during ECDSA public key recovery
#[derive(Debug)]
pub struct EcdsaError;

/// A backend for recovering an Ethereum address from a
/// secp256k1 ECDSA signature.
///
/// The type that implements this trait should be a unit struct that either calls out to the
/// `ecRecover` precompile, or calls out to a Rust implementation off-chain.
pub trait EcRecoverBackend {
    /// Recovers an Ethereum address from a signature and a message hash.
    ///
    /// The recovery identifier in the last byte of the signature is expected
    /// to already be normalized to 0 or 1.
    fn ec_recover(
        message_hash: &[u8; HASH_OUTPUT_SIZE],
        signature: &[u8; NUM_BYTES_SIGNATURE],
    ) -> Result<[u8; NUM_BYTES_ADDRESS], EcdsaError>;
}
