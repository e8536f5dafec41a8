//! Helpful cryptographic utilities

use alloy::signers::{local::PrivateKeySigner, Error as SignerError, SignerSync};
use alloy_primitives::{keccak256, PrimitiveSignature, B256, U256};
use contracts_common::{
    backends::{EcRecoverBackend, EcdsaError, HashBackend},
    constants::{HASH_OUTPUT_SIZE, NUM_BYTES_ADDRESS, NUM_BYTES_SIGNATURE, NUM_BYTES_U256},
    types::{Claim, RewardSignature},
};
use contracts_core::crypto::hash::signing_hash;
use rand::{CryptoRng, RngCore};

/// A hashing backend that runs natively, i.e.
/// without using a VM-accelerated Keccak implementation
#[derive(Debug)]
pub struct NativeHasher;

impl HashBackend for NativeHasher {
    fn hash(input: &[u8]) -> [u8; HASH_OUTPUT_SIZE] {
        keccak256(input).0
    }
}

/// A signer recovery backend that runs natively using `k256`,
/// in place of the `ecRecover` precompile
#[derive(Debug)]
pub struct NativeEcRecoverBackend;

impl EcRecoverBackend for NativeEcRecoverBackend {
    /// Expects the following format for the signature:
    /// ```text
    /// signature[0..32] = r (big-endian)
    /// signature[32..64] = s (big-endian)
    /// signature[64] = v (0 or 1)
    /// ```
    fn ec_recover(
        message_hash: &[u8; HASH_OUTPUT_SIZE],
        signature: &[u8; NUM_BYTES_SIGNATURE],
    ) -> Result<[u8; NUM_BYTES_ADDRESS], EcdsaError> {
        let parity = match signature[NUM_BYTES_SIGNATURE - 1] {
            0 => false,
            1 => true,
            _ => return Err(EcdsaError),
        };

        let sig =
            PrimitiveSignature::from_bytes_and_parity(&signature[..NUM_BYTES_SIGNATURE - 1], parity);
        let address = sig
            .recover_address_from_prehash(&B256::from(*message_hash))
            .map_err(|_| EcdsaError)?;

        Ok(address.0 .0)
    }
}

/// Draws a random 32-byte nonce
pub fn random_nonce<R: CryptoRng + RngCore>(rng: &mut R) -> U256 {
    let mut bytes = [0_u8; NUM_BYTES_U256];
    rng.fill_bytes(&mut bytes);
    U256::from_be_bytes(bytes)
}

/// Hashes the claim, applies the signed message prefix transform, and signs the
/// result with a local key, as the trusted signer would
pub fn hash_and_sign_claim(
    signing_key: &PrivateKeySigner,
    claim: &Claim,
) -> Result<RewardSignature, SignerError> {
    let hash = signing_hash::<NativeHasher>(claim);
    let sig = signing_key.sign_hash_sync(&hash)?;
    Ok(to_reward_signature(&sig))
}

/// Converts a signature produced by an `alloy` signer into its 65-byte wire form
pub fn to_reward_signature(sig: &PrimitiveSignature) -> RewardSignature {
    RewardSignature::from_parts(sig.r(), sig.s(), sig.v())
}
