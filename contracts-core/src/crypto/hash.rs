//! Digest computation for reward claims.
//!
//! A claim is bound to a single 32-byte digest, which the trusted signer signs
//! only after applying the Ethereum signed message prefix transform.

use alloc::vec::Vec;
use alloy_primitives::B256;
use contracts_common::{
    backends::HashBackend,
    constants::{HASH_OUTPUT_SIZE, SIGNED_DIGEST_PREAMBLE},
    custom_serde::BytesSerializable,
    types::Claim,
};

/// Computes the digest of a claim, i.e. the Keccak-256 hash of its
/// fixed-width encoding `abi.encode(account, amount, nonce, contract)`
pub fn build_digest<H: HashBackend>(claim: &Claim) -> B256 {
    B256::from(H::hash(&claim.serialize_to_bytes()))
}

/// Applies the signed message prefix transform to a digest:
/// `keccak256("\x19Ethereum Signed Message:\n32" || digest)`.
///
/// This is the hash which is actually signed, so that a claim signature can never
/// be reinterpreted as a signature over a raw 32-byte payload.
pub fn prefixed_digest<H: HashBackend>(digest: &B256) -> B256 {
    let mut message = Vec::with_capacity(SIGNED_DIGEST_PREAMBLE.len() + HASH_OUTPUT_SIZE);
    message.extend_from_slice(SIGNED_DIGEST_PREAMBLE);
    message.extend_from_slice(digest.as_slice());
    B256::from(H::hash(&message))
}

/// Computes the prefixed digest of a claim, i.e. the hash a claim signature is made over
pub fn signing_hash<H: HashBackend>(claim: &Claim) -> B256 {
    prefixed_digest::<H>(&build_digest::<H>(claim))
}
