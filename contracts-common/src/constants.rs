//! Constants that parameterize the reward authorization protocol

use alloy_primitives::{uint, U256};

/// The number of bytes in a hash digest
pub const HASH_OUTPUT_SIZE: usize = 32;

/// The number of bytes it takes to represent an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The number of bytes it takes to represent an unsigned 256-bit integer
pub const NUM_BYTES_U256: usize = 32;

/// The number of bytes in a single ABI word
pub const NUM_BYTES_WORD: usize = 32;

/// The number of ABI words in the canonical encoding of a claim:
/// the account, the amount, the nonce, and the verifying contract
pub const NUM_CLAIM_WORDS: usize = 4;

/// The number of bytes in the canonical encoding of a claim
pub const NUM_BYTES_CLAIM: usize = NUM_CLAIM_WORDS * NUM_BYTES_WORD;

/// The number of bytes it takes to represent a secp256k1 ECDSA signature
/// as expected by the Ethereum `ecRecover` precompile.
///
/// Concretely, this is the concatenation of the `r` and `s` values of the signature,
/// and `v`, a 1-byte recovery identifier
pub const NUM_BYTES_SIGNATURE: usize = 65;

/// The number of bytes in each of the `r` and `s` signature scalars
pub const NUM_BYTES_SIGNATURE_SCALAR: usize = 32;

/// The offset added to the recovery identifier in legacy Ethereum signatures
pub const LEGACY_RECOVERY_ID_OFFSET: u8 = 27;

/// The EIP-191 "personal message" preamble for a 32-byte payload.
///
/// The trailing `32` is the decimal byte length of the signed digest.
pub const SIGNED_DIGEST_PREAMBLE: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Half of the secp256k1 group order. Signatures with `s` above this value
/// are malleated copies of a low-`s` signature and are rejected (EIP-2).
pub const SECP256K1_HALF_ORDER: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);
