//! Helpers for ECDSA verification of claim signatures using our own types & traits

use alloy_primitives::{Address, B256};
use contracts_common::{
    backends::{EcRecoverBackend, EcdsaError, HashBackend},
    types::{Claim, RewardSignature},
};

use super::hash::signing_hash;

/// Recovers the address which produced `signature` over the (already prefixed) `hash`.
///
/// Signatures which are not well-formed are rejected before reaching the recovery
/// backend: zero scalars, a high `s` value, or an unknown recovery identifier.
pub fn recover_signer<E: EcRecoverBackend>(
    hash: &B256,
    signature: &RewardSignature,
) -> Result<Address, EcdsaError> {
    if !signature.is_well_formed() {
        return Err(EcdsaError);
    }

    let sig_bytes = signature.normalized_bytes().ok_or(EcdsaError)?;
    let address = E::ec_recover(&hash.0, &sig_bytes)?;

    // The precompile returns the zero address on failure rather than reverting
    if address == [0_u8; 20] {
        return Err(EcdsaError);
    }

    Ok(Address::from(address))
}

/// Verifies that `signature` is the signature of `signer` over the given claim
pub fn ecdsa_verify<H: HashBackend, E: EcRecoverBackend>(
    signer: Address,
    claim: &Claim,
    signature: &RewardSignature,
) -> Result<bool, EcdsaError> {
    let hash = signing_hash::<H>(claim);
    Ok(recover_signer::<E>(&hash, signature)? == signer)
}
