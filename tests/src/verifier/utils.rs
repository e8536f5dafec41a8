use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::{address, Address};
use contracts_common::types::SignedClaim;
use contracts_core::{
    ledger::ClaimLedger,
    verifier::{errors::VerifierError, verify_claim},
};
use contracts_utils::{
    authorizer::NativeClaimVerifier,
    crypto::{NativeEcRecoverBackend, NativeHasher},
};
use eyre::{eyre, Result};

use crate::utils::TEST_CONTRACT;

/// The owner of the verifiers set up in tests
pub const TEST_OWNER: Address = address!("0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e0e");

/// A verifier for [`TEST_CONTRACT`] trusting the given key
pub fn setup_verifier(trusted: &PrivateKeySigner) -> Result<NativeClaimVerifier> {
    NativeClaimVerifier::new(TEST_OWNER, trusted.address(), TEST_CONTRACT)
        .map_err(|e| eyre!("{e}"))
}

/// Runs the native verifier over a signed claim
pub fn native_verify<L: ClaimLedger>(
    signed: &SignedClaim,
    trusted_signer: Address,
    ledger: &mut L,
) -> Result<(), VerifierError> {
    verify_claim::<NativeHasher, NativeEcRecoverBackend, L>(
        &signed.claim,
        &signed.signature,
        trusted_signer,
        ledger,
    )
}
