//! The claim verifier.
//!
//! A claim is accepted only if all of the following hold:
//! 1. The claim digest is recomputed from its fixed-width encoding
//! 2. The signed message prefix transform is applied to the digest
//! 3. A signer can be recovered from the prefixed digest & signature
//! 4. The recovered signer is the trusted signer
//! 5. The claim's nonce has not been consumed for its account
//! 6. The claim's amount is nonzero
//!
//! after which (step 7) the nonce is consumed in the ledger. Each step is a separate helper below.
//! Nothing is written to the ledger unless every check passes.

pub mod errors;

use alloy_primitives::{Address, B256};
use contracts_common::{
    backends::{EcRecoverBackend, HashBackend},
    types::{Claim, RewardSignature},
};
use core::marker::PhantomData;

use crate::{
    crypto::{
        ecdsa::recover_signer,
        hash::{build_digest, prefixed_digest},
    },
    ledger::ClaimLedger,
};

use self::errors::VerifierError;

/// Verify a claim against the trusted signer, consuming its nonce in the ledger on success
pub fn verify_claim<H: HashBackend, E: EcRecoverBackend, L: ClaimLedger>(
    claim: &Claim,
    signature: &RewardSignature,
    trusted_signer: Address,
    ledger: &mut L,
) -> Result<(), VerifierError> {
    authenticate_claim::<H, E>(claim, signature, trusted_signer)?;
    consume_claim(claim, ledger)
}

/// Steps 1 through 4: check that the trusted signer signed the claim.
///
/// This does not touch the ledger, so it may run outside of any lock.
pub fn authenticate_claim<H: HashBackend, E: EcRecoverBackend>(
    claim: &Claim,
    signature: &RewardSignature,
    trusted_signer: Address,
) -> Result<(), VerifierError> {
    let digest = step_1::<H>(claim);
    let hash = step_2::<H>(&digest);
    let recovered = step_3::<E>(&hash, signature)?;
    step_4(recovered, trusted_signer)
}

/// Steps 5 through 7: check that the claim is redeemable and consume its nonce.
///
/// The caller must hold exclusive access to the ledger for the duration of this call.
pub fn consume_claim<L: ClaimLedger>(claim: &Claim, ledger: &mut L) -> Result<(), VerifierError> {
    step_5(claim, ledger)?;
    step_6(claim)?;
    step_7(claim, ledger);
    Ok(())
}

// ---------
// | STEPS |
// ---------

/// Recompute the claim digest
fn step_1<H: HashBackend>(claim: &Claim) -> B256 {
    build_digest::<H>(claim)
}

/// Apply the signed message prefix transform
fn step_2<H: HashBackend>(digest: &B256) -> B256 {
    prefixed_digest::<H>(digest)
}

/// Recover the signer, rejecting structurally invalid signatures
fn step_3<E: EcRecoverBackend>(
    hash: &B256,
    signature: &RewardSignature,
) -> Result<Address, VerifierError> {
    Ok(recover_signer::<E>(hash, signature)?)
}

/// Compare the recovered signer to the trusted signer
fn step_4(recovered: Address, trusted_signer: Address) -> Result<(), VerifierError> {
    if recovered != trusted_signer {
        return Err(VerifierError::SignerMismatch { recovered });
    }

    Ok(())
}

/// Reject replayed nonces
fn step_5<L: ClaimLedger>(claim: &Claim, ledger: &L) -> Result<(), VerifierError> {
    if ledger.contains(claim.account, claim.nonce) {
        return Err(VerifierError::NonceReplayed);
    }

    Ok(())
}

/// Reject zero amounts
fn step_6(claim: &Claim) -> Result<(), VerifierError> {
    if claim.amount.is_zero() {
        return Err(VerifierError::AmountInvalid);
    }

    Ok(())
}

/// Consume the nonce
fn step_7<L: ClaimLedger>(claim: &Claim, ledger: &mut L) {
    ledger.insert(claim.account, claim.nonce);
}

// ------------
// | VERIFIER |
// ------------

/// A claim verifier bound to a single contract deployment & trusted signer,
/// defined generically over hashing and signer recovery backends
#[derive(Debug)]
pub struct ClaimVerifier<H: HashBackend, E: EcRecoverBackend> {
    /// The only address allowed to rotate the trusted signer
    owner: Address,
    /// The address whose signatures are accepted
    trusted_signer: Address,
    /// The contract deployment that claims are bound to
    contract: Address,
    /// Marker for the hashing & recovery backends
    _phantom: PhantomData<(H, E)>,
}

impl<H: HashBackend, E: EcRecoverBackend> ClaimVerifier<H, E> {
    /// Construct a verifier for the given contract
    pub fn new(
        owner: Address,
        trusted_signer: Address,
        contract: Address,
    ) -> Result<Self, VerifierError> {
        if trusted_signer == Address::ZERO {
            return Err(VerifierError::InvalidSigner);
        }

        Ok(Self {
            owner,
            trusted_signer,
            contract,
            _phantom: PhantomData,
        })
    }

    /// The owner of the verifier
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The currently trusted signer
    pub fn trusted_signer(&self) -> Address {
        self.trusted_signer
    }

    /// The contract deployment claims are bound to
    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Replace the trusted signer. Only the owner may do so.
    ///
    /// Signatures from the previous signer are rejected from this point on,
    /// nonces they consumed stay consumed.
    pub fn rotate_trusted_signer(
        &mut self,
        caller: Address,
        new_signer: Address,
    ) -> Result<(), VerifierError> {
        if caller != self.owner {
            return Err(VerifierError::Unauthorized);
        }
        if new_signer == Address::ZERO {
            return Err(VerifierError::InvalidSigner);
        }

        self.trusted_signer = new_signer;
        Ok(())
    }

    /// Check the claim's signature against the trusted signer, without touching any ledger
    pub fn authenticate(
        &self,
        claim: &Claim,
        signature: &RewardSignature,
    ) -> Result<(), VerifierError> {
        authenticate_claim::<H, E>(claim, signature, self.trusted_signer)?;
        self.check_contract(claim)
    }

    /// Verify the claim, consuming its nonce in the ledger on success
    pub fn verify<L: ClaimLedger>(
        &self,
        claim: &Claim,
        signature: &RewardSignature,
        ledger: &mut L,
    ) -> Result<(), VerifierError> {
        self.authenticate(claim, signature)?;
        consume_claim(claim, ledger)
    }

    /// Reject claims addressed to another deployment.
    ///
    /// Runs after signer recovery, so a claim whose contract bytes were altered
    /// after signing is reported as a signer mismatch.
    fn check_contract(&self, claim: &Claim) -> Result<(), VerifierError> {
        if claim.contract != self.contract {
            return Err(VerifierError::ContractMismatch {
                presented: claim.contract,
            });
        }

        Ok(())
    }
}
