//! Off-chain pre-checks of signed claims before they are submitted on chain.
//!
//! Signature checks run without holding the ledger lock; only the ledger steps
//! of verification are serialized.

use contracts_common::types::SignedClaim;
use contracts_core::verifier::{errors::VerifierError, ClaimVerifier};
use tracing::{info, warn};

use crate::{
    constants::SECURITY_LOG_TARGET,
    crypto::{NativeEcRecoverBackend, NativeHasher},
    errors::AuthorizationError,
    ledger::SharedClaimLedger,
};

/// The claim verifier running on native backends
pub type NativeClaimVerifier = ClaimVerifier<NativeHasher, NativeEcRecoverBackend>;

/// Authorizes signed claims against a trusted signer & a shared ledger
#[derive(Debug)]
pub struct ClaimAuthorizer {
    /// The verifier bound to the deployment & trusted signer
    verifier: NativeClaimVerifier,
    /// The consumed nonces
    ledger: SharedClaimLedger,
}

impl ClaimAuthorizer {
    /// Construct an authorizer
    pub fn new(verifier: NativeClaimVerifier, ledger: SharedClaimLedger) -> Self {
        Self { verifier, ledger }
    }

    /// The underlying verifier
    pub fn verifier(&self) -> &NativeClaimVerifier {
        &self.verifier
    }

    /// The underlying verifier, e.g. to rotate the trusted signer
    pub fn verifier_mut(&mut self) -> &mut NativeClaimVerifier {
        &mut self.verifier
    }

    /// The underlying ledger
    pub fn ledger(&self) -> &SharedClaimLedger {
        &self.ledger
    }

    /// Check that the claim would be accepted, without consuming its nonce
    pub fn check(&self, signed: &SignedClaim) -> Result<(), AuthorizationError> {
        self.authenticate(signed)?;
        self.ledger.check(&signed.claim).inspect_err(log_rejection)
    }

    /// Accept the claim, consuming its nonce.
    ///
    /// Of any number of concurrent calls with the same account & nonce, at most one succeeds.
    pub fn authorize(&self, signed: &SignedClaim) -> Result<(), AuthorizationError> {
        self.authenticate(signed)?;
        self.ledger
            .redeem(&signed.claim)
            .inspect_err(log_rejection)?;

        info!(
            "Authorized claim of {} for account {} with nonce {}",
            signed.claim.amount, signed.claim.account, signed.claim.nonce
        );
        Ok(())
    }

    /// Check the claim's signature against the trusted signer
    fn authenticate(&self, signed: &SignedClaim) -> Result<(), AuthorizationError> {
        let res = self
            .verifier
            .authenticate(&signed.claim, &signed.signature)
            .map_err(AuthorizationError::from);

        res.inspect_err(|e| match e {
            AuthorizationError::Rejected(rejection) if rejection.is_security_event() => {
                warn!(
                    target: SECURITY_LOG_TARGET,
                    "Rejected claim of {} for account {} with nonce {}: {} (trusted: {})",
                    signed.claim.amount,
                    signed.claim.account,
                    signed.claim.nonce,
                    rejection,
                    self.verifier.trusted_signer()
                );
            }
            _ => log_rejection(e),
        })
    }
}

/// Log a rejection which is not a security event
fn log_rejection(err: &AuthorizationError) {
    match err {
        AuthorizationError::Rejected(VerifierError::NonceReplayed) => {
            info!("Claim already redeemed: {err}")
        }
        AuthorizationError::Ledger(_) => warn!("Claim not recorded: {err}"),
        _ => info!("{err}"),
    }
}
