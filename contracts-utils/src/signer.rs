//! The authorization signer: the only component that holds the trusted signer's key.
//!
//! Key material sits behind a [`DigestSigner`], which may be a local key, a hardware
//! wallet or a remote signing service. Callers only ever see the signer's address and
//! the signatures it produces.

use std::{fmt, future::Future, str::FromStr, time::Duration};

use alloy::signers::{local::PrivateKeySigner, Signer};
use alloy_primitives::{Address, B256};
use contracts_common::types::{Claim, RewardSignature, SignedClaim};
use contracts_core::crypto::hash::{build_digest, prefixed_digest};
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::{
    constants::{
        DEFAULT_SIGNING_ATTEMPTS, DEFAULT_SIGNING_BACKOFF_MS, DEFAULT_SIGNING_MAX_BACKOFF_MS,
        DEFAULT_SIGNING_TIMEOUT_MS,
    },
    crypto::{to_reward_signature, NativeHasher},
    errors::SigningError,
};

/// Something that can sign a 32-byte hash without revealing its key
pub trait DigestSigner: Send + Sync {
    /// The address corresponding to the signing key
    fn address(&self) -> Address;

    /// Sign the hash as-is, with no further transformation
    fn sign_hash(
        &self,
        hash: &B256,
    ) -> impl Future<Output = Result<RewardSignature, SigningError>> + Send;
}

/// Adapts any `alloy` signer (local key, Ledger, KMS, ...) into a [`DigestSigner`]
pub struct AlloyDigestSigner<S>(S);

impl<S: Signer + Send + Sync> AlloyDigestSigner<S> {
    /// Wrap the given signer
    pub fn new(signer: S) -> Self {
        Self(signer)
    }
}

impl<S: Signer + Send + Sync> DigestSigner for AlloyDigestSigner<S> {
    fn address(&self) -> Address {
        self.0.address()
    }

    async fn sign_hash(&self, hash: &B256) -> Result<RewardSignature, SigningError> {
        let sig = self
            .0
            .sign_hash(hash)
            .await
            .map_err(|e| SigningError::Unavailable(e.to_string()))?;
        Ok(to_reward_signature(&sig))
    }
}

/// Tuning for signing attempts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignerConfig {
    /// How long to wait on a single signing attempt
    pub timeout: Duration,
    /// How many attempts to make before surfacing the error
    pub max_attempts: u32,
    /// The delay before the first retry, doubled on every subsequent retry
    pub base_backoff: Duration,
    /// The upper bound on the delay between retries
    pub max_backoff: Duration,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_SIGNING_TIMEOUT_MS),
            max_attempts: DEFAULT_SIGNING_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_SIGNING_BACKOFF_MS),
            max_backoff: Duration::from_millis(DEFAULT_SIGNING_MAX_BACKOFF_MS),
        }
    }
}

impl SignerConfig {
    /// The delay following the given one, doubled and capped at `max_backoff`
    fn next_backoff(&self, backoff: Duration) -> Duration {
        backoff
            .checked_mul(2)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

/// Signs claims on behalf of the trusted signer
pub struct AuthorizationSigner<S: DigestSigner> {
    /// The key holder
    inner: S,
    /// Timeout & retry tuning
    config: SignerConfig,
}

impl AuthorizationSigner<AlloyDigestSigner<PrivateKeySigner>> {
    /// Construct a signer from a hex-encoded private key held in process memory
    pub fn from_private_key(priv_key: &str, config: SignerConfig) -> Result<Self, SigningError> {
        let key = PrivateKeySigner::from_str(priv_key)
            .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
        Ok(Self::new(AlloyDigestSigner::new(key), config))
    }
}

impl<S: DigestSigner> AuthorizationSigner<S> {
    /// Construct a signer over the given key holder
    pub fn new(inner: S, config: SignerConfig) -> Self {
        Self { inner, config }
    }

    /// The address of the trusted signer
    pub fn address(&self) -> Address {
        self.inner.address()
    }

    /// Sign a claim digest.
    ///
    /// The digest goes through the signed message prefix transform before it is signed.
    /// Unavailable key material is retried with exponential backoff up to the configured
    /// number of attempts, after which the last error is returned.
    pub async fn sign(&self, digest: &B256) -> Result<RewardSignature, SigningError> {
        let hash = prefixed_digest::<NativeHasher>(digest);

        let mut backoff = self.config.base_backoff.min(self.config.max_backoff);
        let mut attempt = 1;
        loop {
            let res = match timeout(self.config.timeout, self.inner.sign_hash(&hash)).await {
                Ok(res) => res,
                Err(_) => Err(SigningError::Unavailable(format!(
                    "no signature after {:?}",
                    self.config.timeout
                ))),
            };

            match res {
                Ok(signature) => return Ok(signature),
                Err(e) if e.is_transient() && attempt < self.config.max_attempts => {
                    warn!(
                        "Signing attempt {attempt}/{} failed: {e}, retrying in {backoff:?}",
                        self.config.max_attempts
                    );
                    sleep(backoff).await;
                    backoff = self.config.next_backoff(backoff);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Sign a claim, bundling it with its signature for hand-off to the claimant
    pub async fn sign_claim(&self, claim: Claim) -> Result<SignedClaim, SigningError> {
        let digest = build_digest::<NativeHasher>(&claim);
        let signature = self.sign(&digest).await?;

        debug!(
            "Signed claim of {} for account {} with nonce {}",
            claim.amount, claim.account, claim.nonce
        );
        Ok(SignedClaim { claim, signature })
    }
}

impl<S: DigestSigner> fmt::Debug for AuthorizationSigner<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationSigner")
            .field("address", &self.address())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
