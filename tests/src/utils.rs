use std::sync::Once;

use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::{address, Address, U256};
use contracts_common::types::{Claim, SignedClaim};
use contracts_utils::crypto::{hash_and_sign_claim, random_nonce};
use eyre::Result;
use rand::{CryptoRng, Rng, RngCore};
use tracing_subscriber::{fmt, EnvFilter};

// ---------------------
// | META TEST HELPERS |
// ---------------------

/// The number of random rounds to run in fuzz tests
pub const FUZZ_ROUNDS: usize = 32;

/// The address of the verifying contract used across tests
pub const TEST_CONTRACT: Address = address!("5F8f86B8D0Fa93cdaE20936d150175dF0205fB38");

/// The account used in fixed-input tests
pub const TEST_ACCOUNT: Address = address!("cc1190e025b6b94e8827e9a4b51b61ee13c2ba93");

static TRACING_INIT: Once = Once::new();

/// Installs a log subscriber, once per test binary
pub fn global_setup() {
    TRACING_INIT.call_once(|| {
        fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

// ----------------
// | MISC HELPERS |
// ----------------

/// A uniformly random address
pub fn random_address<R: Rng>(rng: &mut R) -> Address {
    Address::from(rng.gen::<[u8; 20]>())
}

/// A random claim against [`TEST_CONTRACT`] with a nonzero amount
pub fn random_claim<R: CryptoRng + RngCore>(rng: &mut R) -> Claim {
    Claim {
        account: random_address(rng),
        amount: U256::from(rng.gen_range(1..u64::MAX)),
        nonce: random_nonce(rng),
        contract: TEST_CONTRACT,
    }
}

/// Signs the claim with the given key, bundling the two
pub fn sign_claim(key: &PrivateKeySigner, claim: Claim) -> Result<SignedClaim> {
    let signature = hash_and_sign_claim(key, &claim)?;
    Ok(SignedClaim { claim, signature })
}
