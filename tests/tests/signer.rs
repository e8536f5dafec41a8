use alloy::signers::local::PrivateKeySigner;
use contracts_core::ledger::MemoryClaimLedger;
use contracts_utils::{
    authorizer::ClaimAuthorizer,
    ledger::SharedClaimLedger,
    signer::{AlloyDigestSigner, AuthorizationSigner, SignerConfig},
};
use eyre::Result;
use rand::thread_rng;
use tests::{
    utils::{global_setup, random_claim, FUZZ_ROUNDS},
    verifier::utils::{native_verify, setup_verifier},
};

#[tokio::test]
async fn test_signed_claims_authorized_fuzz() -> Result<()> {
    global_setup();
    let mut rng = thread_rng();
    let key = PrivateKeySigner::random();
    let authorizer = ClaimAuthorizer::new(setup_verifier(&key)?, SharedClaimLedger::in_memory());
    let signer = AuthorizationSigner::new(AlloyDigestSigner::new(key), SignerConfig::default());

    for _ in 0..FUZZ_ROUNDS {
        let signed = signer.sign_claim(random_claim(&mut rng)).await?;
        authorizer.authorize(&signed)?;
    }

    Ok(())
}

#[tokio::test]
async fn test_from_private_key() -> Result<()> {
    let key = PrivateKeySigner::random();
    let priv_key = key.to_bytes().to_string();

    let signer = AuthorizationSigner::from_private_key(&priv_key, SignerConfig::default())?;
    assert_eq!(signer.address(), key.address());

    let signed = signer.sign_claim(random_claim(&mut thread_rng())).await?;
    let mut ledger = MemoryClaimLedger::new();
    assert_eq!(native_verify(&signed, key.address(), &mut ledger), Ok(()));
    Ok(())
}

#[tokio::test]
async fn test_signer_is_not_trusted_by_default() -> Result<()> {
    let trusted = PrivateKeySigner::random();
    let authorizer =
        ClaimAuthorizer::new(setup_verifier(&trusted)?, SharedClaimLedger::in_memory());
    let signer = AuthorizationSigner::new(
        AlloyDigestSigner::new(PrivateKeySigner::random()),
        SignerConfig::default(),
    );

    let signed = signer.sign_claim(random_claim(&mut thread_rng())).await?;
    assert!(authorizer.authorize(&signed).is_err());
    Ok(())
}
