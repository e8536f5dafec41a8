//! Implementations of the various deploy scripts

use std::{path::Path, time::Duration};

use alloy::{primitives::Address, providers::DynProvider};
use contracts_common::types::Claim;
use contracts_utils::{
    authorizer::{ClaimAuthorizer, NativeClaimVerifier},
    crypto::random_nonce,
    errors::{AuthorizationError, SigningError},
    ledger::SharedClaimLedger,
    signer::{AuthorizationSigner, SignerConfig},
};
use rand::thread_rng;
use tracing::info;

use crate::{
    cli::{BootstrapArgs, ClaimArgs, DeployArgs, GrantRewardArgs, SignClaimArgs},
    contract::Cycle2earnHandle,
    errors::ScriptError,
    types::Deployment,
    utils::{
        read_artifact, read_deployment, read_signed_claim, write_deployment, write_signed_claim,
    },
};

/// Deploy the Cycle2earn contract and record the deployment
pub async fn deploy(
    args: DeployArgs,
    client: DynProvider,
    receipt_timeout: Duration,
    deployer: Address,
    deployments_path: &Path,
) -> Result<Cycle2earnHandle, ScriptError> {
    let artifact = read_artifact(&args.artifact)?;
    let params = args.constructor.into();

    let (handle, deployment) = Cycle2earnHandle::deploy(client, receipt_timeout, deployer, &artifact, params).await?;
    write_deployment(deployments_path, &deployment)?;

    info!(
        "Recorded deployment at {:#x} in {}",
        deployment.address,
        deployments_path.display()
    );
    Ok(handle)
}

/// Deploy the Cycle2earn contract, then grant the initial reward through the
/// handle returned by the deployment
pub async fn bootstrap(
    args: BootstrapArgs,
    client: DynProvider,
    receipt_timeout: Duration,
    deployer: Address,
    deployments_path: &Path,
) -> Result<(), ScriptError> {
    let handle = deploy(args.deploy, client, receipt_timeout, deployer, deployments_path).await?;

    let account = args.account.unwrap_or(deployer);
    handle.grant_reward(account, args.amount).await?;
    Ok(())
}

/// Grant a reward through the recorded deployment
pub async fn grant_reward(
    args: GrantRewardArgs,
    client: DynProvider,
    receipt_timeout: Duration,
    deployments_path: &Path,
) -> Result<(), ScriptError> {
    let deployment = read_deployment(deployments_path)?;
    let handle = Cycle2earnHandle::from_deployment(&deployment, client, receipt_timeout);

    handle.grant_reward(args.account, args.amount).await?;
    Ok(())
}

/// Sign a claim against the recorded deployment
pub async fn sign_claim(
    args: SignClaimArgs,
    priv_key: &str,
    deployments_path: &Path,
) -> Result<(), ScriptError> {
    let deployment = read_deployment(deployments_path)?;
    let signer = AuthorizationSigner::from_private_key(priv_key, SignerConfig::default())?;

    // The contract would reject anything signed by another key
    if signer.address() != deployment.params.trusted_signer {
        return Err(SigningError::InvalidKey(format!(
            "{:#x} is not the trusted signer {:#x}",
            signer.address(),
            deployment.params.trusted_signer
        ))
        .into());
    }

    let claim = Claim {
        account: args.account,
        amount: args.amount,
        nonce: args.nonce.unwrap_or_else(|| random_nonce(&mut thread_rng())),
        contract: deployment.address,
    };
    let signed = signer.sign_claim(claim).await?;

    write_signed_claim(&signed, args.output.as_deref())?;
    info!(
        "Signed claim of {} for {:#x} with nonce {}",
        claim.amount, claim.account, claim.nonce
    );
    Ok(())
}

/// Check a signed claim without submitting it or consuming its nonce
pub fn verify_claim(
    args: ClaimArgs,
    deployments_path: &Path,
    ledger_path: &Path,
) -> Result<(), ScriptError> {
    let deployment = read_deployment(deployments_path)?;
    let signed = read_signed_claim(&args.claim)?;

    let authorizer = setup_authorizer(&deployment, ledger_path)?;
    authorizer.check(&signed)?;

    info!(
        "Claim of {} for {:#x} with nonce {} is redeemable",
        signed.claim.amount, signed.claim.account, signed.claim.nonce
    );
    Ok(())
}

/// Check a signed claim, redeem it on chain, and record its nonce as consumed.
///
/// The nonce is only recorded once the redemption is confirmed on chain.
pub async fn claim_reward(
    args: ClaimArgs,
    client: DynProvider,
    receipt_timeout: Duration,
    deployments_path: &Path,
    ledger_path: &Path,
) -> Result<(), ScriptError> {
    let deployment = read_deployment(deployments_path)?;
    let signed = read_signed_claim(&args.claim)?;

    let authorizer = setup_authorizer(&deployment, ledger_path)?;
    authorizer.check(&signed)?;

    let handle = Cycle2earnHandle::from_deployment(&deployment, client, receipt_timeout);
    handle.claim_reward(&signed).await?;

    authorizer.authorize(&signed)?;
    Ok(())
}

/// Build an authorizer mirroring the recorded deployment, over the durable ledger
fn setup_authorizer(
    deployment: &Deployment,
    ledger_path: &Path,
) -> Result<ClaimAuthorizer, ScriptError> {
    let verifier = NativeClaimVerifier::new(
        deployment.owner,
        deployment.params.trusted_signer,
        deployment.address,
    )
    .map_err(AuthorizationError::Rejected)?;
    let ledger = SharedClaimLedger::open(ledger_path)?;

    Ok(ClaimAuthorizer::new(verifier, ledger))
}
