//! Utilities for the deploy scripts.

use std::{collections::BTreeMap, fs, path::Path, str::FromStr, time::Duration};

use alloy::{
    network::EthereumWallet,
    primitives::B256,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use contracts_common::types::SignedClaim;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::{
    constants::{
        CYCLE2EARN_DEPLOYMENT_KEY, RECEIPT_POLL_BASE_BACKOFF_MS, RECEIPT_POLL_MAX_BACKOFF_MS,
    },
    errors::ScriptError,
    types::{ContractArtifact, Deployment},
};

/// The deployments file: deployment records keyed by contract name
type DeploymentsFile = BTreeMap<String, Deployment>;

/// Parses a hex-encoded private key
pub fn parse_signer(priv_key: &str) -> Result<PrivateKeySigner, ScriptError> {
    PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}

/// Sets up an RPC client which signs transactions with the given private key.
///
/// No request is made to the RPC endpoint until the client is first used.
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<DynProvider, ScriptError> {
    let signer = parse_signer(priv_key)?;
    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .on_http(url);

    Ok(DynProvider::new(provider))
}

// ---------------
// | DEPLOYMENTS |
// ---------------

/// Reads the Cycle2earn deployment record from the deployments file
pub fn read_deployment(deployments_path: &Path) -> Result<Deployment, ScriptError> {
    let deployments = read_deployments_file(deployments_path)?;
    deployments
        .get(CYCLE2EARN_DEPLOYMENT_KEY)
        .copied()
        .ok_or_else(|| {
            ScriptError::ReadDeployments(format!(
                "no {} deployment in {}",
                CYCLE2EARN_DEPLOYMENT_KEY,
                deployments_path.display()
            ))
        })
}

/// Records the Cycle2earn deployment in the deployments file,
/// preserving any other records in it
pub fn write_deployment(deployments_path: &Path, deployment: &Deployment) -> Result<(), ScriptError> {
    let mut deployments = if deployments_path.exists() {
        read_deployments_file(deployments_path)?
    } else {
        DeploymentsFile::new()
    };
    deployments.insert(CYCLE2EARN_DEPLOYMENT_KEY.to_string(), *deployment);

    let contents = serde_json::to_string_pretty(&deployments)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(deployments_path, contents).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
}

/// Parses the deployments file
fn read_deployments_file(deployments_path: &Path) -> Result<DeploymentsFile, ScriptError> {
    let contents = fs::read_to_string(deployments_path).map_err(|e| {
        ScriptError::ReadDeployments(format!("{}: {}", deployments_path.display(), e))
    })?;
    serde_json::from_str(&contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

// -------------
// | ARTIFACTS |
// -------------

/// Reads a compilation artifact from a JSON file
pub fn read_artifact(artifact_path: &Path) -> Result<ContractArtifact, ScriptError> {
    let contents = fs::read_to_string(artifact_path).map_err(|e| {
        ScriptError::ArtifactParsing(format!("{}: {}", artifact_path.display(), e))
    })?;
    let artifact: ContractArtifact = serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    if artifact.bytecode().is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "{} has no creation bytecode",
            artifact_path.display()
        )));
    }

    Ok(artifact)
}

// ----------
// | CLAIMS |
// ----------

/// Reads a signed claim from a JSON file
pub fn read_signed_claim(path: &Path) -> Result<SignedClaim, ScriptError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ScriptError::ClaimFile(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&contents).map_err(|e| ScriptError::Serde(e.to_string()))
}

/// Serializes a signed claim to JSON, writing it to the given file if any,
/// and to stdout otherwise
pub fn write_signed_claim(signed: &SignedClaim, path: Option<&Path>) -> Result<(), ScriptError> {
    let contents =
        serde_json::to_string_pretty(signed).map_err(|e| ScriptError::Serde(e.to_string()))?;

    match path {
        Some(path) => fs::write(path, contents)
            .map_err(|e| ScriptError::ClaimFile(format!("{}: {}", path.display(), e))),
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}

// ----------------
// | TRANSACTIONS |
// ----------------

/// Polls for the receipt of a sent transaction, backing off between polls,
/// and checks that the transaction succeeded.
///
/// Only the receipt lookup is retried; the transaction itself is never resent.
/// Gives up once `timeout` has elapsed without a receipt.
pub async fn wait_for_receipt(
    provider: &DynProvider,
    tx_hash: B256,
    timeout: Duration,
) -> Result<TransactionReceipt, ScriptError> {
    let deadline = Instant::now().checked_add(timeout);
    let mut attempt = 0;
    loop {
        if attempt > 0 {
            let remaining = deadline.map_or(Duration::MAX, |deadline| {
                deadline.saturating_duration_since(Instant::now())
            });
            if remaining.is_zero() {
                break;
            }
            sleep(receipt_poll_backoff(attempt).min(remaining)).await;
        }
        attempt = attempt.saturating_add(1);

        match provider.get_transaction_receipt(tx_hash).await {
            Ok(Some(receipt)) => {
                if !receipt.status() {
                    return Err(ScriptError::TransactionReverted(format!("{tx_hash:#x}")));
                }
                return Ok(receipt);
            }
            Ok(None) => debug!("Receipt for tx {tx_hash:#x} not yet available"),
            Err(e) => warn!("Error fetching receipt for tx {tx_hash:#x}: {e}"),
        }
    }

    Err(ScriptError::ReceiptTimeout(format!("{tx_hash:#x} after {timeout:?}")))
}

/// The delay before the given (zero-indexed) receipt poll
fn receipt_poll_backoff(attempt: u32) -> Duration {
    let factor = 1_u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    let millis = RECEIPT_POLL_BASE_BACKOFF_MS
        .saturating_mul(factor)
        .min(RECEIPT_POLL_MAX_BACKOFF_MS);
    Duration::from_millis(millis)
}
