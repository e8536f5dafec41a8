//! A typed handle on a deployed Cycle2earn contract

use std::{fmt, time::Duration};

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, U256},
    providers::{DynProvider, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
    sol_types::SolConstructor,
};
use contracts_common::types::SignedClaim;
use tracing::info;

use crate::{
    errors::ScriptError,
    solidity::Cycle2earn,
    types::{ConstructorParams, ContractArtifact, Deployment},
    utils::wait_for_receipt,
};

/// A deployed Cycle2earn contract, reachable through a signing RPC client
#[derive(Clone)]
pub struct Cycle2earnHandle {
    /// The address of the contract
    address: Address,
    /// The client through which the contract is called
    provider: DynProvider,
    /// How long to wait for each transaction to be confirmed
    receipt_timeout: Duration,
}

impl Cycle2earnHandle {
    /// Deploy the contract with the given constructor parameters, waiting for the
    /// deployment to be confirmed.
    ///
    /// `owner` is the address of the key the client signs with.
    pub async fn deploy(
        provider: DynProvider,
        receipt_timeout: Duration,
        owner: Address,
        artifact: &ContractArtifact,
        params: ConstructorParams,
    ) -> Result<(Self, Deployment), ScriptError> {
        let constructor_args = Cycle2earn::constructorCall {
            trustedSigner: params.trusted_signer,
            configHash: params.config_hash,
            distributor: params.distributor,
        }
        .abi_encode();
        let mut code = artifact.bytecode().to_vec();
        code.extend(constructor_args);

        let tx = TransactionRequest::default().with_deploy_code(code);
        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        let tx_hash = *pending.tx_hash();
        info!(
            "Sent deployment in tx {tx_hash:#x}, waiting up to {receipt_timeout:?} for confirmation"
        );

        let receipt = wait_for_receipt(&provider, tx_hash, receipt_timeout).await?;
        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!("no contract address in receipt of {tx_hash:#x}"))
        })?;

        info!("Cycle2earn deployed at {address:#x} in tx {tx_hash:#x}");
        let deployment = Deployment {
            address,
            owner,
            tx_hash,
            params,
        };
        let handle = Self {
            address,
            provider,
            receipt_timeout,
        };
        Ok((handle, deployment))
    }

    /// Rebuild the handle of a recorded deployment
    pub fn from_deployment(
        deployment: &Deployment,
        provider: DynProvider,
        receipt_timeout: Duration,
    ) -> Self {
        Self {
            address: deployment.address,
            provider,
            receipt_timeout,
        }
    }

    /// The address of the contract
    pub fn address(&self) -> Address {
        self.address
    }

    /// Grant a reward to the account unconditionally. Only the owner may call this.
    pub async fn grant_reward(
        &self,
        account: Address,
        amount: U256,
    ) -> Result<TransactionReceipt, ScriptError> {
        let contract = Cycle2earn::new(self.address, &self.provider);
        let pending = contract
            .addRewardAlt(account, amount)
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        let tx_hash = *pending.tx_hash();

        let receipt = wait_for_receipt(&self.provider, tx_hash, self.receipt_timeout).await?;
        info!("Granted {amount} to {account:#x} in tx {tx_hash:#x}");
        Ok(receipt)
    }

    /// Redeem a claim authorized by the trusted signer
    pub async fn claim_reward(
        &self,
        signed: &SignedClaim,
    ) -> Result<TransactionReceipt, ScriptError> {
        let SignedClaim { claim, signature } = signed;

        let contract = Cycle2earn::new(self.address, &self.provider);
        let pending = contract
            .claimReward(
                claim.account,
                claim.amount,
                claim.nonce,
                Bytes::copy_from_slice(signature.as_bytes()),
            )
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        let tx_hash = *pending.tx_hash();

        let receipt = wait_for_receipt(&self.provider, tx_hash, self.receipt_timeout).await?;
        info!(
            "Claimed {} for {:#x} with nonce {} in tx {tx_hash:#x}",
            claim.amount, claim.account, claim.nonce
        );
        Ok(receipt)
    }
}

impl fmt::Debug for Cycle2earnHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cycle2earnHandle")
            .field("address", &self.address)
            .field("receipt_timeout", &self.receipt_timeout)
            .finish_non_exhaustive()
    }
}
