//! Type definitions used throughout the scripts

use alloy::primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// The parameters baked into the Cycle2earn contract at construction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorParams {
    /// The address whose signatures authorize claims
    pub trusted_signer: Address,
    /// The hash of the reward program's configuration
    pub config_hash: B256,
    /// The address distributing rewards
    pub distributor: Address,
}

/// A record of a Cycle2earn deployment, from which later script invocations
/// rebuild their contract handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// The address of the deployed contract
    pub address: Address,
    /// The deployer, who owns the contract
    pub owner: Address,
    /// The hash of the deployment transaction
    pub tx_hash: B256,
    /// The constructor parameters the contract was deployed with
    #[serde(flatten)]
    pub params: ConstructorParams,
}

/// The subset of a compilation artifact (e.g. Hardhat or Foundry output)
/// needed to deploy a contract
#[derive(Debug, Deserialize)]
pub struct ContractArtifact {
    /// The contract's creation bytecode
    pub bytecode: ArtifactBytecode,
}

/// Creation bytecode, which artifacts store either as a bare hex string
/// or as an object with an `object` field
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ArtifactBytecode {
    /// A bare hex string, as emitted by Hardhat
    Hex(Bytes),
    /// A bytecode object, as emitted by Foundry
    Object {
        /// The hex-encoded bytecode
        object: Bytes,
    },
}

impl ContractArtifact {
    /// The creation bytecode
    pub fn bytecode(&self) -> &Bytes {
        match &self.bytecode {
            ArtifactBytecode::Hex(code) | ArtifactBytecode::Object { object: code } => code,
        }
    }
}
