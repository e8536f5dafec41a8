//! Definitions of CLI arguments and commands for the deploy scripts

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use alloy::{
    primitives::{Address, B256, U256},
    providers::DynProvider,
};
use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{bootstrap, claim_reward, deploy, grant_reward, sign_claim, verify_claim},
    constants::{
        DEFAULT_BOOTSTRAP_REWARD, DEFAULT_CONFIG_HASH, DEFAULT_DEPLOYMENTS_PATH,
        DEFAULT_DISTRIBUTOR, DEFAULT_LEDGER_PATH, DEFAULT_RECEIPT_TIMEOUT_SECS,
        DEFAULT_TRUSTED_SIGNER,
    },
    errors::ScriptError,
    types::ConstructorParams,
    utils::parse_signer,
};

/// Scripts for deploying & interacting with the Cycle2earn contract
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer, or of the trusted signer when signing claims
    #[arg(short, long, env = "PKEY", hide_env_values = true)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Path to the file in which deployments are recorded
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Path to the snapshot of consumed claim nonces
    #[arg(short, long, default_value = DEFAULT_LEDGER_PATH)]
    pub ledger_path: PathBuf,

    /// How long to wait for a transaction to be confirmed, in seconds
    #[arg(long, env = "RECEIPT_TIMEOUT", default_value_t = DEFAULT_RECEIPT_TIMEOUT_SECS)]
    pub receipt_timeout: u64,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands available to the scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the Cycle2earn contract and record the deployment
    Deploy(DeployArgs),
    /// Deploy the Cycle2earn contract, then grant an initial reward
    Bootstrap(BootstrapArgs),
    /// Grant a reward as the contract owner, without a signed claim
    GrantReward(GrantRewardArgs),
    /// Sign a claim as the trusted signer
    SignClaim(SignClaimArgs),
    /// Check a signed claim against the trusted signer & the claim ledger
    /// without submitting it
    VerifyClaim(ClaimArgs),
    /// Check a signed claim, redeem it on chain, and record it in the claim ledger
    ClaimReward(ClaimArgs),
}

impl Command {
    /// Run the command
    pub async fn run(
        self,
        client: DynProvider,
        receipt_timeout: Duration,
        priv_key: &str,
        deployments_path: &Path,
        ledger_path: &Path,
    ) -> Result<(), ScriptError> {
        let caller = parse_signer(priv_key)?.address();

        match self {
            Command::Deploy(args) => {
                deploy(args, client, receipt_timeout, caller, deployments_path)
                    .await
                    .map(|_| ())
            }
            Command::Bootstrap(args) => {
                bootstrap(args, client, receipt_timeout, caller, deployments_path).await
            }
            Command::GrantReward(args) => {
                grant_reward(args, client, receipt_timeout, deployments_path).await
            }
            Command::SignClaim(args) => sign_claim(args, priv_key, deployments_path).await,
            Command::VerifyClaim(args) => verify_claim(args, deployments_path, ledger_path),
            Command::ClaimReward(args) => {
                claim_reward(args, client, receipt_timeout, deployments_path, ledger_path).await
            }
        }
    }
}

/// The parameters baked into the contract at construction, hex-encoded
#[derive(Args)]
pub struct ConstructorArgs {
    /// The address whose signatures authorize claims
    #[arg(long, default_value = DEFAULT_TRUSTED_SIGNER)]
    pub trusted_signer: Address,

    /// The hash of the reward program's configuration
    #[arg(long, default_value = DEFAULT_CONFIG_HASH)]
    pub config_hash: B256,

    /// The address distributing rewards
    #[arg(long, default_value = DEFAULT_DISTRIBUTOR)]
    pub distributor: Address,
}

impl From<ConstructorArgs> for ConstructorParams {
    fn from(args: ConstructorArgs) -> Self {
        ConstructorParams {
            trusted_signer: args.trusted_signer,
            config_hash: args.config_hash,
            distributor: args.distributor,
        }
    }
}

/// Deploy the Cycle2earn contract
#[derive(Args)]
pub struct DeployArgs {
    /// Path to the contract's compilation artifact (Hardhat or Foundry JSON)
    #[arg(short, long)]
    pub artifact: PathBuf,

    /// The constructor parameters
    #[command(flatten)]
    pub constructor: ConstructorArgs,
}

/// Deploy the Cycle2earn contract & grant an initial reward
#[derive(Args)]
pub struct BootstrapArgs {
    /// The deployment parameters
    #[command(flatten)]
    pub deploy: DeployArgs,

    /// The account to reward, defaults to the deployer
    #[arg(long)]
    pub account: Option<Address>,

    /// The reward amount
    #[arg(long, default_value_t = U256::from(DEFAULT_BOOTSTRAP_REWARD))]
    pub amount: U256,
}

/// Grant a reward as the contract owner
#[derive(Args)]
pub struct GrantRewardArgs {
    /// The account to reward
    #[arg(long)]
    pub account: Address,

    /// The reward amount
    #[arg(long)]
    pub amount: U256,
}

/// Sign a claim for the recorded deployment
#[derive(Args)]
pub struct SignClaimArgs {
    /// The account owed the reward
    #[arg(long)]
    pub account: Address,

    /// The reward amount
    #[arg(long)]
    pub amount: U256,

    /// The claim nonce, drawn at random if omitted
    #[arg(long)]
    pub nonce: Option<U256>,

    /// Where to write the signed claim, defaults to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Act on a signed claim
#[derive(Args)]
pub struct ClaimArgs {
    /// Path to the signed claim JSON
    #[arg(short, long)]
    pub claim: PathBuf,
}
