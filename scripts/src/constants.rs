//! Constants used in the deploy scripts

/// The log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default path of the claim ledger snapshot
pub const DEFAULT_LEDGER_PATH: &str = "claim_ledger.json";

/// The Cycle2earn contract key in the deployments file
pub const CYCLE2EARN_DEPLOYMENT_KEY: &str = "Cycle2earn";

/// The trusted signer baked into the contract at bootstrap, if none is given
pub const DEFAULT_TRUSTED_SIGNER: &str = "0x5F8f86B8D0Fa93cdaE20936d150175dF0205fB38";

/// The configuration hash baked into the contract at bootstrap, if none is given
pub const DEFAULT_CONFIG_HASH: &str =
    "0x8cb2b80576d5605f40243c80a80f70191584c0c3c901d54cbfba9df2d4e5c743";

/// The distributor baked into the contract at bootstrap, if none is given
pub const DEFAULT_DISTRIBUTOR: &str = "0xcc1190e025b6b94e8827e9a4b51b61ee13c2ba93";

/// The reward granted at bootstrap, if none is given
pub const DEFAULT_BOOTSTRAP_REWARD: u64 = 100;

/// How long to wait for a transaction receipt before giving up, in seconds
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 600;

/// The delay before the second receipt poll, doubled on every subsequent poll
pub const RECEIPT_POLL_BASE_BACKOFF_MS: u64 = 100;

/// The upper bound on the delay between receipt polls
pub const RECEIPT_POLL_MAX_BACKOFF_MS: u64 = 5_000;
