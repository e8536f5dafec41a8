use std::time::Duration;

use clap::Parser;
use scripts::{cli::Cli, constants::DEFAULT_LOG_FILTER, errors::ScriptError, utils::setup_client};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        command,
        deployments_path,
        ledger_path,
        receipt_timeout,
    } = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().pretty().with_env_filter(filter).init();

    let client = setup_client(&priv_key, &rpc_url)?;

    command
        .run(
            client,
            Duration::from_secs(receipt_timeout),
            &priv_key,
            &deployments_path,
            &ledger_path,
        )
        .await
}
