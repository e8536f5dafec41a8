//! Definitions of errors that can occur during the execution of the contract management scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use contracts_utils::errors::{AuthorizationError, LedgerError, SigningError};

/// Errors that can occur during the execution of the contract management scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
    /// Error reading or writing a signed claim file
    ClaimFile(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// Error fetching a transaction receipt
    ReceiptFetching(String),
    /// No receipt was found for a transaction after polling
    ReceiptTimeout(String),
    /// A transaction was mined but reverted
    TransactionReverted(String),
    /// Error producing a claim signature
    Signing(SigningError),
    /// The claim was refused off-chain
    Authorization(AuthorizationError),
    /// Error de/serializing script inputs or outputs
    Serde(String),
}

impl ScriptError {
    /// Whether the error may resolve itself on retry
    pub fn is_transient(&self) -> bool {
        match self {
            ScriptError::ReceiptFetching(_) | ScriptError::ReceiptTimeout(_) => true,
            ScriptError::Signing(e) => e.is_transient(),
            ScriptError::Authorization(e) => e.is_transient(),
            _ => false,
        }
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::ClaimFile(s) => write!(f, "error accessing signed claim: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::ReceiptFetching(s) => write!(f, "error fetching receipt: {}", s),
            ScriptError::ReceiptTimeout(s) => write!(f, "no receipt found for tx {}", s),
            ScriptError::TransactionReverted(s) => write!(f, "tx {} reverted", s),
            ScriptError::Signing(e) => write!(f, "{}", e),
            ScriptError::Authorization(e) => write!(f, "{}", e),
            ScriptError::Serde(s) => write!(f, "error de/serializing: {}", s),
        }
    }
}

impl Error for ScriptError {}

impl From<SigningError> for ScriptError {
    fn from(value: SigningError) -> Self {
        ScriptError::Signing(value)
    }
}

impl From<AuthorizationError> for ScriptError {
    fn from(value: AuthorizationError) -> Self {
        ScriptError::Authorization(value)
    }
}

impl From<LedgerError> for ScriptError {
    fn from(value: LedgerError) -> Self {
        ScriptError::Authorization(AuthorizationError::Ledger(value))
    }
}
