//! Definitions of errors that can occur while signing & authorizing claims off-chain

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use contracts_core::verifier::errors::VerifierError;

/// Errors that can occur while producing a claim signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// The key material could not be reached, e.g. a disconnected hardware
    /// wallet, an unreachable remote signer, or a timed out signing request
    Unavailable(String),
    /// The key material could not be parsed
    InvalidKey(String),
}

impl SigningError {
    /// Whether the error may resolve itself on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, SigningError::Unavailable(_))
    }
}

impl Display for SigningError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SigningError::Unavailable(s) => write!(f, "signing unavailable: {}", s),
            SigningError::InvalidKey(s) => write!(f, "invalid signing key: {}", s),
        }
    }
}

impl Error for SigningError {}

/// Errors that can occur while reading or writing the claim ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Error reading or writing the ledger file
    Io(String),
    /// Error de/serializing the ledger snapshot
    Serde(String),
    /// A thread panicked while holding the ledger lock
    Poisoned,
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Io(s) => write!(f, "error accessing ledger file: {}", s),
            LedgerError::Serde(s) => write!(f, "error de/serializing ledger: {}", s),
            LedgerError::Poisoned => write!(f, "ledger lock poisoned"),
        }
    }
}

impl Error for LedgerError {}

/// Errors that can occur while authorizing a claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The claim was rejected by the verifier
    Rejected(VerifierError),
    /// The ledger could not record the claim, so the claim was not accepted
    Ledger(LedgerError),
}

impl AuthorizationError {
    /// Whether the error may resolve itself on retry.
    ///
    /// Verifier rejections are permanent; only ledger I/O may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthorizationError::Ledger(LedgerError::Io(_)))
    }
}

impl Display for AuthorizationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationError::Rejected(e) => write!(f, "claim rejected: {}", e),
            AuthorizationError::Ledger(e) => write!(f, "claim not recorded: {}", e),
        }
    }
}

impl Error for AuthorizationError {}

impl From<VerifierError> for AuthorizationError {
    fn from(value: VerifierError) -> Self {
        AuthorizationError::Rejected(value)
    }
}

impl From<LedgerError> for AuthorizationError {
    fn from(value: LedgerError) -> Self {
        AuthorizationError::Ledger(value)
    }
}
