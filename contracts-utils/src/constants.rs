//! Constants used by the off-chain signer & authorizer

/// The default time to wait on a single signing attempt, in milliseconds
pub(crate) const DEFAULT_SIGNING_TIMEOUT_MS: u64 = 10_000;

/// The default number of signing attempts before giving up
pub(crate) const DEFAULT_SIGNING_ATTEMPTS: u32 = 3;

/// The default delay before the first signing retry, in milliseconds.
/// Doubles on every subsequent retry.
pub(crate) const DEFAULT_SIGNING_BACKOFF_MS: u64 = 250;

/// The default upper bound on the delay between signing retries, in milliseconds
pub(crate) const DEFAULT_SIGNING_MAX_BACKOFF_MS: u64 = 5_000;

/// The tracing target under which security events are logged
pub(crate) const SECURITY_LOG_TARGET: &str = "security";

/// The extension of the sidecar file processes lock while updating a ledger snapshot
pub(crate) const LEDGER_LOCK_EXTENSION: &str = "lock";
