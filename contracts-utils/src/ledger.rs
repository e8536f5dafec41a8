//! A claim ledger shared between concurrent verifications and persisted to disk.
//!
//! The whole check-and-insert sequence, including persistence, runs under a single
//! lock. A claim is only committed to memory once its snapshot is on disk, so a
//! failed write leaves the ledger exactly as it was.
//!
//! A durable ledger may be shared between processes. Each of them holds an advisory
//! lock on a sidecar file while it reloads the snapshot, checks and persists, so
//! nonces consumed by one process are never dropped by another.

use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use alloy_primitives::{Address, U256};
use contracts_common::types::Claim;
use contracts_core::{
    ledger::{ClaimLedger, LedgerEntry, LedgerSnapshot, MemoryClaimLedger},
    verifier::consume_claim,
};
use fs4::fs_std::FileExt;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{
    constants::LEDGER_LOCK_EXTENSION,
    errors::{AuthorizationError, LedgerError},
};

/// A thread-safe claim ledger, optionally backed by a JSON snapshot file
#[derive(Debug)]
pub struct SharedClaimLedger {
    /// The consumed nonces
    inner: Mutex<MemoryClaimLedger>,
    /// The snapshot file, if the ledger is durable
    path: Option<PathBuf>,
}

impl SharedClaimLedger {
    /// Construct an empty ledger that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(MemoryClaimLedger::new()),
            path: None,
        }
    }

    /// Open the durable ledger at the given path, creating it on first write
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let ledger = match read_snapshot(&path)? {
            Some(snapshot) => MemoryClaimLedger::from_snapshot(snapshot),
            None => MemoryClaimLedger::new(),
        };

        info!(
            "Opened claim ledger at {} with {} consumed nonces",
            path.display(),
            ledger.len()
        );
        Ok(Self {
            inner: Mutex::new(ledger),
            path: Some(path),
        })
    }

    /// Whether the nonce has been consumed for the account
    pub fn contains(&self, account: Address, nonce: U256) -> Result<bool, LedgerError> {
        Ok(self.lock()?.contains(account, nonce))
    }

    /// The total number of consumed nonces
    pub fn len(&self) -> Result<usize, LedgerError> {
        Ok(self.lock()?.len())
    }

    /// Whether no nonce has been consumed yet
    pub fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.lock()?.is_empty())
    }

    /// Check that the claim is redeemable, without consuming it
    pub fn check(&self, claim: &Claim) -> Result<(), AuthorizationError> {
        let mut ledger = self.lock()?;
        let _file_lock = self.sync_from_disk(&mut ledger)?;

        let mut staged = StagedLedger::new(&ledger);
        consume_claim(claim, &mut staged)?;
        Ok(())
    }

    /// Consume the claim's nonce, persisting the ledger before the claim counts as accepted
    pub fn redeem(&self, claim: &Claim) -> Result<(), AuthorizationError> {
        let mut ledger = self.lock()?;
        let _file_lock = self.sync_from_disk(&mut ledger)?;

        let mut staged = StagedLedger::new(&ledger);
        consume_claim(claim, &mut staged)?;

        if let Some(path) = &self.path {
            persist(path, &staged.snapshot())?;
        }

        ledger.insert(claim.account, claim.nonce);
        debug!(
            "Consumed nonce {} for account {}",
            claim.nonce, claim.account
        );
        Ok(())
    }

    /// Acquire the ledger lock
    fn lock(&self) -> Result<MutexGuard<'_, MemoryClaimLedger>, LedgerError> {
        self.inner.lock().map_err(|_| LedgerError::Poisoned)
    }

    /// Take the cross-process lock and fold nonces other processes consumed since
    /// the last read into the in-memory ledger.
    ///
    /// The lock is released when the returned file is dropped. In-memory ledgers
    /// have nothing to sync.
    fn sync_from_disk(
        &self,
        ledger: &mut MemoryClaimLedger,
    ) -> Result<Option<File>, LedgerError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };

        let lock_file = acquire_file_lock(path)?;
        if let Some(snapshot) = read_snapshot(path)? {
            for entry in snapshot.entries {
                for nonce in entry.nonces {
                    ledger.insert(entry.account, nonce);
                }
            }
        }

        Ok(Some(lock_file))
    }
}

// -----------
// | HELPERS |
// -----------

/// A view of the ledger with at most one pending insertion layered on top,
/// used to run the verifier's ledger steps without committing their result
struct StagedLedger<'a> {
    /// The committed ledger
    base: &'a MemoryClaimLedger,
    /// The pending insertion
    pending: Option<(Address, U256)>,
}

impl<'a> StagedLedger<'a> {
    /// Stage insertions on top of the given ledger
    fn new(base: &'a MemoryClaimLedger) -> Self {
        Self {
            base,
            pending: None,
        }
    }

    /// Snapshot the committed ledger with the pending insertion applied
    fn snapshot(&self) -> LedgerSnapshot {
        let mut snapshot = self.base.snapshot();
        if let Some((account, nonce)) = self.pending {
            match snapshot.entries.iter_mut().find(|e| e.account == account) {
                Some(entry) => entry.nonces.push(nonce),
                None => snapshot.entries.push(LedgerEntry {
                    account,
                    nonces: vec![nonce],
                }),
            }
        }

        snapshot
    }
}

impl ClaimLedger for StagedLedger<'_> {
    fn contains(&self, account: Address, nonce: U256) -> bool {
        self.pending == Some((account, nonce)) || self.base.contains(account, nonce)
    }

    fn insert(&mut self, account: Address, nonce: U256) {
        self.pending = Some((account, nonce));
    }
}

/// Read the snapshot at the given path, if one has been written
fn read_snapshot(path: &Path) -> Result<Option<LedgerSnapshot>, LedgerError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| LedgerError::Io(e.to_string()))?;
    let snapshot =
        serde_json::from_str(&contents).map_err(|e| LedgerError::Serde(e.to_string()))?;
    Ok(Some(snapshot))
}

/// Block until this process holds the exclusive lock on the ledger's sidecar lock file
fn acquire_file_lock(path: &Path) -> Result<File, LedgerError> {
    let lock_path = path.with_extension(LEDGER_LOCK_EXTENSION);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| LedgerError::Io(format!("opening {}: {e}", lock_path.display())))?;

    file.lock_exclusive()
        .map_err(|e| LedgerError::Io(format!("locking {}: {e}", lock_path.display())))?;
    Ok(file)
}

/// Atomically replace the snapshot file: write and sync a temp file in the same
/// directory, then rename it over the old one
fn persist(path: &Path, snapshot: &LedgerSnapshot) -> Result<(), LedgerError> {
    let contents =
        serde_json::to_vec_pretty(snapshot).map_err(|e| LedgerError::Serde(e.to_string()))?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| LedgerError::Io(format!("creating temp file in {}: {e}", dir.display())))?;

    tmp.write_all(&contents)
        .map_err(|e| LedgerError::Io(format!("writing temp file: {e}")))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| LedgerError::Io(format!("syncing temp file: {e}")))?;

    tmp.persist(path).map_err(|e| {
        LedgerError::Io(format!("renaming temp file to {}: {}", path.display(), e.error))
    })?;
    Ok(())
}
