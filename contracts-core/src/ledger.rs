//! The claim ledger: the per-account set of consumed nonces.
//!
//! A nonce, once consumed, stays consumed for the lifetime of the ledger,
//! so there is no removal operation.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// The storage interface of the consumed-nonce set.
///
/// Mutation goes through `&mut self`, so a check followed by an insert is atomic
/// for any single owner of the ledger. Shared ledgers must serialize access
/// around the whole check-and-insert sequence.
pub trait ClaimLedger {
    /// Whether the nonce has already been consumed for the account
    fn contains(&self, account: Address, nonce: U256) -> bool;

    /// Mark the nonce as consumed for the account
    fn insert(&mut self, account: Address, nonce: U256);

    /// Consume the nonce if it has not been consumed already.
    ///
    /// Returns `false` if the nonce was already consumed.
    fn try_consume(&mut self, account: Address, nonce: U256) -> bool {
        if self.contains(account, nonce) {
            return false;
        }

        self.insert(account, nonce);
        true
    }
}

/// An in-memory claim ledger
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryClaimLedger {
    /// The consumed nonces, keyed by account
    consumed: BTreeMap<Address, BTreeSet<U256>>,
}

impl MemoryClaimLedger {
    /// Construct an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// The total number of consumed nonces across all accounts
    pub fn len(&self) -> usize {
        self.consumed.values().map(BTreeSet::len).sum()
    }

    /// Whether no nonce has been consumed yet
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }

    /// The nonces consumed for the given account, in ascending order
    pub fn nonces(&self, account: Address) -> impl Iterator<Item = &U256> {
        self.consumed.get(&account).into_iter().flatten()
    }

    /// Take a serializable snapshot of the ledger
    pub fn snapshot(&self) -> LedgerSnapshot {
        let entries = self
            .consumed
            .iter()
            .map(|(account, nonces)| LedgerEntry {
                account: *account,
                nonces: nonces.iter().copied().collect(),
            })
            .collect();

        LedgerSnapshot { entries }
    }

    /// Rebuild a ledger from a snapshot
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        let mut ledger = Self::new();
        for entry in snapshot.entries {
            for nonce in entry.nonces {
                ledger.insert(entry.account, nonce);
            }
        }

        ledger
    }
}

impl ClaimLedger for MemoryClaimLedger {
    fn contains(&self, account: Address, nonce: U256) -> bool {
        self.consumed
            .get(&account)
            .is_some_and(|nonces| nonces.contains(&nonce))
    }

    fn insert(&mut self, account: Address, nonce: U256) {
        self.consumed.entry(account).or_default().insert(nonce);
    }
}

impl<L: ClaimLedger + ?Sized> ClaimLedger for &mut L {
    fn contains(&self, account: Address, nonce: U256) -> bool {
        (**self).contains(account, nonce)
    }

    fn insert(&mut self, account: Address, nonce: U256) {
        (**self).insert(account, nonce)
    }
}

/// The consumed nonces of a single account, as persisted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The account
    pub account: Address,
    /// The nonces consumed by the account
    pub nonces: Vec<U256>,
}

/// A serializable snapshot of a claim ledger
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// One entry per account with at least one consumed nonce
    pub entries: Vec<LedgerEntry>,
}
