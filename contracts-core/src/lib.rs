//! Core reward authorization functionality, defined agnostically of running
//! inside a contract VM or natively off-chain

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![no_std]

extern crate alloc;

pub mod crypto;
pub mod ledger;
pub mod verifier;
