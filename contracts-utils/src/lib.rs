//! Common utilities used outside of the contracts themselves, e.g. by the signing
//! authority, by off-chain pre-checks of claims & by the deploy scripts

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod authorizer;
mod constants;
pub mod crypto;
pub mod errors;
pub mod ledger;
pub mod signer;
