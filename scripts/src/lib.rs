//! Scripts for deploying, bootstrapping, and claiming rewards from the Cycle2earn contract.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
mod commands;
pub mod constants;
pub mod contract;
pub mod errors;
mod solidity;
pub mod types;
pub mod utils;
