//! Solidity type definitions used throughout the project

#![allow(missing_docs)]

use alloy_sol_types::sol;

use crate::types::Claim;

sol! {
    /// The reward claim as it is laid out for `abi.encode` in the verifying contract
    struct RewardClaim {
        /// The account owed the reward
        address account;
        /// The reward amount
        uint256 amount;
        /// The value making this claim unique for the account
        uint256 nonce;
        /// The verifying contract instance
        address contractAddress;
    }
}

impl From<Claim> for RewardClaim {
    fn from(claim: Claim) -> Self {
        RewardClaim {
            account: claim.account,
            amount: claim.amount,
            nonce: claim.nonce,
            contractAddress: claim.contract,
        }
    }
}
