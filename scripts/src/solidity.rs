//! Definitions of the Solidity interface of the Cycle2earn contract

use alloy::sol;

sol! {
    #[sol(rpc)]
    contract Cycle2earn {
        constructor(address trustedSigner, bytes32 configHash, address distributor);

        function addRewardAlt(address account, uint256 amount) external;
        function claimReward(address account, uint256 amount, uint256 nonce, bytes signature) external;
    }
}
