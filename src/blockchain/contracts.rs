//! Solidity bindings for the oracle network contracts.

use alloy::sol;

sol! {
    /// Functions router: resolves a DON id to its coordinator.
    #[sol(rpc)]
    interface IFunctionsRouter {
        function getContractById(bytes32 id) external view returns (address);
    }

    /// Functions coordinator: publishes the DON encryption keys.
    #[sol(rpc)]
    interface IFunctionsCoordinator {
        function getDONPublicKey() external view returns (bytes memory);
        function getThresholdPublicKey() external view returns (bytes memory);
    }
}
