//! Proxy and upgrade mock bindings.
//!
//! Includes:
//! - SimpleProxy (bare delegating proxy, call the implementation ABI at its address)
//! - ProxyAdminForBinding (OpenZeppelin ProxyAdmin exposed for bindings)
//! - UpgradeExecutorMock (role-gated upgrade executor)

use alloy_sol_types::sol;

sol! {
    /// SimpleProxy - forwards every call to a fixed implementation
    #[sol(rpc, abi, all_derives)]
    interface SimpleProxy {
        constructor(address impl_) {}
    }

    /// ProxyAdminForBinding - admin of transparent upgradeable proxies
    #[sol(rpc, abi, all_derives)]
    interface ProxyAdminForBinding {
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);

        function owner() external view returns (address);
        function renounceOwnership() external;
        function transferOwnership(address newOwner) external;

        /// Current implementation behind `proxy`
        function getProxyImplementation(address proxy) external view returns (address);

        /// Current admin of `proxy`
        function getProxyAdmin(address proxy) external view returns (address);

        function changeProxyAdmin(address proxy, address newAdmin) external;
        function upgrade(address proxy, address implementation) external;
        function upgradeAndCall(address proxy, address implementation, bytes memory data) external payable;
    }

    /// UpgradeExecutorMock - executes upgrades through delegatecall for holders of EXECUTOR_ROLE
    #[sol(rpc, abi, all_derives)]
    interface UpgradeExecutorMock {
        event UpgradeExecuted(address indexed upgrade, uint256 value, bytes data);
        event TargetCallExecuted(address indexed target, uint256 value, bytes data);
        event RoleAdminChanged(bytes32 indexed role, bytes32 indexed previousAdminRole, bytes32 indexed newAdminRole);
        event RoleGranted(bytes32 indexed role, address indexed account, address indexed sender);
        event RoleRevoked(bytes32 indexed role, address indexed account, address indexed sender);
        event Initialized(uint8 version);

        function ADMIN_ROLE() external view returns (bytes32);
        function EXECUTOR_ROLE() external view returns (bytes32);
        function DEFAULT_ADMIN_ROLE() external view returns (bytes32);

        /// Grant ADMIN_ROLE to `admin` and EXECUTOR_ROLE to every executor
        function initialize(address admin, address[] memory executors) external;

        /// Delegatecall `upgrade` with `upgradeCallData`
        function execute(address upgrade, bytes memory upgradeCallData) external payable;

        /// Plain call to `target` with `targetCallData`
        function executeCall(address target, bytes memory targetCallData) external payable;

        function hasRole(bytes32 role, address account) external view returns (bool);
        function getRoleAdmin(bytes32 role) external view returns (bytes32);
        function grantRole(bytes32 role, address account) external;
        function revokeRole(bytes32 role, address account) external;
        function renounceRole(bytes32 role, address account) external;
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
    }
}

/// Role identifiers used by [`UpgradeExecutorMock`].
pub mod roles {
    use alloy_primitives::{keccak256, B256};

    pub const DEFAULT_ADMIN: B256 = B256::ZERO;

    pub fn admin() -> B256 {
        keccak256("ADMIN_ROLE")
    }

    pub fn executor() -> B256 {
        keccak256("EXECUTOR_ROLE")
    }
}
