//! Constants used in the deploy scripts

/// The number of confirmations to wait for each contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The maximum size of deployed contract code, in bytes.
///
/// This is specified in EIP170: https://eips.ethereum.org/EIPS/eip-170
pub const MAX_RUNTIME_CODE_SIZE: usize = 24_576;

/// The label passed to the position descriptor as the native currency label
pub const DEFAULT_NATIVE_CURRENCY_LABEL: &str = "WETH";

/// The default directory holding the Hardhat compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The default path of the WETH9 artifact
pub const DEFAULT_WETH9_ARTIFACT: &str = "WETH9.json";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "./deployInfo.json";

// ------------------------
// | Environment variables |
// ------------------------

/// The Alchemy API key, used to build the Sepolia RPC url
pub const ALCHEMY_API_KEY_ENV_VAR: &str = "ALCHEMY_API_KEY";

/// The Etherscan API key, used for source verification on public networks
pub const ETHERSCAN_API_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";

/// The address of the Sepolia deployer
pub const SEPOLIA_WALLET_ENV_VAR: &str = "SEPOLIA_WALLET";

/// The private key of the Sepolia deployer
pub const SEPOLIA_WALLET_PRIVATE_KEY_ENV_VAR: &str = "SEPOLIA_WALLET_PRIVATE_KEY";

/// The address of the Anvil deployer
pub const ANVIL_WALLET_ENV_VAR: &str = "ANVIL_WALLET";

/// The private key of the Anvil deployer
pub const ANVIL_WALLET_PRIVATE_KEY_ENV_VAR: &str = "ANVIL_WALLET_PRIVATE_KEY";

/// The address of an existing WETH9 contract
pub const WETH9_ADDRESS_ENV_VAR: &str = "WETH9_ADDRESS";

// -------------
// | Endpoints |
// -------------

/// The RPC url of a locally running Anvil node
pub const ANVIL_RPC_URL: &str = "http://127.0.0.1:8545";

/// The chain ID a locally running Anvil node is expected to report
pub const ANVIL_CHAIN_ID: u64 = 1337;

/// The Alchemy Sepolia RPC url, to which the API key is appended
pub const SEPOLIA_ALCHEMY_RPC_BASE_URL: &str = "https://eth-sepolia.g.alchemy.com/v2/";

/// The Sepolia chain ID
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

// ------------------
// | Artifact paths |
// ------------------

/// The directory, relative to the artifacts directory, of the contract artifacts
pub const CONTRACTS_PATH_SEGMENT: &str = "contracts";

/// The directory, relative to the contracts directory, of the library artifacts
pub const LIBRARIES_PATH_SEGMENT: &str = "libraries";

/// The extension of a Solidity source file
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The extension of a compilation artifact
pub const ARTIFACT_EXTENSION: &str = "json";

// ----------------------
// | Deployments record |
// ----------------------

/// The width of the separator lines in the deployment summary
pub const SUMMARY_RULE_WIDTH: usize = 63;
