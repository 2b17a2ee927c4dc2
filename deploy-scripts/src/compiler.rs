//! Solidity compiler settings used to build the deployed artifacts.
//!
//! Contracts are compiled with a high optimizer `runs` value by default. The
//! contracts whose runtime code sits close to the EIP-170 size limit are
//! compiled with fewer runs, trading call gas for smaller bytecode.

use std::collections::BTreeMap;

use serde::Serialize;

/// The solc version all contracts are compiled with
pub const SOLC_VERSION: &str = "0.7.6";

/// The EVM version all contracts target
pub const EVM_VERSION: &str = "istanbul";

/// Optimizer runs for contracts without a size constraint
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 1_000_000;

/// Optimizer runs for contracts near the size limit
pub const LOW_OPTIMIZER_RUNS: u32 = 2_000;

/// Optimizer runs for contracts that only fit the size limit with the
/// smallest output
pub const LOWEST_OPTIMIZER_RUNS: u32 = 1_000;

/// How the metadata hash is appended to the bytecode
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BytecodeHash {
    /// No metadata hash
    None,
}

/// The `optimizer` section of solc settings
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct OptimizerSettings {
    /// Whether the optimizer runs
    pub enabled: bool,
    /// How many times each opcode is expected to execute
    pub runs: u32,
}

/// The `metadata` section of solc settings
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSettings {
    /// How the metadata hash is appended to the bytecode
    pub bytecode_hash: BytecodeHash,
}

/// The solc standard-JSON `settings` object
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompilerSettings {
    /// The target EVM version
    pub evm_version: &'static str,
    /// Optimizer settings
    pub optimizer: OptimizerSettings,
    /// Metadata settings
    pub metadata: MetadataSettings,
}

/// A compiler version together with its settings
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct CompilerProfile {
    /// The solc version
    pub version: &'static str,
    /// The compiler settings
    pub settings: CompilerSettings,
}

impl CompilerProfile {
    /// A profile for the project's solc version with the given optimizer runs
    pub const fn with_runs(runs: u32) -> Self {
        Self {
            version: SOLC_VERSION,
            settings: CompilerSettings {
                evm_version: EVM_VERSION,
                optimizer: OptimizerSettings {
                    enabled: true,
                    runs,
                },
                metadata: MetadataSettings {
                    bytecode_hash: BytecodeHash::None,
                },
            },
        }
    }
}

/// The compiler profile of every source file in the project
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SolidityConfig {
    /// The profile used for files without an override
    pub default: CompilerProfile,
    /// Per-file profiles, keyed by source path
    pub overrides: BTreeMap<&'static str, CompilerProfile>,
}

impl SolidityConfig {
    /// The configuration the periphery contracts are built with
    pub fn uniswap_v3() -> Self {
        let low = CompilerProfile::with_runs(LOW_OPTIMIZER_RUNS);
        let lowest = CompilerProfile::with_runs(LOWEST_OPTIMIZER_RUNS);

        Self {
            default: CompilerProfile::with_runs(DEFAULT_OPTIMIZER_RUNS),
            overrides: BTreeMap::from([
                ("contracts/NonfungiblePositionManager.sol", low),
                ("contracts/NonfungibleTokenPositionDescriptor.sol", lowest),
                ("contracts/libraries/NFTDescriptor.sol", lowest),
            ]),
        }
    }

    /// The profile a source file is compiled with
    pub fn profile_for(&self, source_path: &str) -> &CompilerProfile {
        let path = source_path.strip_prefix("./").unwrap_or(source_path);
        self.overrides.get(path).unwrap_or(&self.default)
    }
}
