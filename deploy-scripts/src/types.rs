//! Type definitions used throughout the scripts

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
};

use crate::constants::{
    ARTIFACT_EXTENSION, CONTRACTS_PATH_SEGMENT, LIBRARIES_PATH_SEGMENT, SOLIDITY_EXTENSION,
};

/// The contracts deployed by the scripts
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum V3Contract {
    /// The pool factory
    Factory,
    /// The swap router
    SwapRouter,
    /// The library rendering position NFT metadata
    NftDescriptor,
    /// The position NFT descriptor, linked against `NftDescriptor`
    PositionDescriptor,
    /// The position NFT manager
    PositionManager,
    /// The wrapped native token
    Weth9,
}

impl V3Contract {
    /// The contracts compiled in this project, in deployment order
    pub const COMPILED: [V3Contract; 5] = [
        V3Contract::Factory,
        V3Contract::SwapRouter,
        V3Contract::NftDescriptor,
        V3Contract::PositionDescriptor,
        V3Contract::PositionManager,
    ];

    /// The Solidity contract name
    pub fn name(&self) -> &'static str {
        match self {
            V3Contract::Factory => "UniswapV3Factory",
            V3Contract::SwapRouter => "SwapRouter",
            V3Contract::NftDescriptor => "NFTDescriptor",
            V3Contract::PositionDescriptor => "NonfungibleTokenPositionDescriptor",
            V3Contract::PositionManager => "NonfungiblePositionManager",
            V3Contract::Weth9 => "WETH9",
        }
    }

    /// Whether the contract is a library, compiled under `contracts/libraries`
    pub fn is_library(&self) -> bool {
        matches!(self, V3Contract::NftDescriptor)
    }

    /// The path of the contract's source file, relative to the project root
    pub fn source_path(&self) -> String {
        let file = format!("{}.{SOLIDITY_EXTENSION}", self.name());
        if self.is_library() {
            format!("{CONTRACTS_PATH_SEGMENT}/{LIBRARIES_PATH_SEGMENT}/{file}")
        } else {
            format!("{CONTRACTS_PATH_SEGMENT}/{file}")
        }
    }

    /// The path of the contract's Hardhat artifact under the given artifacts directory
    pub fn artifact_path(&self, artifacts_dir: &Path) -> PathBuf {
        artifacts_dir
            .join(self.source_path())
            .join(format!("{}.{ARTIFACT_EXTENSION}", self.name()))
    }
}

impl Display for V3Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::V3Contract;

    #[test]
    fn test_artifact_paths_follow_hardhat_layout() {
        let dir = Path::new("artifacts");
        assert_eq!(
            V3Contract::Factory.artifact_path(dir),
            Path::new("artifacts/contracts/UniswapV3Factory.sol/UniswapV3Factory.json")
        );
        assert_eq!(
            V3Contract::NftDescriptor.artifact_path(dir),
            Path::new("artifacts/contracts/libraries/NFTDescriptor.sol/NFTDescriptor.json")
        );
    }
}
