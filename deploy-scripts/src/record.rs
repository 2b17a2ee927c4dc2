//! The record of a completed deployment, and its on-disk and printed forms

use std::{
    fmt::{self, Display},
    fs,
    path::Path,
};

use alloy::primitives::{utils::format_ether, Address, U256};
use serde::{Deserialize, Serialize};

use crate::{constants::SUMMARY_RULE_WIDTH, errors::DeployError, network::Network};

/// The addresses of every contract deployed in a run
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeployedContracts {
    /// The pool factory
    pub factory: Address,
    /// The swap router
    pub swap_router: Address,
    /// The NFT descriptor library
    pub nft_descriptor: Address,
    /// The position NFT descriptor
    pub position_descriptor: Address,
    /// The position NFT manager
    pub position_manager: Address,
    /// The WETH9 contract, deployed or pre-existing
    pub weth9: Address,
}

/// The deployments file contents
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRecord {
    /// The network deployed to
    #[serde(rename = "networkName")]
    pub network_name: String,
    /// The block number after the last deployment
    #[serde(rename = "blockNum")]
    pub block_num: u64,
    /// The native currency spent on the deployment, in ether
    #[serde(rename = "deployCost")]
    pub deploy_cost: String,
    /// The pool factory
    #[serde(rename = "UniswapV3Factory")]
    pub factory: Address,
    /// The swap router
    #[serde(rename = "SwapRouter")]
    pub swap_router: Address,
    /// The position NFT manager
    #[serde(rename = "NonfungiblePositionManager")]
    pub position_manager: Address,
    /// The position NFT descriptor
    #[serde(rename = "NonfungibleTokenPositionDescriptor")]
    pub position_descriptor: Address,
    /// The WETH9 contract
    #[serde(rename = "WETH9")]
    pub weth9: Address,
}

impl DeploymentRecord {
    /// Assemble the record of a deployment
    pub fn new(
        network: Network,
        block_num: u64,
        deploy_cost: U256,
        contracts: &DeployedContracts,
    ) -> Self {
        Self {
            network_name: network.to_string(),
            block_num,
            deploy_cost: format_ether(deploy_cost),
            factory: contracts.factory,
            swap_router: contracts.swap_router,
            position_manager: contracts.position_manager,
            position_descriptor: contracts.position_descriptor,
            weth9: contracts.weth9,
        }
    }

    /// Write the record as indented JSON, replacing any existing file
    pub fn write_to_file(&self, path: &Path) -> Result<(), DeployError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DeployError::WriteDeployments(e.to_string()))?;

        fs::write(path, json)
            .map_err(|e| DeployError::WriteDeployments(format!("{}: {e}", path.display())))
    }
}

/// A human readable summary of a deployment
pub struct DeploymentSummary<'a> {
    /// The record being summarized
    pub record: &'a DeploymentRecord,
    /// The deploying account
    pub deployer: Address,
}

impl Display for DeploymentSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let double_rule = "=".repeat(SUMMARY_RULE_WIDTH);
        let rule = "-".repeat(SUMMARY_RULE_WIDTH);
        let record = self.record;

        writeln!(f, "{double_rule}")?;
        writeln!(f, "Network:              {}", record.network_name)?;
        writeln!(f, "Deployer:             {}", self.deployer)?;
        writeln!(f, "Deploy cost:          {} ETH", record.deploy_cost)?;
        writeln!(f, "Deploy block number:  {}", record.block_num)?;
        writeln!(f)?;
        writeln!(f, "Contract addresses:")?;
        writeln!(f, "{double_rule}")?;
        for (name, address) in [
            ("UniswapV3Factory", record.factory),
            ("SwapRouter", record.swap_router),
            ("NonfungiblePositionManager", record.position_manager),
            (
                "NonfungibleTokenPositionDescriptor",
                record.position_descriptor,
            ),
            ("WETH9", record.weth9),
        ] {
            writeln!(f, "{name:<36}{address}")?;
            writeln!(f, "{rule}")?;
        }
        write!(f, "{double_rule}")
    }
}
