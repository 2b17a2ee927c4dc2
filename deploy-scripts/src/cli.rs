//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{compiler_settings, deploy},
    config::EnvVars,
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_NATIVE_CURRENCY_LABEL,
        DEFAULT_WETH9_ARTIFACT,
    },
    errors::DeployError,
    network::Network,
};

/// Deploy the Uniswap V3 periphery contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The available commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the factory, router, position descriptor and position manager
    Deploy(DeployArgs),
    /// Print the solc settings the contracts are compiled with
    CompilerSettings(CompilerSettingsArgs),
}

impl Command {
    /// Run the command against the given snapshot of the environment
    pub async fn run(self, env: &EnvVars) -> Result<(), DeployError> {
        match self {
            Command::Deploy(args) => deploy(args, env).await,
            Command::CompilerSettings(args) => compiler_settings(args),
        }
    }
}

/// Deploy the periphery contracts to a network.
///
/// Credentials and addresses are read from the environment (or a `.env` file),
/// as required by the chosen network.
#[derive(Args, Clone, Debug)]
pub struct DeployArgs {
    /// The network to deploy to
    #[arg(short, long, env = "NETWORK", value_enum)]
    pub network: Network,

    /// The directory holding the Hardhat compilation artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// The WETH9 artifact, deployed on networks without an existing WETH9
    #[arg(long, default_value = DEFAULT_WETH9_ARTIFACT)]
    pub weth9_artifact: PathBuf,

    /// The file the deployment record is written to
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub output: PathBuf,

    /// The native currency label passed to the position descriptor
    #[arg(long, default_value = DEFAULT_NATIVE_CURRENCY_LABEL)]
    pub token_label: String,
}

/// Print the solc settings of the project, or of a single source file
#[derive(Args, Clone, Debug)]
pub struct CompilerSettingsArgs {
    /// The source file to print settings for, e.g. `contracts/SwapRouter.sol`
    #[arg(short, long)]
    pub source: Option<String>,
}
