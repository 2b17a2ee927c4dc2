//! Implementations of the deploy scripts

use std::{collections::HashMap, future::Future};

use alloy::{
    primitives::{Address, Bytes, B256},
    sol_types::SolConstructor,
};
use tracing::info;

use crate::{
    artifacts::V3Artifacts,
    chain::{Chain, RpcChain},
    cli::{CompilerSettingsArgs, DeployArgs},
    compiler::SolidityConfig,
    config::{DeployConfig, EnvVars, WethSource},
    errors::DeployError,
    linker::{link_libraries, Libraries},
    record::{DeployedContracts, DeploymentRecord, DeploymentSummary},
    solidity::{NonfungiblePositionManager, NonfungibleTokenPositionDescriptor, SwapRouter},
    types::V3Contract,
    utils::{deploy_cost, encode_bytes32_string},
};

/// Deploy the periphery contracts to the network named in `args`
pub async fn deploy(args: DeployArgs, env: &EnvVars) -> Result<(), DeployError> {
    deploy_with(args, env, |config| async move { RpcChain::connect(&config).await }).await?;
    Ok(())
}

/// Deploy the periphery contracts, connecting to the chain with `connect`.
///
/// The configuration and artifacts are fully validated before `connect` is
/// called, so nothing touches the network when either is invalid.
pub async fn deploy_with<C, F, Fut>(
    args: DeployArgs,
    env: &EnvVars,
    connect: F,
) -> Result<DeploymentRecord, DeployError>
where
    C: Chain,
    F: FnOnce(DeployConfig) -> Fut,
    Fut: Future<Output = Result<C, DeployError>>,
{
    let config = DeployConfig::resolve(args.network, env)?;
    let label = encode_bytes32_string(&args.token_label)?;

    let weth9_artifact = match config.weth {
        WethSource::Deploy => Some(args.weth9_artifact.as_path()),
        WethSource::Existing(_) => None,
    };
    let artifacts = V3Artifacts::load(&args.artifacts_dir, weth9_artifact)?;
    artifacts.check_code_sizes()?;

    let chain = connect(config.clone()).await?;
    let record = run_deployment(&chain, &artifacts, &config, label).await?;

    record.write_to_file(&args.output)?;
    info!("Deployment record written to {}", args.output.display());
    println!(
        "{}",
        DeploymentSummary {
            record: &record,
            deployer: chain.deployer(),
        }
    );

    Ok(record)
}

/// Deploy every contract and assemble the record of the deployment
pub async fn run_deployment(
    chain: &impl Chain,
    artifacts: &V3Artifacts,
    config: &DeployConfig,
    native_currency_label: B256,
) -> Result<DeploymentRecord, DeployError> {
    if let Some(expected) = config.chain_id {
        let actual = chain.chain_id().await?;
        if actual != expected {
            return Err(DeployError::InvalidConfig(format!(
                "{} expects chain ID {expected}, but the node reports {actual}",
                config.network
            )));
        }
    }

    let deployer = chain.deployer();
    let start_balance = chain.balance(deployer).await?;

    let contracts = deploy_contracts(chain, artifacts, config.weth, native_currency_label).await?;

    let end_balance = chain.balance(deployer).await?;
    let block_num = chain.block_number().await?;

    Ok(DeploymentRecord::new(
        config.network,
        block_num,
        deploy_cost(start_balance, end_balance),
        &contracts,
    ))
}

/// Deploy the contracts in dependency order, each one confirmed before the next
pub async fn deploy_contracts(
    chain: &impl Chain,
    artifacts: &V3Artifacts,
    weth: WethSource,
    native_currency_label: B256,
) -> Result<DeployedContracts, DeployError> {
    let no_libraries = Libraries::new();

    let weth9 = match weth {
        WethSource::Deploy => {
            deploy_contract(chain, artifacts, V3Contract::Weth9, &no_libraries, vec![]).await?
        }
        WethSource::Existing(address) => {
            info!("Using existing WETH9 at {address}");
            address
        }
    };

    let factory =
        deploy_contract(chain, artifacts, V3Contract::Factory, &no_libraries, vec![]).await?;

    let swap_router_args = SwapRouter::constructorCall { factory, weth9 }.abi_encode();
    let swap_router = deploy_contract(
        chain,
        artifacts,
        V3Contract::SwapRouter,
        &no_libraries,
        swap_router_args,
    )
    .await?;

    // The descriptor library must be on chain before the position descriptor
    // can be linked against it
    let nft_descriptor = deploy_contract(
        chain,
        artifacts,
        V3Contract::NftDescriptor,
        &no_libraries,
        vec![],
    )
    .await?;
    let libraries = HashMap::from([(V3Contract::NftDescriptor.name().to_string(), nft_descriptor)]);

    let position_descriptor_args = NonfungibleTokenPositionDescriptor::constructorCall {
        weth9,
        native_currency_label_bytes: native_currency_label,
    }
    .abi_encode();
    let position_descriptor = deploy_contract(
        chain,
        artifacts,
        V3Contract::PositionDescriptor,
        &libraries,
        position_descriptor_args,
    )
    .await?;

    let position_manager_args = NonfungiblePositionManager::constructorCall {
        factory,
        weth9,
        token_descriptor: position_descriptor,
    }
    .abi_encode();
    let position_manager = deploy_contract(
        chain,
        artifacts,
        V3Contract::PositionManager,
        &no_libraries,
        position_manager_args,
    )
    .await?;

    Ok(DeployedContracts {
        factory,
        swap_router,
        nft_descriptor,
        position_descriptor,
        position_manager,
        weth9,
    })
}

/// Link a contract's bytecode, append its encoded constructor arguments, and
/// deploy it
async fn deploy_contract(
    chain: &impl Chain,
    artifacts: &V3Artifacts,
    contract: V3Contract,
    libraries: &Libraries,
    constructor_args: Vec<u8>,
) -> Result<Address, DeployError> {
    info!("Deploying {contract} with the account: {}", chain.deployer());

    let unlinked = artifacts.get(contract)?.unlinked_bytecode()?;
    let mut init_code = link_libraries(&unlinked, libraries)?.to_vec();
    init_code.extend(constructor_args);

    let address = chain.deploy(contract, Bytes::from(init_code)).await?;
    info!("{contract} address: {address}");

    Ok(address)
}

/// Print the solc settings of the project, or of the given source file
pub fn compiler_settings(args: CompilerSettingsArgs) -> Result<(), DeployError> {
    let config = SolidityConfig::uniswap_v3();
    let json = match args.source {
        Some(source) => serde_json::to_string_pretty(config.profile_for(&source)),
        None => serde_json::to_string_pretty(&config),
    }
    .map_err(|e| DeployError::InvalidConfig(e.to_string()))?;

    println!("{json}");
    Ok(())
}
