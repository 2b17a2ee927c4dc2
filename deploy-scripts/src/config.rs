//! Resolution of a network's deployment configuration from the environment.
//!
//! The environment is read once into an [`EnvVars`] snapshot and validated in
//! full before any connection is made, so a missing or malformed variable
//! never leaves a half-finished deployment on chain.

use std::{collections::HashMap, str::FromStr};

use alloy::{
    primitives::Address, signers::local::PrivateKeySigner, transports::http::reqwest::Url,
};

use crate::{
    errors::DeployError,
    network::{CredentialSource, Network, NetworkSpec, RpcEndpoint, WethStrategy},
};

/// A snapshot of environment variables
pub type EnvVars = HashMap<String, String>;

/// The resolved JSON-RPC endpoint of a deployment
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Spawn a fresh local node
    Ephemeral,
    /// Connect to the given url
    Http(Url),
}

/// The resolved signer of a deployment
#[derive(Clone, Debug)]
pub enum SignerSource {
    /// Use the first prefunded account of the ephemeral node
    DevAccount,
    /// Use the given key
    Key(PrivateKeySigner),
}

/// The resolved WETH9 contract of a deployment
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WethSource {
    /// Deploy a fresh WETH9
    Deploy,
    /// Use the WETH9 at the given address
    Existing(Address),
}

/// A validated deployment configuration
#[derive(Clone, Debug)]
pub struct DeployConfig {
    /// The target network
    pub network: Network,
    /// The JSON-RPC endpoint
    pub endpoint: Endpoint,
    /// The chain ID the endpoint must report, if fixed
    pub chain_id: Option<u64>,
    /// The deployer's signer
    pub signer: SignerSource,
    /// The WETH9 contract
    pub weth: WethSource,
    /// The block explorer API key, on networks with source verification
    pub explorer_api_key: Option<String>,
}

impl DeployConfig {
    /// Resolve and validate the configuration of `network` from `env`.
    ///
    /// Every variable the network requires is checked before any is parsed, and
    /// the first missing one is reported by name.
    pub fn resolve(network: Network, env: &EnvVars) -> Result<Self, DeployError> {
        let spec = network.spec();
        for var in spec.required_env_vars() {
            require(env, var)?;
        }

        Ok(Self {
            network,
            endpoint: resolve_endpoint(&spec, env)?,
            chain_id: spec.chain_id,
            signer: resolve_signer(&spec, env)?,
            weth: resolve_weth(&spec, env)?,
            explorer_api_key: spec
                .explorer_key_var
                .map(|var| require(env, var).map(str::to_string))
                .transpose()?,
        })
    }
}

/// Fetch a variable that must be set to a non-empty value
fn require<'a>(env: &'a EnvVars, var: &str) -> Result<&'a str, DeployError> {
    env.get(var)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DeployError::MissingEnvVar(var.to_string()))
}

/// Parse an address held in the given variable
fn parse_address(env: &EnvVars, var: &str) -> Result<Address, DeployError> {
    let value = require(env, var)?;
    Address::from_str(value)
        .map_err(|e| DeployError::InvalidConfig(format!("{var} is not a valid address: {e}")))
}

/// Build the JSON-RPC endpoint of the network
fn resolve_endpoint(spec: &NetworkSpec, env: &EnvVars) -> Result<Endpoint, DeployError> {
    let url = match spec.endpoint {
        RpcEndpoint::Ephemeral => return Ok(Endpoint::Ephemeral),
        RpcEndpoint::Fixed(url) => url.to_string(),
        RpcEndpoint::Keyed { base_url, key_var } => format!("{base_url}{}", require(env, key_var)?),
    };

    Url::parse(&url)
        .map(Endpoint::Http)
        .map_err(|e| DeployError::InvalidConfig(format!("invalid rpc url: {e}")))
}

/// Parse the deployer's key and check it against the configured wallet address
fn resolve_signer(spec: &NetworkSpec, env: &EnvVars) -> Result<SignerSource, DeployError> {
    let (wallet_var, private_key_var) = match spec.credentials {
        CredentialSource::DevAccount => return Ok(SignerSource::DevAccount),
        CredentialSource::Env {
            wallet_var,
            private_key_var,
        } => (wallet_var, private_key_var),
    };

    // The error from the key parser is not included, it may echo the key
    let signer = PrivateKeySigner::from_str(require(env, private_key_var)?).map_err(|_| {
        DeployError::InvalidConfig(format!("{private_key_var} is not a valid private key"))
    })?;

    let wallet = parse_address(env, wallet_var)?;
    if wallet != signer.address() {
        return Err(DeployError::InvalidConfig(format!(
            "{wallet_var} ({wallet}) does not match the address of {private_key_var} ({})",
            signer.address()
        )));
    }

    Ok(SignerSource::Key(signer))
}

/// Determine whether WETH9 is deployed or already exists
fn resolve_weth(spec: &NetworkSpec, env: &EnvVars) -> Result<WethSource, DeployError> {
    match spec.weth {
        WethStrategy::DeployFresh => Ok(WethSource::Deploy),
        WethStrategy::Existing { address_var } => {
            parse_address(env, address_var).map(WethSource::Existing)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::constants::{
        ALCHEMY_API_KEY_ENV_VAR, ANVIL_WALLET_ENV_VAR, ANVIL_WALLET_PRIVATE_KEY_ENV_VAR,
        ETHERSCAN_API_KEY_ENV_VAR, SEPOLIA_WALLET_ENV_VAR, SEPOLIA_WALLET_PRIVATE_KEY_ENV_VAR,
        WETH9_ADDRESS_ENV_VAR,
    };

    /// The first default Anvil account's private key
    pub(crate) const DEV_PKEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    /// The first default Anvil account's address
    pub(crate) const DEV_ADDR: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    /// The Sepolia WETH9 address
    const SEPOLIA_WETH9: &str = "0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14";

    /// A complete environment for every supported network
    pub(crate) fn full_env() -> EnvVars {
        [
            (ALCHEMY_API_KEY_ENV_VAR, "alchemy-key"),
            (ETHERSCAN_API_KEY_ENV_VAR, "etherscan-key"),
            (SEPOLIA_WALLET_ENV_VAR, DEV_ADDR),
            (SEPOLIA_WALLET_PRIVATE_KEY_ENV_VAR, DEV_PKEY),
            (ANVIL_WALLET_ENV_VAR, DEV_ADDR),
            (ANVIL_WALLET_PRIVATE_KEY_ENV_VAR, DEV_PKEY),
            (WETH9_ADDRESS_ENV_VAR, SEPOLIA_WETH9),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_resolve_sepolia() {
        let config = DeployConfig::resolve(Network::Sepolia, &full_env()).unwrap();

        assert_eq!(
            config.endpoint,
            Endpoint::Http(
                Url::parse("https://eth-sepolia.g.alchemy.com/v2/alchemy-key").unwrap()
            )
        );
        assert_eq!(
            config.weth,
            WethSource::Existing(Address::from_str(SEPOLIA_WETH9).unwrap())
        );
        assert_eq!(config.explorer_api_key.as_deref(), Some("etherscan-key"));
        match config.signer {
            SignerSource::Key(signer) => {
                assert_eq!(signer.address(), Address::from_str(DEV_ADDR).unwrap())
            }
            SignerSource::DevAccount => panic!("expected a private key signer"),
        }
    }

    #[test]
    fn test_resolve_anvil() {
        let config = DeployConfig::resolve(Network::Anvil, &full_env()).unwrap();
        assert_eq!(
            config.endpoint,
            Endpoint::Http(Url::parse("http://127.0.0.1:8545").unwrap())
        );
        assert_eq!(config.chain_id, Some(1337));
        assert_eq!(config.weth, WethSource::Deploy);
        assert!(config.explorer_api_key.is_none());
    }

    #[test]
    fn test_resolve_hardhat_needs_no_env() {
        let config = DeployConfig::resolve(Network::Hardhat, &EnvVars::new()).unwrap();
        assert_eq!(config.endpoint, Endpoint::Ephemeral);
        assert!(matches!(config.signer, SignerSource::DevAccount));
        assert_eq!(config.weth, WethSource::Deploy);
    }

    #[test]
    fn test_each_missing_var_is_reported() {
        for network in [Network::Anvil, Network::Sepolia] {
            for var in network.spec().required_env_vars() {
                let mut env = full_env();
                env.remove(var);

                match DeployConfig::resolve(network, &env) {
                    Err(DeployError::MissingEnvVar(missing)) => assert_eq!(missing, var),
                    other => panic!("expected {var} to be reported missing, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn test_empty_var_is_missing() {
        let mut env = full_env();
        env.insert(ANVIL_WALLET_PRIVATE_KEY_ENV_VAR.to_string(), "  ".to_string());
        assert!(matches!(
            DeployConfig::resolve(Network::Anvil, &env),
            Err(DeployError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_mismatched_wallet_rejected() {
        let mut env = full_env();
        env.insert(
            ANVIL_WALLET_ENV_VAR.to_string(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string(),
        );
        assert!(matches!(
            DeployConfig::resolve(Network::Anvil, &env),
            Err(DeployError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_weth_address_rejected() {
        let mut env = full_env();
        env.insert(WETH9_ADDRESS_ENV_VAR.to_string(), "0x1234".to_string());
        assert!(matches!(
            DeployConfig::resolve(Network::Sepolia, &env),
            Err(DeployError::InvalidConfig(_))
        ));
    }
}
