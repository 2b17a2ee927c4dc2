//! The networks the contracts can be deployed to

use std::fmt::{self, Display};

use clap::ValueEnum;

use crate::constants::{
    ALCHEMY_API_KEY_ENV_VAR, ANVIL_CHAIN_ID, ANVIL_RPC_URL, ANVIL_WALLET_ENV_VAR,
    ANVIL_WALLET_PRIVATE_KEY_ENV_VAR, ETHERSCAN_API_KEY_ENV_VAR, SEPOLIA_ALCHEMY_RPC_BASE_URL,
    SEPOLIA_CHAIN_ID, SEPOLIA_WALLET_ENV_VAR, SEPOLIA_WALLET_PRIVATE_KEY_ENV_VAR,
    WETH9_ADDRESS_ENV_VAR,
};

/// A supported deployment target
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    /// An ephemeral local node, spawned for the run and torn down afterwards
    Hardhat,
    /// A persistent local Anvil node
    Anvil,
    /// The Sepolia public test network
    Sepolia,
}

/// How to reach a network's JSON-RPC endpoint
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RpcEndpoint {
    /// Spawn a fresh local node for the duration of the run
    Ephemeral,
    /// A fixed url
    Fixed(&'static str),
    /// A provider url with an API key appended
    Keyed {
        /// The url the key is appended to
        base_url: &'static str,
        /// The variable holding the API key
        key_var: &'static str,
    },
}

/// Where the deployer's signing key comes from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    /// The first prefunded account of the ephemeral node
    DevAccount,
    /// A private key, and the address it must correspond to, in the environment
    Env {
        /// The variable holding the deployer's address
        wallet_var: &'static str,
        /// The variable holding the deployer's private key
        private_key_var: &'static str,
    },
}

/// How the WETH9 contract referenced by the periphery is obtained
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WethStrategy {
    /// Deploy a fresh WETH9 before the other contracts
    DeployFresh,
    /// Use an existing WETH9 whose address is in the environment
    Existing {
        /// The variable holding the WETH9 address
        address_var: &'static str,
    },
}

/// Everything needed to deploy to a network, short of the secrets themselves
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NetworkSpec {
    /// The JSON-RPC endpoint
    pub endpoint: RpcEndpoint,
    /// The chain ID the endpoint must report, if fixed
    pub chain_id: Option<u64>,
    /// The deployer's credentials
    pub credentials: CredentialSource,
    /// How WETH9 is resolved
    pub weth: WethStrategy,
    /// The block explorer API key variable, for networks with source verification
    pub explorer_key_var: Option<&'static str>,
}

impl NetworkSpec {
    /// The names of every environment variable the network requires
    pub fn required_env_vars(&self) -> Vec<&'static str> {
        let mut vars = Vec::new();
        if let RpcEndpoint::Keyed { key_var, .. } = self.endpoint {
            vars.push(key_var);
        }
        if let Some(var) = self.explorer_key_var {
            vars.push(var);
        }
        if let CredentialSource::Env {
            wallet_var,
            private_key_var,
        } = self.credentials
        {
            vars.push(wallet_var);
            vars.push(private_key_var);
        }
        if let WethStrategy::Existing { address_var } = self.weth {
            vars.push(address_var);
        }

        vars
    }
}

impl Network {
    /// The deployment parameters of the network
    pub fn spec(&self) -> NetworkSpec {
        match self {
            Network::Hardhat => NetworkSpec {
                endpoint: RpcEndpoint::Ephemeral,
                chain_id: None,
                credentials: CredentialSource::DevAccount,
                weth: WethStrategy::DeployFresh,
                explorer_key_var: None,
            },
            Network::Anvil => NetworkSpec {
                endpoint: RpcEndpoint::Fixed(ANVIL_RPC_URL),
                chain_id: Some(ANVIL_CHAIN_ID),
                credentials: CredentialSource::Env {
                    wallet_var: ANVIL_WALLET_ENV_VAR,
                    private_key_var: ANVIL_WALLET_PRIVATE_KEY_ENV_VAR,
                },
                weth: WethStrategy::DeployFresh,
                explorer_key_var: None,
            },
            Network::Sepolia => NetworkSpec {
                endpoint: RpcEndpoint::Keyed {
                    base_url: SEPOLIA_ALCHEMY_RPC_BASE_URL,
                    key_var: ALCHEMY_API_KEY_ENV_VAR,
                },
                chain_id: Some(SEPOLIA_CHAIN_ID),
                credentials: CredentialSource::Env {
                    wallet_var: SEPOLIA_WALLET_ENV_VAR,
                    private_key_var: SEPOLIA_WALLET_PRIVATE_KEY_ENV_VAR,
                },
                weth: WethStrategy::Existing {
                    address_var: WETH9_ADDRESS_ENV_VAR,
                },
                explorer_key_var: Some(ETHERSCAN_API_KEY_ENV_VAR),
            },
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Hardhat => write!(f, "hardhat"),
            Network::Anvil => write!(f, "anvil"),
            Network::Sepolia => write!(f, "sepolia"),
        }
    }
}
