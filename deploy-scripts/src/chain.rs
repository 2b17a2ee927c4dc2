//! The on-chain operations a deployment needs, and their JSON-RPC implementation

use alloy::{
    network::TransactionBuilder,
    node_bindings::{Anvil, AnvilInstance},
    primitives::{Address, Bytes, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    config::{DeployConfig, Endpoint, SignerSource},
    constants::NUM_DEPLOY_CONFIRMATIONS,
    errors::DeployError,
    types::V3Contract,
};

/// A chain that contracts can be deployed to by a single deployer account
#[async_trait]
pub trait Chain: Send + Sync {
    /// The address of the deploying account
    fn deployer(&self) -> Address;

    /// The chain ID reported by the node
    async fn chain_id(&self) -> Result<u64, DeployError>;

    /// The native balance of `address` at the latest block
    async fn balance(&self, address: Address) -> Result<U256, DeployError>;

    /// The latest block number
    async fn block_number(&self) -> Result<u64, DeployError>;

    /// Submit a contract creation transaction with the given init code and
    /// wait for it to be confirmed, returning the new contract's address
    async fn deploy(&self, contract: V3Contract, init_code: Bytes)
        -> Result<Address, DeployError>;
}

/// A [`Chain`] reached over JSON-RPC, signing with a local key
pub struct RpcChain {
    /// The signing provider
    provider: DynProvider,
    /// The address of the signer attached to the provider
    deployer: Address,
    /// The ephemeral node backing the provider, killed when dropped
    _node: Option<AnvilInstance>,
}

impl RpcChain {
    /// Connect to the endpoint of `config`, spawning a local node if the
    /// endpoint is ephemeral
    pub async fn connect(config: &DeployConfig) -> Result<Self, DeployError> {
        let (url, node) = match &config.endpoint {
            Endpoint::Ephemeral => {
                let node = Anvil::new()
                    .try_spawn()
                    .map_err(|e| DeployError::ClientInitialization(e.to_string()))?;
                info!("Spawned ephemeral node at {}", node.endpoint());
                (node.endpoint_url(), Some(node))
            }
            Endpoint::Http(url) => (url.clone(), None),
        };

        let signer = match (&config.signer, &node) {
            (SignerSource::Key(signer), _) => signer.clone(),
            (SignerSource::DevAccount, Some(node)) => node
                .keys()
                .first()
                .cloned()
                .map(PrivateKeySigner::from)
                .ok_or_else(|| {
                    DeployError::ClientInitialization("node has no dev accounts".to_string())
                })?,
            (SignerSource::DevAccount, None) => {
                return Err(DeployError::ClientInitialization(
                    "dev accounts are only available on an ephemeral node".to_string(),
                ))
            }
        };

        let deployer = signer.address();
        let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

        Ok(Self {
            provider: DynProvider::new(provider),
            deployer,
            _node: node,
        })
    }
}

#[async_trait]
impl Chain for RpcChain {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn chain_id(&self) -> Result<u64, DeployError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| DeployError::ClientInitialization(e.to_string()))
    }

    async fn balance(&self, address: Address) -> Result<U256, DeployError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| DeployError::ContractInteraction(e.to_string()))
    }

    async fn block_number(&self) -> Result<u64, DeployError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| DeployError::ContractInteraction(e.to_string()))
    }

    async fn deploy(
        &self,
        contract: V3Contract,
        init_code: Bytes,
    ) -> Result<Address, DeployError> {
        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_deploy_code(init_code);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| DeployError::ContractDeployment(format!("{contract}: {e}")))?;
        debug!("{contract} deployment submitted in tx {:#x}", pending.tx_hash());

        let receipt = pending
            .with_required_confirmations(NUM_DEPLOY_CONFIRMATIONS)
            .get_receipt()
            .await
            .map_err(|e| DeployError::ContractDeployment(format!("{contract}: {e}")))?;

        if !receipt.status() {
            return Err(DeployError::ContractDeployment(format!(
                "{contract}: transaction {:#x} reverted",
                receipt.transaction_hash
            )));
        }

        receipt.contract_address.ok_or_else(|| {
            DeployError::ContractDeployment(format!(
                "{contract}: receipt for {:#x} has no contract address",
                receipt.transaction_hash
            ))
        })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! An in-memory [`Chain`] with deterministic addresses and costs

    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use super::*;

    /// The mutable state of a [`MockChain`]
    struct MockState {
        /// The deployer's next nonce
        nonce: u64,
        /// The deployer's balance
        balance: U256,
        /// The latest block number, one block per deployment
        block_number: u64,
        /// Every deployment so far, in order
        deployments: Vec<(V3Contract, Bytes)>,
    }

    /// A chain that charges a fixed cost per deployment and derives contract
    /// addresses from the deployer's nonce, like `CREATE`
    pub(crate) struct MockChain {
        /// The deploying account
        deployer: Address,
        /// The chain ID reported by the chain
        chain_id: u64,
        /// The balance charged per deployment
        deploy_cost: U256,
        /// The contract whose deployment fails, if any
        fail_on: Option<V3Contract>,
        /// The number of chain calls made
        calls: AtomicUsize,
        /// The chain state
        state: Mutex<MockState>,
    }

    impl MockChain {
        /// A chain with the given deployer balance and per-deployment cost
        pub(crate) fn new(deployer: Address, balance: U256, deploy_cost: U256) -> Self {
            Self {
                deployer,
                chain_id: 31337,
                deploy_cost,
                fail_on: None,
                calls: AtomicUsize::new(0),
                state: Mutex::new(MockState {
                    nonce: 0,
                    balance,
                    block_number: 0,
                    deployments: Vec::new(),
                }),
            }
        }

        /// Report the given chain ID
        pub(crate) fn with_chain_id(mut self, chain_id: u64) -> Self {
            self.chain_id = chain_id;
            self
        }

        /// Reject the deployment of the given contract
        pub(crate) fn failing_on(mut self, contract: V3Contract) -> Self {
            self.fail_on = Some(contract);
            self
        }

        /// The number of chain calls made so far
        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// The contracts deployed so far, with their init code
        pub(crate) fn deployments(&self) -> Vec<(V3Contract, Bytes)> {
            self.state.lock().unwrap().deployments.clone()
        }

        /// The deployer's current balance
        pub(crate) fn current_balance(&self) -> U256 {
            self.state.lock().unwrap().balance
        }

        /// Count a chain call
        fn record_call(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Chain for MockChain {
        fn deployer(&self) -> Address {
            self.deployer
        }

        async fn chain_id(&self) -> Result<u64, DeployError> {
            self.record_call();
            Ok(self.chain_id)
        }

        async fn balance(&self, address: Address) -> Result<U256, DeployError> {
            self.record_call();
            let state = self.state.lock().unwrap();
            Ok(if address == self.deployer {
                state.balance
            } else {
                U256::ZERO
            })
        }

        async fn block_number(&self) -> Result<u64, DeployError> {
            self.record_call();
            Ok(self.state.lock().unwrap().block_number)
        }

        async fn deploy(
            &self,
            contract: V3Contract,
            init_code: Bytes,
        ) -> Result<Address, DeployError> {
            self.record_call();
            if self.fail_on == Some(contract) {
                return Err(DeployError::ContractDeployment(format!(
                    "{contract}: insufficient funds"
                )));
            }

            let mut state = self.state.lock().unwrap();
            let address = self.deployer.create(state.nonce);
            state.nonce += 1;
            state.block_number += 1;
            state.balance -= self.deploy_cost;
            state.deployments.push((contract, init_code));
            Ok(address)
        }
    }
}
