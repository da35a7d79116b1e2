//! # Blockchain Access
//!
//! A thin, mockable interface to an EVM JSON-RPC endpoint.
//!
//! ## Core Responsibility
//!
//! This module only moves bytes: bytecode lookups, `eth_call`, chain id queries,
//! and signed transaction submission with receipt polling. It knows nothing about
//! pairs, prices or slippage; those live in the modules that call it.
//!
//! There are no retries and no client-side timeouts here. A failed call is
//! returned to the caller as-is.

use crate::chain_registry::ChainConfig;
use crate::errors::BlockchainError;
use async_trait::async_trait;
use dashmap::DashMap;
use ethers::{
    core::types::{Address, Bytes, TransactionReceipt, TransactionRequest, U256},
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

//================================================================================================//
//                                             TRAIT                                              //
//================================================================================================//

/// Read and write access to one chain. Implementations are shared across
/// concurrent requests and must not hold per-request state.
#[async_trait]
pub trait ChainClient: std::fmt::Debug + Send + Sync {
    fn chain_name(&self) -> &str;

    /// `eth_chainId` as reported by the endpoint.
    async fn get_chain_id(&self) -> Result<u64, BlockchainError>;

    /// `eth_getCode` at the latest block. Empty bytes mean no contract.
    async fn get_code(&self, address: Address) -> Result<Bytes, BlockchainError>;

    /// `eth_call` at the latest block.
    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, BlockchainError>;

    /// Signs `tx` with `wallet`, submits it and waits for `confirmations` blocks.
    async fn send_transaction(
        &self,
        wallet: &LocalWallet,
        tx: TransactionRequest,
        confirmations: usize,
    ) -> Result<TransactionReceipt, BlockchainError>;
}

/// Hands out a [`ChainClient`] for a configured chain.
pub trait ClientFactory: Send + Sync {
    fn connect(&self, chain_key: &str, chain: &ChainConfig) -> Result<Arc<dyn ChainClient>, BlockchainError>;
}

fn chain_id_to_u64(id: U256) -> Result<u64, BlockchainError> {
    u64::try_from(id).map_err(|_| BlockchainError::DataEncoding(format!("chain id {} does not fit in 64 bits", id)))
}

//================================================================================================//
//                                         IMPLEMENTATION                                         //
//================================================================================================//

/// [`ChainClient`] over an HTTP JSON-RPC provider.
pub struct RpcChainClient {
    chain_name: String,
    chain_id: u64,
    provider: Provider<Http>,
}

impl RpcChainClient {
    pub fn new(chain_name: &str, chain: &ChainConfig) -> Result<Self, BlockchainError> {
        let provider = Provider::<Http>::try_from(chain.rpc_url.as_str())
            .map_err(|e| BlockchainError::Provider(format!("invalid RPC URL '{}': {}", chain.rpc_url, e)))?;
        info!(target: "blockchain", chain = %chain_name, chain_id = chain.chain_id, "Initialized HTTP provider");
        Ok(Self {
            chain_name: chain_name.to_string(),
            chain_id: chain.chain_id,
            provider,
        })
    }
}

impl std::fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("chain_name", &self.chain_name)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    fn chain_name(&self) -> &str {
        &self.chain_name
    }

    #[instrument(skip(self), level = "debug", fields(chain=%self.chain_name))]
    async fn get_chain_id(&self) -> Result<u64, BlockchainError> {
        let id = self.provider.get_chainid().await?;
        chain_id_to_u64(id)
    }

    #[instrument(skip(self), level = "debug", fields(chain=%self.chain_name, ?address))]
    async fn get_code(&self, address: Address) -> Result<Bytes, BlockchainError> {
        self.provider
            .get_code(address, None)
            .await
            .map_err(BlockchainError::from)
    }

    #[instrument(skip(self, tx), level = "debug", fields(chain=%self.chain_name, to=?tx.to))]
    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, BlockchainError> {
        self.provider
            .call(&tx.clone().into(), None)
            .await
            .map_err(BlockchainError::from)
    }

    #[instrument(skip(self, wallet, tx), level = "info", fields(chain=%self.chain_name, to=?tx.to))]
    async fn send_transaction(
        &self,
        wallet: &LocalWallet,
        tx: TransactionRequest,
        confirmations: usize,
    ) -> Result<TransactionReceipt, BlockchainError> {
        let signer = SignerMiddleware::new(self.provider.clone(), wallet.clone().with_chain_id(self.chain_id));

        let pending = signer
            .send_transaction(tx, None)
            .await
            .map_err(|e| BlockchainError::SendTransaction(e.to_string()))?;
        let tx_hash = pending.tx_hash();
        info!(target: "blockchain", chain = %self.chain_name, ?tx_hash, confirmations, "Transaction sent, waiting for confirmation");

        let receipt = pending
            .confirmations(confirmations)
            .await
            .map_err(BlockchainError::from)?
            .ok_or(BlockchainError::TransactionDropped(tx_hash))?;
        debug!(target: "blockchain", ?tx_hash, block = ?receipt.block_number, "Receipt received");
        Ok(receipt)
    }
}

/// Production [`ClientFactory`]: one HTTP client per chain, created on first use
/// and shared by every later request for that chain.
#[derive(Default)]
pub struct HttpClientFactory {
    clients: DashMap<String, Arc<dyn ChainClient>>,
}

impl HttpClientFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientFactory for HttpClientFactory {
    fn connect(&self, chain_key: &str, chain: &ChainConfig) -> Result<Arc<dyn ChainClient>, BlockchainError> {
        if let Some(client) = self.clients.get(chain_key) {
            return Ok(client.value().clone());
        }
        let client: Arc<dyn ChainClient> = Arc::new(RpcChainClient::new(chain_key, chain)?);
        let client = self
            .clients
            .entry(chain_key.to_string())
            .or_insert(client)
            .value()
            .clone();
        Ok(client)
    }
}
