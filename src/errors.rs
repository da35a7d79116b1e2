//! # Centralized Error Handling
//!
//! Two layers of typed errors. `BlockchainError` describes what went wrong on the
//! wire (provider, ABI decoding, signing, submission). `EngineError` is what the
//! caller of the analyzer/swap operations sees: one variant per failure class,
//! each carrying the chain, the address involved and the step that failed, with
//! the transport cause attached as its `source`.

use ethers::types::{Address, H256};
use thiserror::Error;

/// Low-level failures talking to an EVM JSON-RPC endpoint.
#[derive(Error, Debug, Clone)]
pub enum BlockchainError {
    #[error("RPC provider error: {0}")]
    Provider(String),
    #[error("Data encoding/decoding error: {0}")]
    DataEncoding(String),
    #[error("Wallet error: {0}")]
    WalletError(String),
    #[error("Failed to send transaction: {0}")]
    SendTransaction(String),
    #[error("Transaction {0:?} was dropped before confirmation")]
    TransactionDropped(H256),
    #[error("Transaction {0:?} reverted on-chain")]
    Reverted(H256),
}

impl From<ethers::providers::ProviderError> for BlockchainError {
    fn from(e: ethers::providers::ProviderError) -> Self {
        BlockchainError::Provider(e.to_string())
    }
}

impl From<ethers::abi::AbiError> for BlockchainError {
    fn from(e: ethers::abi::AbiError) -> Self {
        BlockchainError::DataEncoding(e.to_string())
    }
}

/// Errors surfaced by the analyze, swap and chain-test operations.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unsupported chain: {chain}")]
    UnsupportedChain { chain: String },

    #[error("Invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("{label} contract not deployed or unreachable on {chain} at {address:?}")]
    ContractNotDeployed {
        chain: String,
        label: String,
        address: Address,
    },

    #[error("No liquidity pair exists on {chain} for token {token:?} with native token {native_wrapped:?}")]
    NoLiquidityPair {
        chain: String,
        token: Address,
        native_wrapped: Address,
    },

    #[error("Invalid token address or not an ERC20 token on {chain} at {token:?}: {source}")]
    InvalidToken {
        chain: String,
        token: Address,
        #[source]
        source: BlockchainError,
    },

    #[error("Degenerate pair {pair:?} on {chain}: {reason}")]
    DegeneratePair {
        chain: String,
        pair: Address,
        reason: String,
    },

    #[error("Invalid signing credential: {0}")]
    InvalidCredential(String),

    #[error("Quote failed on {chain} via router {router:?} for token {token:?}: {source}")]
    QuoteFailed {
        chain: String,
        router: Address,
        token: Address,
        #[source]
        source: BlockchainError,
    },

    #[error("Swap execution failed on {chain} during {step}: {source}")]
    SwapExecution {
        chain: String,
        step: String,
        #[source]
        source: BlockchainError,
    },

    #[error("Transport error on {chain} during {step}: {source}")]
    Transport {
        chain: String,
        step: String,
        #[source]
        source: BlockchainError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub(crate) fn transport(chain: &str, step: impl Into<String>, source: BlockchainError) -> Self {
        EngineError::Transport {
            chain: chain.to_string(),
            step: step.into(),
            source,
        }
    }

    pub(crate) fn swap_execution(chain: &str, step: impl Into<String>, source: BlockchainError) -> Self {
        EngineError::SwapExecution {
            chain: chain.to_string(),
            step: step.into(),
            source,
        }
    }
}
