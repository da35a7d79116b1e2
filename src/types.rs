//! Plain data returned by the analyzer and swap executor.
//!
//! Nothing here is persisted. Every value is built per request and handed to the
//! presentation layer as-is.

use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};

/// ERC-20 metadata read from the token contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Raw on-chain state of a V2 pair, exactly as the pair reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairState {
    pub pair_address: Address,
    pub token0: Address,
    pub token1: Address,
    pub reserve0: U256,
    pub reserve1: U256,
    pub block_timestamp_last: u32,
    pub total_supply: U256,
}

/// Reserves re-mapped to (token, native) order with derived price metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReserveMetrics {
    pub token_is_token0: bool,
    pub token_reserve_raw: U256,
    pub native_reserve_raw: U256,
    /// Normalized with the token's own decimals.
    pub token_reserve: String,
    /// Normalized with 18 decimals.
    pub native_reserve: String,
    /// Native units per one whole token.
    pub price_in_native: f64,
    /// Rough heuristic: `native_reserve × 2 × unit price`. Not a market price.
    pub estimated_liquidity_usd: f64,
    /// LP token supply normalized with 18 decimals.
    pub total_lp_tokens: String,
    pub block_timestamp_last: u32,
}

/// Result of `analyze`: a complete snapshot of one token/native pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairInfo {
    pub chain: String,
    pub token_address: Address,
    pub token_name: String,
    pub token_symbol: String,
    pub token_decimals: u8,
    pub pair_address: Address,
    pub native_symbol: String,
    pub token_reserve: String,
    pub native_reserve: String,
    pub token_reserve_raw: U256,
    pub native_reserve_raw: U256,
    pub price_in_native: f64,
    pub estimated_liquidity_usd: f64,
    pub total_lp_tokens: String,
    pub block_timestamp_last: u32,
    pub token_explorer_url: String,
    pub pair_explorer_url: String,
}

/// A fully-determined swap, ready to be encoded and signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub chain: String,
    pub token_address: Address,
    pub path: Vec<Address>,
    pub amount_in: U256,
    pub quoted_amount_out: U256,
    pub min_amount_out: U256,
    /// Unix timestamp after which the router rejects the swap.
    pub deadline: u64,
    pub recipient: Address,
    pub gas_limit: u64,
}

/// A confirmed swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub transaction_hash: H256,
    pub explorer_url: String,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
    pub amount_in: U256,
    pub quoted_amount_out: U256,
    pub min_amount_out: U256,
    pub deadline: u64,
    pub recipient: Address,
}

/// Result of `test_chain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHealth {
    pub chain: String,
    pub network_id: u64,
    pub expected_chain_id: u64,
    pub factory_address: Address,
    pub factory_deployed: bool,
}

impl ChainHealth {
    pub fn chain_id_matches(&self) -> bool {
        self.network_id == self.expected_chain_id
    }
}
