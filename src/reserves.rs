//! # Reserve & Price Calculator
//!
//! Reads a V2 pair's positional state and turns it into token/native figures.
//!
//! The pair reports `(reserve0, reserve1)` in its own token order. Which side is
//! "the token" is decided only by comparing `token0` with the queried address;
//! `Address` equality is byte-wise, so the hex casing of user input or of the
//! RPC response plays no part.

use crate::blockchain::ChainClient;
use crate::contracts::{call_view, V2_PAIR};
use crate::errors::{BlockchainError, EngineError};
use crate::types::{PairState, ReserveMetrics};
use crate::units::{format_amount, to_display_f64, MAX_TOKEN_DECIMALS, NATIVE_DECIMALS};
use ethers::types::{Address, U256};
use tracing::{debug, instrument};

/// Reads token0, token1, reserves and LP supply concurrently. The first failing
/// read aborts the whole group.
#[instrument(skip(client), level = "debug", fields(chain = %client.chain_name()))]
pub async fn read_pair_state(client: &dyn ChainClient, pair: Address) -> Result<PairState, EngineError> {
    let chain = client.chain_name();
    let step = |function: &str| format!("{}() on pair {:?}", function, pair);

    let (token0, token1, reserves, total_supply) = tokio::try_join!(
        async {
            call_view::<Address, _>(client, &V2_PAIR, pair, "token0", ())
                .await
                .map_err(|e| EngineError::transport(chain, step("token0"), e))
        },
        async {
            call_view::<Address, _>(client, &V2_PAIR, pair, "token1", ())
                .await
                .map_err(|e| EngineError::transport(chain, step("token1"), e))
        },
        async {
            call_view::<(U256, U256, u32), _>(client, &V2_PAIR, pair, "getReserves", ())
                .await
                .map_err(|e| EngineError::transport(chain, step("getReserves"), e))
        },
        async {
            call_view::<U256, _>(client, &V2_PAIR, pair, "totalSupply", ())
                .await
                .map_err(|e| EngineError::transport(chain, step("totalSupply"), e))
        },
    )?;
    let (reserve0, reserve1, block_timestamp_last) = reserves;

    debug!(target: "reserves", %chain, ?pair, ?token0, ?token1, %reserve0, %reserve1, %total_supply, "Pair data retrieved");
    Ok(PairState {
        pair_address: pair,
        token0,
        token1,
        reserve0,
        reserve1,
        block_timestamp_last,
        total_supply,
    })
}

/// Maps positional reserves to `(token_reserve, native_reserve, token_is_token0)`.
pub fn assign_reserves(state: &PairState, token: Address) -> (U256, U256, bool) {
    let is_token0 = state.token0 == token;
    if is_token0 {
        (state.reserve0, state.reserve1, true)
    } else {
        (state.reserve1, state.reserve0, false)
    }
}

/// Normalizes the pair state and derives price and the liquidity estimate.
///
/// `unit_price_usd` is a fixed assumption for the native asset, not a feed.
pub fn compute_metrics(
    chain: &str,
    state: &PairState,
    token: Address,
    token_decimals: u8,
    unit_price_usd: f64,
) -> Result<ReserveMetrics, EngineError> {
    if token_decimals > MAX_TOKEN_DECIMALS {
        return Err(EngineError::InvalidToken {
            chain: chain.to_string(),
            token,
            source: BlockchainError::DataEncoding(format!(
                "token reports {} decimals, at most {} are supported",
                token_decimals, MAX_TOKEN_DECIMALS
            )),
        });
    }
    if state.token0 != token && state.token1 != token {
        return Err(EngineError::DegeneratePair {
            chain: chain.to_string(),
            pair: state.pair_address,
            reason: format!(
                "pair holds {:?}/{:?}, not token {:?}",
                state.token0, state.token1, token
            ),
        });
    }

    let (token_raw, native_raw, token_is_token0) = assign_reserves(state, token);
    if token_raw.is_zero() {
        return Err(EngineError::DegeneratePair {
            chain: chain.to_string(),
            pair: state.pair_address,
            reason: "token reserve is zero, price is undefined".to_string(),
        });
    }

    let formatting = |e: BlockchainError| EngineError::transport(chain, format!("normalizing reserves of pair {:?}", state.pair_address), e);
    let token_reserve = format_amount(token_raw, u32::from(token_decimals)).map_err(&formatting)?;
    let native_reserve = format_amount(native_raw, NATIVE_DECIMALS).map_err(&formatting)?;
    let total_lp_tokens = format_amount(state.total_supply, NATIVE_DECIMALS).map_err(&formatting)?;

    let token_value = to_display_f64(&token_reserve).map_err(&formatting)?;
    let native_value = to_display_f64(&native_reserve).map_err(&formatting)?;
    if token_value == 0.0 {
        return Err(EngineError::DegeneratePair {
            chain: chain.to_string(),
            pair: state.pair_address,
            reason: "token reserve rounds to zero, price is undefined".to_string(),
        });
    }

    let price_in_native = native_value / token_value;
    let estimated_liquidity_usd = native_value * 2.0 * unit_price_usd;

    Ok(ReserveMetrics {
        token_is_token0,
        token_reserve_raw: token_raw,
        native_reserve_raw: native_raw,
        token_reserve,
        native_reserve,
        price_in_native,
        estimated_liquidity_usd,
        total_lp_tokens,
        block_timestamp_last: state.block_timestamp_last,
    })
}

/// Reads the pair and computes its metrics in one step.
pub async fn compute_pair_info(
    client: &dyn ChainClient,
    pair: Address,
    token: Address,
    token_decimals: u8,
    unit_price_usd: f64,
) -> Result<ReserveMetrics, EngineError> {
    let state = read_pair_state(client, pair).await?;
    compute_metrics(client.chain_name(), &state, token, token_decimals, unit_price_usd)
}
