//! Pair discovery through the V2 factory.

use crate::blockchain::ChainClient;
use crate::contracts::{call_view, V2_FACTORY};
use crate::errors::EngineError;
use ethers::types::Address;
use tracing::{debug, info};

/// Looks up the pair for `(token, native_wrapped)` via `factory.getPair`.
///
/// Arguments are passed in that order; the factory sorts them internally. A zero
/// address from the factory means the pair was never created.
pub async fn find_pair(
    client: &dyn ChainClient,
    factory: Address,
    token: Address,
    native_wrapped: Address,
) -> Result<Address, EngineError> {
    let chain = client.chain_name();
    debug!(target: "pair_resolver", %chain, ?factory, ?token, ?native_wrapped, "Getting pair address");

    let pair: Address = call_view(client, &V2_FACTORY, factory, "getPair", (token, native_wrapped))
        .await
        .map_err(|e| EngineError::transport(chain, format!("getPair on factory {:?}", factory), e))?;

    if pair.is_zero() {
        info!(target: "pair_resolver", %chain, ?token, "No liquidity pair");
        return Err(EngineError::NoLiquidityPair {
            chain: chain.to_string(),
            token,
            native_wrapped,
        });
    }

    debug!(target: "pair_resolver", %chain, ?pair, "Pair address retrieved");
    Ok(pair)
}
