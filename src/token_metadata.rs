//! ERC-20 metadata reads.

use crate::blockchain::ChainClient;
use crate::contracts::{call_view, ERC20_METADATA};
use crate::errors::{BlockchainError, EngineError};
use crate::types::TokenMetadata;
use crate::units::MAX_TOKEN_DECIMALS;
use ethers::types::Address;
use tracing::debug;

/// Reads `name`, `symbol` and `decimals` concurrently. Any failing read, or an
/// empty name/symbol, makes the token invalid.
pub async fn fetch_metadata(client: &dyn ChainClient, token: Address) -> Result<TokenMetadata, EngineError> {
    let chain = client.chain_name();
    let invalid = |source: BlockchainError| EngineError::InvalidToken {
        chain: chain.to_string(),
        token,
        source,
    };

    let (name, symbol, decimals) = tokio::try_join!(
        call_view::<String, _>(client, &ERC20_METADATA, token, "name", ()),
        call_view::<String, _>(client, &ERC20_METADATA, token, "symbol", ()),
        call_view::<u8, _>(client, &ERC20_METADATA, token, "decimals", ()),
    )
    .map_err(&invalid)?;

    if symbol.trim().is_empty() {
        return Err(invalid(BlockchainError::DataEncoding("token returned an empty symbol".to_string())));
    }
    if name.trim().is_empty() {
        return Err(invalid(BlockchainError::DataEncoding("token returned an empty name".to_string())));
    }
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(invalid(BlockchainError::DataEncoding(format!(
            "token reports {} decimals, at most {} are supported",
            decimals, MAX_TOKEN_DECIMALS
        ))));
    }

    debug!(target: "token_metadata", %chain, ?token, %name, %symbol, decimals, "Token information retrieved");
    Ok(TokenMetadata { name, symbol, decimals })
}
