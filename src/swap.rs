//! # Swap Executor
//!
//! Native → token swaps through a V2 router (`swapExactETHForTokens`).
//!
//! Validation of the amount, the token address and the signing key happens
//! before the first RPC request. After that the flow is: quote with
//! `getAmountsOut`, cut the quote by the slippage tolerance in integer
//! arithmetic, stamp an absolute deadline, submit with a fixed gas limit and
//! wait for the receipt. A reverted receipt is an error, so a returned
//! [`SwapOutcome`] always refers to a confirmed, successful transaction.

use crate::blockchain::ChainClient;
use crate::chain_registry::ChainConfig;
use crate::config::EngineSettings;
use crate::contracts::{call_view, encode_call, V2_ROUTER};
use crate::errors::{BlockchainError, EngineError};
use crate::secrets::{SecretKey, SigningCredential};
use crate::types::{SwapOutcome, SwapRequest};
use crate::units::{apply_slippage, parse_address, parse_native_amount};
use ethers::types::{Address, TransactionRequest, U256, U64};
use tracing::{debug, error, info, instrument};

/// Builds, submits and confirms slippage-bounded swaps. Holds no per-request
/// state; one executor serves every concurrent swap.
#[derive(Debug, Clone)]
pub struct SwapExecutor {
    settings: EngineSettings,
}

impl SwapExecutor {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Swaps `native_amount_in` of the chain's native asset for `token_address`,
    /// sending the tokens to the signer's own address.
    #[instrument(skip(self, client, chain, credential), level = "info", fields(chain = %client.chain_name()))]
    pub async fn execute_swap(
        &self,
        client: &dyn ChainClient,
        chain: &ChainConfig,
        credential: &SecretKey,
        token_address: &str,
        native_amount_in: &str,
    ) -> Result<SwapOutcome, EngineError> {
        let credential = SigningCredential::parse(credential)?;
        let amount_in = parse_native_amount(native_amount_in)?;
        let token = parse_address(token_address)?;
        let recipient = credential.address();
        info!(target: "swap", chain = %client.chain_name(), ?token, %amount_in, ?recipient, "Starting swap");

        let quoted = self.quote(client, chain, token, amount_in).await?;
        let request = self.build_request(client.chain_name(), chain, token, amount_in, quoted, recipient, chrono::Utc::now().timestamp())?;
        debug!(target: "swap", min_amount_out = %request.min_amount_out, deadline = request.deadline, "Transaction parameters");

        let tx = self.build_transaction(chain, &request)?;
        let receipt = client
            .send_transaction(credential.wallet(), tx, self.settings.confirmations)
            .await
            .map_err(|e| {
                error!(target: "swap", chain = %client.chain_name(), ?token, error = %e, "Swap submission failed");
                EngineError::swap_execution(client.chain_name(), "submission", e)
            })?;

        if receipt.status == Some(U64::zero()) {
            error!(target: "swap", tx_hash = ?receipt.transaction_hash, "Swap reverted");
            return Err(EngineError::swap_execution(
                client.chain_name(),
                "confirmation",
                BlockchainError::Reverted(receipt.transaction_hash),
            ));
        }

        info!(target: "swap", tx_hash = ?receipt.transaction_hash, block = ?receipt.block_number, "Swap confirmed");
        Ok(SwapOutcome {
            transaction_hash: receipt.transaction_hash,
            explorer_url: chain.tx_url(receipt.transaction_hash),
            block_number: receipt.block_number.map(|b| b.as_u64()),
            gas_used: receipt.gas_used,
            amount_in: request.amount_in,
            quoted_amount_out: request.quoted_amount_out,
            min_amount_out: request.min_amount_out,
            deadline: request.deadline,
            recipient: request.recipient,
        })
    }

    /// Expected token output for `amount_in` wei along `[native_wrapped, token]`.
    pub async fn quote(
        &self,
        client: &dyn ChainClient,
        chain: &ChainConfig,
        token: Address,
        amount_in: U256,
    ) -> Result<U256, EngineError> {
        let quote_failed = |source: BlockchainError| EngineError::QuoteFailed {
            chain: client.chain_name().to_string(),
            router: chain.router_address,
            token,
            source,
        };

        let path = vec![chain.native_wrapped_token, token];
        let amounts: Vec<U256> = call_view(client, &V2_ROUTER, chain.router_address, "getAmountsOut", (amount_in, path))
            .await
            .map_err(&quote_failed)?;

        let quoted = match amounts.last() {
            Some(out) if amounts.len() == 2 => *out,
            _ => {
                return Err(quote_failed(BlockchainError::DataEncoding(format!(
                    "router returned {} amounts for a 2-hop path",
                    amounts.len()
                ))))
            }
        };
        if quoted.is_zero() {
            return Err(quote_failed(BlockchainError::DataEncoding(
                "router quoted zero output".to_string(),
            )));
        }
        debug!(target: "swap", %amount_in, %quoted, "Amounts out received");
        Ok(quoted)
    }

    /// Applies slippage and the deadline window to a quote. `now` is a Unix timestamp.
    #[allow(clippy::too_many_arguments)]
    pub fn build_request(
        &self,
        chain_key: &str,
        chain: &ChainConfig,
        token: Address,
        amount_in: U256,
        quoted_amount_out: U256,
        recipient: Address,
        now: i64,
    ) -> Result<SwapRequest, EngineError> {
        let min_amount_out = apply_slippage(quoted_amount_out, self.settings.slippage_bps)?;
        let now = u64::try_from(now)
            .map_err(|_| EngineError::Config(format!("system clock before Unix epoch: {}", now)))?;
        Ok(SwapRequest {
            chain: chain_key.to_string(),
            token_address: token,
            path: vec![chain.native_wrapped_token, token],
            amount_in,
            quoted_amount_out,
            min_amount_out,
            deadline: now + self.settings.deadline_secs,
            recipient,
            gas_limit: self.settings.swap_gas_limit,
        })
    }

    /// Encodes `swapExactETHForTokens` and wraps it in a payable transaction.
    pub fn build_transaction(&self, chain: &ChainConfig, request: &SwapRequest) -> Result<TransactionRequest, EngineError> {
        let data = encode_call(
            &V2_ROUTER,
            "swapExactETHForTokens",
            (
                request.min_amount_out,
                request.path.clone(),
                request.recipient,
                U256::from(request.deadline),
            ),
        )
        .map_err(|e| EngineError::swap_execution(&request.chain, "encoding", e))?;

        Ok(TransactionRequest::new()
            .from(request.recipient)
            .to(chain.router_address)
            .value(request.amount_in)
            .gas(request.gas_limit)
            .data(data))
    }
}
