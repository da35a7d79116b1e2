//! # Pair Engine
//!
//! The request-facing surface: `analyze`, `swap` and `test_chain`.
//!
//! The engine owns nothing mutable. The registry and settings are fixed at
//! construction and the client factory hands out shared, read-only connections,
//! so one `PairEngine` can serve any number of concurrent requests.
//!
//! ## Analysis flow
//!
//! 1. Parse the token address and resolve the chain to its canonical key (no network).
//! 2. Verify the factory has code.
//! 3. Resolve the pair through the factory, then verify the pair has code.
//! 4. Read token metadata and pair state concurrently.
//! 5. Normalize reserves with the token's own decimals and build [`PairInfo`].

use crate::blockchain::{ChainClient, ClientFactory};
use crate::chain_registry::{ChainConfig, ChainRegistry};
use crate::config::EngineSettings;
use crate::errors::EngineError;
use crate::pair_resolver::find_pair;
use crate::reserves::{compute_metrics, read_pair_state};
use crate::secrets::SecretKey;
use crate::swap::SwapExecutor;
use crate::token_metadata::fetch_metadata;
use crate::types::{ChainHealth, PairInfo, SwapOutcome};
use crate::units::parse_address;
use crate::verifier::verify_contract;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct PairEngine {
    registry: Arc<ChainRegistry>,
    settings: EngineSettings,
    clients: Arc<dyn ClientFactory>,
    credential: Option<SecretKey>,
    executor: SwapExecutor,
}

impl std::fmt::Debug for PairEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairEngine")
            .field("chains", &self.registry.chain_keys())
            .field("settings", &self.settings)
            .field("has_credential", &self.credential.is_some())
            .finish()
    }
}

impl PairEngine {
    pub fn new(registry: Arc<ChainRegistry>, settings: EngineSettings, clients: Arc<dyn ClientFactory>) -> Self {
        Self {
            registry,
            executor: SwapExecutor::new(settings.clone()),
            settings,
            clients,
            credential: None,
        }
    }

    /// Signing key used by [`PairEngine::swap`]. Analysis never needs one.
    pub fn with_credential(mut self, credential: Option<SecretKey>) -> Self {
        self.credential = credential;
        self
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Resolves `chain_key` and hands back its canonical key, config and client.
    /// Every later log line, error and cache lookup uses the canonical key.
    fn connect(&self, chain_key: &str) -> Result<(String, &ChainConfig, Arc<dyn ChainClient>), EngineError> {
        let chain = self.registry.resolve(chain_key)?;
        let key = ChainRegistry::normalize_key(chain_key);
        let client = self
            .clients
            .connect(&key, chain)
            .map_err(|e| EngineError::transport(&key, "connecting to RPC endpoint", e))?;
        Ok((key, chain, client))
    }

    /// Full snapshot of the `(token, native_wrapped)` pair on `chain_key`.
    #[instrument(skip(self), level = "info")]
    pub async fn analyze(&self, token_address: &str, chain_key: &str) -> Result<PairInfo, EngineError> {
        let token = parse_address(token_address)?;
        let (chain_key, chain, client) = self.connect(chain_key)?;
        let chain_key = chain_key.as_str();
        let client = client.as_ref();

        if !verify_contract(client, chain.factory_address, "Factory").await {
            return Err(EngineError::ContractNotDeployed {
                chain: chain_key.to_string(),
                label: "Factory".to_string(),
                address: chain.factory_address,
            });
        }

        let pair = find_pair(client, chain.factory_address, token, chain.native_wrapped_token).await?;
        if !verify_contract(client, pair, "Pair").await {
            return Err(EngineError::ContractNotDeployed {
                chain: chain_key.to_string(),
                label: "Pair".to_string(),
                address: pair,
            });
        }

        let (metadata, state) = tokio::try_join!(fetch_metadata(client, token), read_pair_state(client, pair))?;
        let metrics = compute_metrics(
            chain_key,
            &state,
            token,
            metadata.decimals,
            self.settings.liquidity_unit_price_usd,
        )?;

        info!(
            target: "engine",
            chain = %chain_key,
            symbol = %metadata.symbol,
            ?pair,
            price_in_native = metrics.price_in_native,
            "Pair analyzed"
        );

        Ok(PairInfo {
            chain: chain_key.to_string(),
            token_address: token,
            token_name: metadata.name,
            token_symbol: metadata.symbol,
            token_decimals: metadata.decimals,
            pair_address: pair,
            native_symbol: chain.native_symbol.clone(),
            token_reserve: metrics.token_reserve,
            native_reserve: metrics.native_reserve,
            token_reserve_raw: metrics.token_reserve_raw,
            native_reserve_raw: metrics.native_reserve_raw,
            price_in_native: metrics.price_in_native,
            estimated_liquidity_usd: metrics.estimated_liquidity_usd,
            total_lp_tokens: metrics.total_lp_tokens,
            block_timestamp_last: metrics.block_timestamp_last,
            token_explorer_url: chain.address_url(token),
            pair_explorer_url: chain.address_url(pair),
        })
    }

    /// Swaps `native_amount_in` of the native asset for `token_address`.
    #[instrument(skip(self), level = "info")]
    pub async fn swap(&self, token_address: &str, chain_key: &str, native_amount_in: &str) -> Result<SwapOutcome, EngineError> {
        let credential = self
            .credential
            .as_ref()
            .ok_or_else(|| EngineError::InvalidCredential("no signing key configured".to_string()))?;
        let (_, chain, client) = self.connect(chain_key)?;

        self.executor
            .execute_swap(client.as_ref(), chain, credential, token_address, native_amount_in)
            .await
    }

    /// Reports the endpoint's chain id and whether the factory is deployed.
    #[instrument(skip(self), level = "info")]
    pub async fn test_chain(&self, chain_key: &str) -> Result<ChainHealth, EngineError> {
        let (chain_key, chain, client) = self.connect(chain_key)?;
        let chain_key = chain_key.as_str();

        let network_id = client
            .get_chain_id()
            .await
            .map_err(|e| EngineError::transport(chain_key, "eth_chainId", e))?;
        let factory_deployed = verify_contract(client.as_ref(), chain.factory_address, "Factory").await;

        let health = ChainHealth {
            chain: chain_key.to_string(),
            network_id,
            expected_chain_id: chain.chain_id,
            factory_address: chain.factory_address,
            factory_deployed,
        };
        if !health.chain_id_matches() {
            warn!(
                target: "engine",
                chain = %chain_key,
                network_id,
                expected = chain.chain_id,
                "Endpoint reports a different chain id than configured"
            );
        }
        info!(target: "engine", chain = %chain_key, network_id, factory_deployed, "Chain tested");
        Ok(health)
    }
}
