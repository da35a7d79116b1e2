// src/config.rs

use crate::chain_registry::{ChainConfig, ChainRegistry};
use crate::secrets::SecretKey;
use crate::units::BPS_DENOMINATOR;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

//================================================================================================//
//                                        ENGINE SETTINGS                                         //
//================================================================================================//

/// Tunables for analysis and swap execution. Every field has a default, so an
/// `engine.json` only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Maximum accepted shortfall against the router quote, in basis points.
    pub slippage_bps: u16,
    /// Seconds added to submission time to form the router deadline.
    pub deadline_secs: u64,
    pub swap_gas_limit: u64,
    /// USD value assumed for one unit of the native asset when estimating
    /// liquidity. A fixed heuristic, not a price feed.
    pub liquidity_unit_price_usd: f64,
    pub confirmations: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            slippage_bps: 500,
            deadline_secs: 300,
            swap_gas_limit: 300_000,
            liquidity_unit_price_usd: 1000.0,
            confirmations: 1,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<()> {
        if u64::from(self.slippage_bps) > BPS_DENOMINATOR {
            return Err(eyre::eyre!("slippage_bps must be at most {}, got {}", BPS_DENOMINATOR, self.slippage_bps));
        }
        if self.deadline_secs == 0 {
            return Err(eyre::eyre!("deadline_secs must be greater than 0"));
        }
        if self.swap_gas_limit == 0 {
            return Err(eyre::eyre!("swap_gas_limit must be greater than 0"));
        }
        if !self.liquidity_unit_price_usd.is_finite() || self.liquidity_unit_price_usd < 0.0 {
            return Err(eyre::eyre!("liquidity_unit_price_usd must be a non-negative number"));
        }
        if self.confirmations == 0 {
            return Err(eyre::eyre!("confirmations must be at least 1"));
        }
        Ok(())
    }
}

//================================================================================================//
//                                          FILE LAYOUT                                           //
//================================================================================================//

/// Shape of `chains.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainsFile {
    pub chains: HashMap<String, ChainConfig>,
}

//================================================================================================//
//                                             CONFIG                                             //
//================================================================================================//

#[derive(Debug, Clone)]
pub struct Config {
    pub registry: ChainRegistry,
    pub settings: EngineSettings,
}

impl Config {
    pub async fn load_from_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let chains: ChainsFile = Self::load_file(dir.join("chains.json")).await?;
        let registry = ChainRegistry::new(chains.chains)
            .with_context(|| format!("Invalid chain registry in {}", dir.display()))?;

        let settings: EngineSettings = Self::load_optional_file(dir.join("engine.json"))
            .await?
            .unwrap_or_default();
        settings
            .validate()
            .with_context(|| format!("Invalid engine settings in {}", dir.display()))?;

        info!(target: "config", dir = %dir.display(), chains = ?registry.chain_keys(), "Configuration loaded");
        Ok(Self { registry, settings })
    }

    /// Loads `dir` when it exists, otherwise falls back to the built-in chains
    /// with default settings.
    pub async fn load_or_builtin<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if dir.is_dir() {
            return Self::load_from_directory(dir).await;
        }
        warn!(target: "config", dir = %dir.display(), "Config directory not found, using built-in chains");
        Ok(Self {
            registry: ChainRegistry::builtin(),
            settings: EngineSettings::default(),
        })
    }

    async fn load_file<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
        let content = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from JSON: {}", path.as_ref().display()))
    }

    async fn load_optional_file<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<Option<T>> {
        if !path.as_ref().exists() {
            return Ok(None);
        }
        Self::load_file(path).await.map(Some)
    }

    /// `<CHAIN>_PRIVATE_KEY` when set, else `PRIVATE_KEY`.
    pub fn get_private_key(chain_name: &str) -> Option<SecretKey> {
        let per_chain = format!("{}_PRIVATE_KEY", chain_name.to_uppercase());
        std::env::var(&per_chain)
            .ok()
            .or_else(|| std::env::var("PRIVATE_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .map(SecretKey::new)
    }
}
