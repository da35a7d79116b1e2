//! Static table of supported networks.
//!
//! A `ChainRegistry` is built once at start-up (from `chains.json` or the
//! built-in defaults) and then only read. Every operation resolves its chain
//! key through [`ChainRegistry::resolve`].

use crate::errors::EngineError;
use ethers::types::{Address, H256};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// One supported network and the V2 deployment on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    pub factory_address: Address,
    pub router_address: Address,
    pub native_wrapped_token: Address,
    pub native_name: String,
    pub native_symbol: String,
    /// Explorer root, e.g. `https://sepolia.etherscan.io/`.
    pub explorer_url: String,
}

impl ChainConfig {
    pub fn validate(&self, key: &str) -> Result<(), EngineError> {
        if self.rpc_url.trim().is_empty() {
            return Err(EngineError::Config(format!("RPC URL is missing for chain {}", key)));
        }
        for (label, address) in [
            ("factory_address", self.factory_address),
            ("router_address", self.router_address),
            ("native_wrapped_token", self.native_wrapped_token),
        ] {
            if address.is_zero() {
                return Err(EngineError::Config(format!("{} is the zero address for chain {}", label, key)));
            }
        }
        Ok(())
    }

    pub fn address_url(&self, address: Address) -> String {
        format!("{}address/{:?}", self.explorer_root(), address)
    }

    pub fn tx_url(&self, tx_hash: H256) -> String {
        format!("{}tx/{:?}", self.explorer_root(), tx_hash)
    }

    fn explorer_root(&self) -> String {
        if self.explorer_url.ends_with('/') {
            self.explorer_url.clone()
        } else {
            format!("{}/", self.explorer_url)
        }
    }
}

fn addr(s: &str) -> Address {
    Address::from_str(s).expect("built-in chain table contains a malformed address")
}

static BUILTIN_CHAINS: Lazy<HashMap<String, ChainConfig>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        "monad".to_string(),
        ChainConfig {
            chain_id: 10143,
            rpc_url: "https://testnet-rpc.monad.xyz/".to_string(),
            factory_address: addr("0x4ab43a725e316275CC124620d0dFB0B58FAecAa2"),
            router_address: addr("0x85485564916b8f60889d4c9435f6a7bA711cBd41"),
            native_wrapped_token: addr("0x760AfE86e5de5fa0Ee542fc7B7B713e1c5425701"),
            native_name: "Monad Testnet".to_string(),
            native_symbol: "MON".to_string(),
            explorer_url: "https://testnet.monadexplorer.com/".to_string(),
        },
    );
    m.insert(
        "sepolia".to_string(),
        ChainConfig {
            chain_id: 11155111,
            rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
            factory_address: addr("0xF62c03E08ada871A0bEb309762E260a7a6a880E6"),
            router_address: addr("0xeE567Fe1712Faf6149d80dA1E6934E354124CfE3"),
            native_wrapped_token: addr("0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14"),
            native_name: "Sepolia Testnet".to_string(),
            native_symbol: "ETH".to_string(),
            explorer_url: "https://sepolia.etherscan.io/".to_string(),
        },
    );
    m
});

/// Immutable chain-key → [`ChainConfig`] map. Keys are matched case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRegistry {
    chains: HashMap<String, ChainConfig>,
}

impl ChainRegistry {
    pub fn new(chains: HashMap<String, ChainConfig>) -> Result<Self, EngineError> {
        if chains.is_empty() {
            return Err(EngineError::Config("no chains configured".to_string()));
        }
        let mut normalized = HashMap::with_capacity(chains.len());
        for (key, chain) in chains {
            chain.validate(&key)?;
            let key = Self::normalize_key(&key);
            if normalized.insert(key.clone(), chain).is_some() {
                return Err(EngineError::Config(format!("chain key '{}' is defined twice", key)));
            }
        }
        Ok(Self { chains: normalized })
    }

    /// Monad testnet and Sepolia.
    pub fn builtin() -> Self {
        Self {
            chains: BUILTIN_CHAINS.clone(),
        }
    }

    /// Canonical form of a chain key: trimmed and lower-cased.
    pub fn normalize_key(chain_key: &str) -> String {
        chain_key.trim().to_lowercase()
    }

    pub fn resolve(&self, chain_key: &str) -> Result<&ChainConfig, EngineError> {
        self.chains
            .get(&Self::normalize_key(chain_key))
            .ok_or_else(|| EngineError::UnsupportedChain {
                chain: chain_key.to_string(),
            })
    }

    pub fn chain_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.chains.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
