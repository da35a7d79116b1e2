#![allow(dead_code)]

pub mod mocks;

use std::collections::HashMap;
use std::sync::Arc;

use ethers::types::{Address, U256};
use pair_analyzer::{
    chain_registry::{ChainConfig, ChainRegistry},
    config::EngineSettings,
    contracts::{ERC20_METADATA, V2_FACTORY, V2_PAIR, V2_ROUTER},
    secrets::SecretKey,
    PairEngine,
};

use mocks::{MockChainClient, MockClientFactory};

pub const CHAIN: &str = "testnet";
pub const CHAIN_ID: u64 = 31337;

/// Anvil's first dev account.
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEV_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

pub fn factory() -> Address {
    Address::from_low_u64_be(0xfac7)
}

pub fn router() -> Address {
    Address::from_low_u64_be(0x2007)
}

pub fn wrapped_native() -> Address {
    Address::from_low_u64_be(0xeeee)
}

pub fn pair() -> Address {
    Address::from_low_u64_be(0x9a12)
}

/// Lower-cased, so it never collides with `pair()` or the other fixtures.
pub fn token() -> Address {
    "0x5a1e8c7fdcbfa1e2b3c4d5e6f708192a3b4c5d6e".parse().unwrap()
}

pub fn token_str() -> String {
    format!("{:?}", token())
}

pub fn testnet_chain() -> ChainConfig {
    ChainConfig {
        chain_id: CHAIN_ID,
        rpc_url: "http://127.0.0.1:8545".to_string(),
        factory_address: factory(),
        router_address: router(),
        native_wrapped_token: wrapped_native(),
        native_name: "Test Ether".to_string(),
        native_symbol: "TETH".to_string(),
        explorer_url: "https://explorer.test/".to_string(),
    }
}

pub fn registry() -> ChainRegistry {
    let mut chains = HashMap::new();
    chains.insert(CHAIN.to_string(), testnet_chain());
    ChainRegistry::new(chains).unwrap()
}

pub fn engine(client: Arc<MockChainClient>, credential: Option<&str>) -> PairEngine {
    engine_with_factory(Arc::new(MockClientFactory::new(client)), credential)
}

pub fn engine_with_factory(factory: Arc<MockClientFactory>, credential: Option<&str>) -> PairEngine {
    PairEngine::new(Arc::new(registry()), EngineSettings::default(), factory)
        .with_credential(credential.map(SecretKey::new))
}

/// A chain with a deployed factory that knows no pairs.
pub fn empty_chain() -> MockChainClient {
    let client = MockChainClient::new(CHAIN, CHAIN_ID);
    client.with_code(factory());
    client.respond(factory(), &V2_FACTORY, "getPair", Address::zero());
    client
}

/// A chain with a 6-decimal token paired against the wrapped native token:
/// 1000 tokens against 2 native units.
pub fn liquid_chain(token_is_token0: bool) -> MockChainClient {
    let client = MockChainClient::new(CHAIN, CHAIN_ID);
    let token_reserve = U256::from(1_000_000_000u64);
    let native_reserve = U256::from(2u64) * U256::exp10(18);

    client.with_code(factory()).with_code(pair()).with_code(token());
    client.respond(factory(), &V2_FACTORY, "getPair", pair());
    if token_is_token0 {
        client
            .respond(pair(), &V2_PAIR, "token0", token())
            .respond(pair(), &V2_PAIR, "token1", wrapped_native())
            .respond(pair(), &V2_PAIR, "getReserves", (token_reserve, native_reserve, 1_700_000_000u32));
    } else {
        client
            .respond(pair(), &V2_PAIR, "token0", wrapped_native())
            .respond(pair(), &V2_PAIR, "token1", token())
            .respond(pair(), &V2_PAIR, "getReserves", (native_reserve, token_reserve, 1_700_000_000u32));
    }
    client
        .respond(pair(), &V2_PAIR, "totalSupply", U256::from(3u64) * U256::exp10(18))
        .respond(token(), &ERC20_METADATA, "name", "Test Token".to_string())
        .respond(token(), &ERC20_METADATA, "symbol", "TEST".to_string())
        .respond(token(), &ERC20_METADATA, "decimals", 6u8);
    client
}

/// Router quote for any input: `[amount_in, quoted_out]`.
pub fn with_quote(client: &MockChainClient, amount_in: U256, quoted_out: U256) {
    client.respond(router(), &V2_ROUTER, "getAmountsOut", vec![amount_in, quoted_out]);
}
