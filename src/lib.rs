//! Constant-product (Uniswap V2 style) pair analysis and native → token swaps
//! on EVM chains.
//!
//! [`engine::PairEngine`] is the entry point; everything below it talks to the
//! chain through the [`blockchain::ChainClient`] trait.

pub mod blockchain;
pub mod chain_registry;
pub mod config;
pub mod contracts;
pub mod engine;
pub mod errors;
pub mod pair_resolver;
pub mod reserves;
pub mod secrets;
pub mod swap;
pub mod token_metadata;
pub mod types;
pub mod units;
pub mod verifier;

pub use engine::PairEngine;
pub use errors::{BlockchainError, EngineError};
