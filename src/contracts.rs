//! ABI definitions for the V2 factory, pair, router and ERC-20 read interface.
//!
//! Encoding and decoding goes through `ethers::abi` so calldata matches the
//! standard interfaces byte-for-byte.

use crate::blockchain::ChainClient;
use crate::errors::BlockchainError;
use ethers::abi::{parse_abi, Detokenize, Tokenize};
use ethers::contract::BaseContract;
use ethers::types::{Address, Bytes, TransactionRequest};
use once_cell::sync::Lazy;

fn contract(signatures: &[&str]) -> BaseContract {
    BaseContract::from(parse_abi(signatures).expect("static ABI definition must parse"))
}

pub static V2_FACTORY: Lazy<BaseContract> = Lazy::new(|| {
    contract(&["function getPair(address tokenA, address tokenB) external view returns (address pair)"])
});

pub static V2_PAIR: Lazy<BaseContract> = Lazy::new(|| {
    contract(&[
        "function token0() external view returns (address)",
        "function token1() external view returns (address)",
        "function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)",
        "function totalSupply() external view returns (uint256)",
    ])
});

pub static ERC20_METADATA: Lazy<BaseContract> = Lazy::new(|| {
    contract(&[
        "function name() external view returns (string)",
        "function symbol() external view returns (string)",
        "function decimals() external view returns (uint8)",
    ])
});

pub static V2_ROUTER: Lazy<BaseContract> = Lazy::new(|| {
    contract(&[
        "function swapExactETHForTokens(uint256 amountOutMin, address[] path, address to, uint256 deadline) external payable returns (uint256[] amounts)",
        "function getAmountsOut(uint256 amountIn, address[] path) external view returns (uint256[] amounts)",
    ])
});

/// ABI-encodes a call to `function` on `contract`.
pub fn encode_call<A: Tokenize>(contract: &BaseContract, function: &str, args: A) -> Result<Bytes, BlockchainError> {
    contract.encode(function, args).map_err(BlockchainError::from)
}

/// Runs a view function through `eth_call` and decodes its return value.
pub async fn call_view<D, A>(
    client: &dyn ChainClient,
    contract: &BaseContract,
    target: Address,
    function: &str,
    args: A,
) -> Result<D, BlockchainError>
where
    D: Detokenize,
    A: Tokenize,
{
    let data = encode_call(contract, function, args)?;
    let tx = TransactionRequest::new().to(target).data(data);
    let raw = client.call(&tx).await?;
    if raw.is_empty() {
        return Err(BlockchainError::DataEncoding(format!(
            "{}() on {:?} returned no data",
            function, target
        )));
    }
    contract
        .decode_output(function, raw)
        .map_err(|e| BlockchainError::DataEncoding(format!("cannot decode {}() from {:?}: {}", function, target, e)))
}
