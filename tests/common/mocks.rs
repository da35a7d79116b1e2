use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock as StdRwLock};

use async_trait::async_trait;
use ethers::{
    abi::Tokenize,
    contract::BaseContract,
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, NameOrAddress, TransactionReceipt, TransactionRequest, H256, U256, U64},
};

use pair_analyzer::{
    blockchain::{ChainClient, ClientFactory},
    chain_registry::ChainConfig,
    errors::BlockchainError,
};

/// Every request the engine made, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum MockRequest {
    ChainId,
    GetCode(Address),
    Call { to: Address, selector: [u8; 4], data: Bytes },
    Send { from: Address, to: Option<Address>, value: Option<U256>, data: Bytes },
}

pub fn selector(contract: &BaseContract, function: &str) -> [u8; 4] {
    contract
        .abi()
        .function(function)
        .unwrap_or_else(|_| panic!("unknown function {}", function))
        .short_signature()
}

// === Mock Chain Client ===
pub struct MockChainClient {
    chain_name: String,
    chain_id: StdRwLock<Result<u64, BlockchainError>>,
    code: StdRwLock<HashMap<Address, Result<Bytes, BlockchainError>>>,
    calls: StdRwLock<HashMap<(Address, [u8; 4]), Result<Bytes, BlockchainError>>>,
    receipt_status: StdRwLock<u64>,
    send_error: StdRwLock<Option<BlockchainError>>,
    requests: Mutex<Vec<MockRequest>>,
}

impl MockChainClient {
    pub fn new(chain_name: &str, chain_id: u64) -> Self {
        Self {
            chain_name: chain_name.to_string(),
            chain_id: StdRwLock::new(Ok(chain_id)),
            code: StdRwLock::new(HashMap::new()),
            calls: StdRwLock::new(HashMap::new()),
            receipt_status: StdRwLock::new(1),
            send_error: StdRwLock::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_code(&self, address: Address) -> &Self {
        self.code.write().unwrap().insert(address, Ok(Bytes::from(vec![0x60, 0x80, 0x60, 0x40])));
        self
    }

    pub fn with_code_error(&self, address: Address, error: BlockchainError) -> &Self {
        self.code.write().unwrap().insert(address, Err(error));
        self
    }

    /// Answers `function` on `to` with `output` ABI-encoded as the return value.
    pub fn respond<T: Tokenize>(&self, to: Address, contract: &BaseContract, function: &str, output: T) -> &Self {
        let encoded = ethers::abi::encode(&output.into_tokens());
        self.calls
            .write()
            .unwrap()
            .insert((to, selector(contract, function)), Ok(Bytes::from(encoded)));
        self
    }

    pub fn fail_call(&self, to: Address, contract: &BaseContract, function: &str, error: BlockchainError) -> &Self {
        self.calls
            .write()
            .unwrap()
            .insert((to, selector(contract, function)), Err(error));
        self
    }

    pub fn set_chain_id(&self, chain_id: Result<u64, BlockchainError>) {
        *self.chain_id.write().unwrap() = chain_id;
    }

    pub fn set_receipt_status(&self, status: u64) {
        *self.receipt_status.write().unwrap() = status;
    }

    pub fn set_send_error(&self, error: BlockchainError) {
        *self.send_error.write().unwrap() = Some(error);
    }

    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn sent_transactions(&self) -> Vec<MockRequest> {
        self.requests()
            .into_iter()
            .filter(|r| matches!(r, MockRequest::Send { .. }))
            .collect()
    }

    fn record(&self, request: MockRequest) {
        self.requests.lock().unwrap().push(request);
    }
}

fn target_address(to: &Option<NameOrAddress>) -> Option<Address> {
    match to {
        Some(NameOrAddress::Address(address)) => Some(*address),
        _ => None,
    }
}

impl std::fmt::Debug for MockChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockChainClient").field("chain_name", &self.chain_name).finish()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    fn chain_name(&self) -> &str {
        &self.chain_name
    }

    async fn get_chain_id(&self) -> Result<u64, BlockchainError> {
        self.record(MockRequest::ChainId);
        self.chain_id.read().unwrap().clone()
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, BlockchainError> {
        self.record(MockRequest::GetCode(address));
        self.code
            .read()
            .unwrap()
            .get(&address)
            .cloned()
            .unwrap_or_else(|| Ok(Bytes::default()))
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, BlockchainError> {
        let to = target_address(&tx.to).unwrap_or_default();
        let data = tx.data.clone().unwrap_or_default();
        let mut selector = [0u8; 4];
        if data.len() >= 4 {
            selector.copy_from_slice(&data[..4]);
        }
        self.record(MockRequest::Call { to, selector, data: data.clone() });
        // eth_call against an address without that function returns empty data
        self.calls
            .read()
            .unwrap()
            .get(&(to, selector))
            .cloned()
            .unwrap_or_else(|| Ok(Bytes::default()))
    }

    async fn send_transaction(
        &self,
        wallet: &LocalWallet,
        tx: TransactionRequest,
        _confirmations: usize,
    ) -> Result<TransactionReceipt, BlockchainError> {
        self.record(MockRequest::Send {
            from: wallet.address(),
            to: target_address(&tx.to),
            value: tx.value,
            data: tx.data.clone().unwrap_or_default(),
        });
        if let Some(error) = self.send_error.read().unwrap().clone() {
            return Err(error);
        }
        Ok(TransactionReceipt {
            transaction_hash: H256::from_low_u64_be(0xabcdef),
            block_number: Some(U64::from(4_200_000u64)),
            gas_used: Some(U256::from(123_456u64)),
            status: Some(U64::from(*self.receipt_status.read().unwrap())),
            from: wallet.address(),
            to: target_address(&tx.to),
            ..Default::default()
        })
    }
}

// === Mock Client Factory ===
pub struct MockClientFactory {
    client: Arc<MockChainClient>,
    connected_keys: Mutex<Vec<String>>,
}

impl MockClientFactory {
    pub fn new(client: Arc<MockChainClient>) -> Self {
        Self {
            client,
            connected_keys: Mutex::new(Vec::new()),
        }
    }

    /// Chain keys passed to `connect`, in order.
    pub fn connected_keys(&self) -> Vec<String> {
        self.connected_keys.lock().unwrap().clone()
    }
}

impl ClientFactory for MockClientFactory {
    fn connect(&self, chain_key: &str, _chain: &ChainConfig) -> Result<Arc<dyn ChainClient>, BlockchainError> {
        self.connected_keys.lock().unwrap().push(chain_key.to_string());
        Ok(self.client.clone())
    }
}
