//! Contract existence checks.

use crate::blockchain::ChainClient;
use ethers::types::Address;
use tracing::{debug, warn};

/// Returns `true` only when `address` has non-empty bytecode.
///
/// Missing code and transport failures both come back as `false` so callers can
/// report a single "not deployed or unreachable" condition.
pub async fn verify_contract(client: &dyn ChainClient, address: Address, label: &str) -> bool {
    debug!(target: "verifier", chain = %client.chain_name(), %label, ?address, "Verifying contract");
    match client.get_code(address).await {
        Ok(code) if !code.is_empty() => {
            debug!(target: "verifier", %label, ?address, code_len = code.len(), "Contract verified");
            true
        }
        Ok(_) => {
            warn!(target: "verifier", chain = %client.chain_name(), %label, ?address, "No contract code at address");
            false
        }
        Err(e) => {
            warn!(target: "verifier", chain = %client.chain_name(), %label, ?address, error = %e, "Contract verification failed");
            false
        }
    }
}
