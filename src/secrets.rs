//! Signing key handling.
//!
//! `SecretKey` is the raw key material as it arrives from the environment; it is
//! never printed. `SigningCredential` is the validated form, a `LocalWallet`
//! derived from exactly 32 bytes of hex.

use crate::errors::EngineError;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use std::fmt;

const PRIVATE_KEY_HEX_LEN: usize = 64;

/// Raw private key material. `Debug` is redacted.
#[derive(Clone)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(REDACTED)")
    }
}

/// A parsed signing key.
#[derive(Clone)]
pub struct SigningCredential {
    wallet: LocalWallet,
}

impl SigningCredential {
    /// Accepts 64 hex characters with or without a `0x` prefix.
    pub fn parse(key: &SecretKey) -> Result<Self, EngineError> {
        let trimmed = key.expose().trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidCredential("signing key is empty".to_string()));
        }
        let hex_part = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex_part.len() != PRIVATE_KEY_HEX_LEN {
            return Err(EngineError::InvalidCredential(format!(
                "invalid private key length: expected {} hex characters, got {}",
                PRIVATE_KEY_HEX_LEN,
                hex_part.len()
            )));
        }
        let bytes = hex::decode(hex_part)
            .map_err(|_| EngineError::InvalidCredential("private key is not valid hex".to_string()))?;
        let wallet = LocalWallet::from_bytes(&bytes)
            .map_err(|e| EngineError::InvalidCredential(format!("private key rejected: {}", e)))?;
        Ok(Self { wallet })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn wallet(&self) -> &LocalWallet {
        &self.wallet
    }
}

impl fmt::Debug for SigningCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredential")
            .field("address", &self.address())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test key (first anvil/hardhat account).
    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_parse_with_and_without_prefix() {
        let plain = SigningCredential::parse(&SecretKey::new(TEST_KEY)).unwrap();
        let prefixed = SigningCredential::parse(&SecretKey::new(format!("0x{}", TEST_KEY))).unwrap();
        assert_eq!(plain.address(), prefixed.address());
        assert_eq!(
            format!("{:?}", plain.address()),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_wrong_length_is_invalid_credential() {
        let err = SigningCredential::parse(&SecretKey::new("0x1234")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidCredential(_)));
        assert!(err.to_string().contains("length"));
    }

    #[test]
    fn test_non_hex_is_invalid_credential() {
        let key = "zz".repeat(32);
        assert!(matches!(
            SigningCredential::parse(&SecretKey::new(key)),
            Err(EngineError::InvalidCredential(_))
        ));
    }

    #[test]
    fn test_zero_key_is_rejected() {
        let key = "0".repeat(64);
        assert!(matches!(
            SigningCredential::parse(&SecretKey::new(key)),
            Err(EngineError::InvalidCredential(_))
        ));
    }

    #[test]
    fn test_debug_never_prints_key() {
        let key = SecretKey::new(TEST_KEY);
        assert!(!format!("{:?}", key).contains("ac0974"));
        let credential = SigningCredential::parse(&key).unwrap();
        assert!(!format!("{:?}", credential).contains("ac0974"));
    }
}
