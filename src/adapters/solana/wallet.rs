use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Failed to load keypair from file: {0}")]
    LoadError(String),
    #[error("Failed to sign transaction: {0}")]
    SigningError(String),
    #[error("Invalid keypair bytes: {0}")]
    InvalidKeypair(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A named key pair taking part in the escrow flow (maker, taker, fee payer, mint)
pub struct Wallet {
    label: String,
    keypair: Keypair,
}

impl Wallet {
    /// Generate a fresh key pair
    pub fn generate(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            keypair: Keypair::new(),
        }
    }

    /// Load keypair from a Solana CLI key file (JSON array of 64 bytes)
    pub fn from_file<P: AsRef<Path>>(label: impl Into<String>, path: P) -> Result<Self, WalletError> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| WalletError::LoadError(format!("Failed to read {}: {}", path.as_ref().display(), e)))?;

        let bytes: Vec<u8> = serde_json::from_str(&contents)
            .map_err(|e| WalletError::LoadError(format!("Invalid JSON format: {}", e)))?;

        Self::from_bytes(label, &bytes)
    }

    /// Load keypair from a base58-encoded 64-byte secret
    pub fn from_base58(label: impl Into<String>, secret: &str) -> Result<Self, WalletError> {
        let bytes = bs58::decode(secret.trim())
            .into_vec()
            .map_err(|e| WalletError::InvalidKeypair(format!("Invalid base58: {}", e)))?;
        Self::from_bytes(label, &bytes)
    }

    pub fn from_bytes(label: impl Into<String>, bytes: &[u8]) -> Result<Self, WalletError> {
        let keypair = Keypair::try_from(bytes)
            .map_err(|e| WalletError::InvalidKeypair(e.to_string()))?;

        Ok(Self {
            label: label.into(),
            keypair,
        })
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Save keypair in Solana CLI format
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), WalletError> {
        let bytes = self.keypair.to_bytes().to_vec();
        let json = serde_json::to_string(&bytes)
            .map_err(|e| WalletError::LoadError(format!("Failed to serialize: {}", e)))?;

        fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

impl Clone for Wallet {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            keypair: self.keypair.insecure_clone(),
        }
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("label", &self.label)
            .field("pubkey", &self.pubkey())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_generate_is_unique() {
        let a = Wallet::generate("maker");
        let b = Wallet::generate("taker");
        assert_ne!(a.pubkey(), b.pubkey());
        assert!(format!("{:?}", a).contains("maker"));
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();
        let wallet = Wallet::generate("payer");
        wallet.save_to_file(file.path()).unwrap();

        let loaded = Wallet::from_file("payer", file.path()).unwrap();
        assert_eq!(wallet.pubkey(), loaded.pubkey());
    }

    #[test]
    fn test_from_base58() {
        let wallet = Wallet::generate("maker");
        let secret = bs58::encode(wallet.keypair().to_bytes()).into_string();

        let loaded = Wallet::from_base58("maker", &secret).unwrap();
        assert_eq!(wallet.pubkey(), loaded.pubkey());
    }

    #[test]
    fn test_invalid_bytes() {
        let result = Wallet::from_bytes("bad", &[0u8; 10]);
        assert!(matches!(result, Err(WalletError::InvalidKeypair(_))));
    }

    #[test]
    fn test_invalid_json_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"not valid json").unwrap();
        temp_file.flush().unwrap();

        let result = Wallet::from_file("bad", temp_file.path());
        assert!(matches!(result, Err(WalletError::LoadError(_))));
    }

    #[test]
    fn test_clone_keeps_identity() {
        let wallet = Wallet::generate("mint");
        let copy = wallet.clone();
        assert_eq!(wallet.pubkey(), copy.pubkey());
        assert!(format!("{:?}", copy).contains("mint"));
    }
}
