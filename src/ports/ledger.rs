//! Ledger Port
//!
//! Cluster operations the harness needs: airdrops, blockhashes, rent, submitting
//! transactions and reading accounts. `SolanaClient` is the RPC implementation;
//! tests use `MockLedger` or the mockall-generated `MockLedgerPort`.

use async_trait::async_trait;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("RPC request failed: {0}")]
    Rpc(String),
    #[error("Transaction failed: {0}")]
    Transaction(String),
    #[error("Timeout waiting for confirmation of {0}")]
    ConfirmationTimeout(String),
    #[error("Task join error: {0}")]
    TaskJoin(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerPort: Send + Sync {
    /// Request lamports from the cluster faucet
    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, LedgerError>;

    /// Whether the signature has reached the client's commitment
    async fn confirm_signature(&self, signature: &Signature) -> Result<bool, LedgerError>;

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, LedgerError>;

    /// Submit a signed transaction and wait for confirmation
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError>;

    /// Raw account data, `None` if the account does not exist
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Lamport balance
    async fn balance(&self, address: &Pubkey) -> Result<u64, LedgerError>;

    /// Token account balance in base units
    async fn token_balance(&self, token_account: &Pubkey) -> Result<u64, LedgerError>;
}
