use async_trait::async_trait;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::sync::Arc;

use crate::ports::{LedgerError, LedgerPort};

/// Wrapper around Solana RPC client with async-compatible methods
#[derive(Clone)]
pub struct SolanaClient {
    client: Arc<RpcClient>,
}

impl SolanaClient {
    /// Create a new Solana RPC client at `confirmed` commitment
    pub fn new(rpc_url: String) -> Self {
        Self::with_commitment(rpc_url, CommitmentConfig::confirmed())
    }

    pub fn with_commitment(rpc_url: String, commitment: CommitmentConfig) -> Self {
        let client = Arc::new(RpcClient::new_with_commitment(rpc_url, commitment));
        Self { client }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.client.commitment()
    }

    /// Run a blocking RPC call on the blocking pool
    async fn blocking<T, F>(&self, call: F) -> Result<T, LedgerError>
    where
        T: Send + 'static,
        F: FnOnce(&RpcClient) -> Result<T, LedgerError> + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || call(&client))
            .await
            .map_err(|e| LedgerError::TaskJoin(e.to_string()))?
    }
}

#[async_trait]
impl LedgerPort for SolanaClient {
    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, LedgerError> {
        let to = *to;
        self.blocking(move |client| {
            client
                .request_airdrop(&to, lamports)
                .map_err(|e| LedgerError::Rpc(e.to_string()))
        })
        .await
    }

    async fn confirm_signature(&self, signature: &Signature) -> Result<bool, LedgerError> {
        let signature = *signature;
        self.blocking(move |client| {
            client
                .confirm_transaction(&signature)
                .map_err(|e| LedgerError::Rpc(e.to_string()))
        })
        .await
    }

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        self.blocking(|client| {
            client
                .get_latest_blockhash()
                .map_err(|e| LedgerError::Rpc(e.to_string()))
        })
        .await
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, LedgerError> {
        self.blocking(move |client| {
            client
                .get_minimum_balance_for_rent_exemption(data_len)
                .map_err(|e| LedgerError::Rpc(e.to_string()))
        })
        .await
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError> {
        let tx = transaction.clone();
        self.blocking(move |client| {
            client
                .send_and_confirm_transaction(&tx)
                .map_err(|e| LedgerError::Transaction(e.to_string()))
        })
        .await
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError> {
        let address = *address;
        self.blocking(move |client| {
            client
                .get_account_with_commitment(&address, client.commitment())
                .map(|response| response.value.map(|account| account.data))
                .map_err(|e| LedgerError::Rpc(e.to_string()))
        })
        .await
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64, LedgerError> {
        let address = *address;
        self.blocking(move |client| {
            client
                .get_balance(&address)
                .map_err(|e| LedgerError::Rpc(e.to_string()))
        })
        .await
    }

    async fn token_balance(&self, token_account: &Pubkey) -> Result<u64, LedgerError> {
        let token_account = *token_account;
        self.blocking(move |client| {
            client
                .get_token_account_balance(&token_account)
                .map_err(|e| LedgerError::Rpc(e.to_string()))
                .and_then(|balance| {
                    balance
                        .amount
                        .parse::<u64>()
                        .map_err(|e| LedgerError::Rpc(format!("Parse error: {}", e)))
                })
        })
        .await
    }
}
