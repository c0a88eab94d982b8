use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};

use super::ledger::{LedgerError, LedgerPort};

/// Rent-exempt minimum the mock reports regardless of size
pub const MOCK_RENT_EXEMPT_LAMPORTS: u64 = 2_039_280;

#[derive(Debug, Default)]
struct MockState {
    airdrops: Vec<(Pubkey, u64)>,
    sent: Vec<Transaction>,
    accounts: HashMap<Pubkey, Vec<u8>>,
    balances: HashMap<Pubkey, u64>,
    token_balances: HashMap<Pubkey, u64>,
    default_token_balance: Option<u64>,
    pending_polls: u32,
    polls: u32,
    fail_send_at: Option<usize>,
}

/// In-memory ledger that records calls and serves configured responses
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    state: Arc<Mutex<MockState>>,
    blockhash: Hash,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            blockhash: Hash::new_unique(),
        }
    }

    /// Builder method to seed raw account data
    pub fn with_account(self, address: Pubkey, data: Vec<u8>) -> Self {
        self.state.lock().unwrap().accounts.insert(address, data);
        self
    }

    /// Builder method to seed a token account balance
    pub fn with_token_balance(self, token_account: Pubkey, amount: u64) -> Self {
        self.state.lock().unwrap().token_balances.insert(token_account, amount);
        self
    }

    /// Balance reported for token accounts that were not seeded
    pub fn with_default_token_balance(self, amount: u64) -> Self {
        self.state.lock().unwrap().default_token_balance = Some(amount);
        self
    }

    /// Airdrop signatures report unconfirmed for the first `polls` checks
    pub fn with_pending_polls(self, polls: u32) -> Self {
        self.state.lock().unwrap().pending_polls = polls;
        self
    }

    /// Fail the `index`-th (0-based) call to `send_and_confirm`
    pub fn failing_send_at(self, index: usize) -> Self {
        self.state.lock().unwrap().fail_send_at = Some(index);
        self
    }

    /// Get all recorded airdrops
    pub fn airdrops(&self) -> Vec<(Pubkey, u64)> {
        self.state.lock().unwrap().airdrops.clone()
    }

    /// Get all transactions that were sent
    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn confirmation_polls(&self) -> u32 {
        self.state.lock().unwrap().polls
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }
}

#[async_trait]
impl LedgerPort for MockLedger {
    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, LedgerError> {
        let mut state = self.state.lock().unwrap();
        state.airdrops.push((*to, lamports));
        *state.balances.entry(*to).or_default() += lamports;
        Ok(Signature::new_unique())
    }

    async fn confirm_signature(&self, _signature: &Signature) -> Result<bool, LedgerError> {
        let mut state = self.state.lock().unwrap();
        state.polls += 1;
        if state.pending_polls > 0 {
            state.pending_polls -= 1;
            return Ok(false);
        }
        Ok(true)
    }

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        Ok(self.blockhash)
    }

    async fn minimum_balance_for_rent_exemption(&self, _data_len: usize) -> Result<u64, LedgerError> {
        Ok(MOCK_RENT_EXEMPT_LAMPORTS)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_send_at == Some(state.sent.len()) {
            return Err(LedgerError::Transaction(
                "custom program error: 0x1".to_string(),
            ));
        }
        if !transaction.is_signed() {
            return Err(LedgerError::Transaction("transaction is not fully signed".to_string()));
        }
        state.sent.push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.state.lock().unwrap().accounts.get(address).cloned())
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64, LedgerError> {
        Ok(self.state.lock().unwrap().balances.get(address).copied().unwrap_or(0))
    }

    async fn token_balance(&self, token_account: &Pubkey) -> Result<u64, LedgerError> {
        let state = self.state.lock().unwrap();
        state
            .token_balances
            .get(token_account)
            .copied()
            .or(state.default_token_balance)
            .ok_or_else(|| LedgerError::Rpc(format!("could not find account {}", token_account)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_airdrop_credits_balance() {
        let mock = MockLedger::new();
        let who = Pubkey::new_unique();

        mock.request_airdrop(&who, 5_000_000_000).await.unwrap();

        assert_eq!(mock.balance(&who).await.unwrap(), 5_000_000_000);
        assert_eq!(mock.airdrops(), vec![(who, 5_000_000_000)]);
    }

    #[tokio::test]
    async fn test_mock_pending_polls() {
        let mock = MockLedger::new().with_pending_polls(2);
        let sig = Signature::new_unique();

        assert!(!mock.confirm_signature(&sig).await.unwrap());
        assert!(!mock.confirm_signature(&sig).await.unwrap());
        assert!(mock.confirm_signature(&sig).await.unwrap());
        assert_eq!(mock.confirmation_polls(), 3);
    }

    #[tokio::test]
    async fn test_mock_rejects_unsigned_transaction() {
        let mock = MockLedger::new();
        let payer = Pubkey::new_unique();
        let tx = Transaction::new_with_payer(&[], Some(&payer));

        let result = mock.send_and_confirm(&tx).await;
        assert!(matches!(result, Err(LedgerError::Transaction(_))));
        assert!(mock.sent_transactions().is_empty());
    }

    #[test]
    fn test_mock_missing_token_account() {
        let mock = MockLedger::new();
        let result = tokio_test::block_on(mock.token_balance(&Pubkey::new_unique()));
        assert!(result.is_err());

        let mock = mock.with_default_token_balance(7);
        assert_eq!(tokio_test::block_on(mock.token_balance(&Pubkey::new_unique())).unwrap(), 7);
    }
}
