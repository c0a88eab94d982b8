//! Escrow Harness
//!
//! The individual steps of an escrow test run: funding signers, creating and
//! minting test tokens, and submitting the escrow program's instructions.
//! Every step fetches a fresh blockhash, signs a legacy transaction, logs its
//! explorer link and waits for confirmation.

use rust_decimal::Decimal;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::{Keypair, Signature}};
use std::time::Duration;
use thiserror::Error;

use crate::adapters::escrow_program::{self, EscrowInstructionError, MakeAccounts, MakeArgs, RefundAccounts, TakeAccounts};
use crate::adapters::solana::{build_signed, signature_of, Wallet, WalletError};
use crate::adapters::token::{
    create_mint_instructions, mint_tokens_instructions, CreateMintParams, MintMetadata,
    MintTokensParams, TokenError, TokenProgram,
};
use crate::config::{Config, ConfigError};
use crate::domain::{
    associated_token_address, escrow_address, to_base_units, AmountError, Cluster,
    EscrowAddresses, EscrowState, EscrowStateError,
};
use crate::ports::{LedgerError, LedgerPort};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
    #[error("Instruction error: {0}")]
    Instruction(#[from] EscrowInstructionError),
    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),
    #[error("Escrow account error: {0}")]
    EscrowState(#[from] EscrowStateError),
    #[error("No escrow account at {0}")]
    EscrowNotFound(Pubkey),
}

/// Test token parameters applied to every mint the harness creates
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub program: TokenProgram,
    pub decimals: u8,
    pub symbol: String,
    pub uri: String,
    pub is_mutable: bool,
    pub with_metadata: bool,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            program: TokenProgram::Token2022,
            decimals: 10,
            symbol: "TEST".to_string(),
            uri: "https://example.com/metadata.json".to_string(),
            is_mutable: true,
            with_metadata: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarnessSettings {
    pub program_id: Pubkey,
    pub cluster: Cluster,
    pub token: TokenSettings,
    pub airdrop_lamports: u64,
    pub airdrop_poll_interval: Duration,
    pub airdrop_max_polls: u32,
}

impl HarnessSettings {
    pub fn new(program_id: Pubkey, cluster: Cluster) -> Self {
        Self {
            program_id,
            cluster,
            token: TokenSettings::default(),
            airdrop_lamports: 5_000_000_000,
            airdrop_poll_interval: Duration::from_secs(2),
            airdrop_max_polls: 15,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            program_id: config.program.program_id()?,
            cluster: config.cluster.cluster()?,
            token: TokenSettings {
                program: config.token.program,
                decimals: config.token.decimals,
                symbol: config.token.symbol.clone(),
                uri: config.token.uri.clone(),
                is_mutable: config.token.is_mutable,
                with_metadata: config.token.with_metadata,
            },
            airdrop_lamports: config.scenario.airdrop_lamports,
            airdrop_poll_interval: Duration::from_millis(config.scenario.airdrop_poll_interval_ms),
            airdrop_max_polls: config.scenario.airdrop_max_polls,
        })
    }
}

/// Outcome of a successful `make`
#[derive(Debug, Clone)]
pub struct MadeEscrow {
    pub signature: Signature,
    pub maker: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub maker_ata_a: Pubkey,
    pub addresses: EscrowAddresses,
    pub args: MakeArgs,
}

/// Outcome of a successful `take`
#[derive(Debug, Clone)]
pub struct TakenEscrow {
    pub signature: Signature,
    pub taker_ata_a: Pubkey,
    pub taker_ata_b: Pubkey,
    pub maker_ata_b: Pubkey,
}

pub struct EscrowHarness<L: LedgerPort> {
    ledger: L,
    settings: HarnessSettings,
}

impl<L: LedgerPort> EscrowHarness<L> {
    pub fn new(ledger: L, settings: HarnessSettings) -> Self {
        Self { ledger, settings }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn settings(&self) -> &HarnessSettings {
        &self.settings
    }

    pub fn token_program_id(&self) -> Pubkey {
        self.settings.token.program.id()
    }

    /// Generate a key pair and fund it from the faucet
    pub async fn create_signer(&self, label: &str) -> Result<Wallet, HarnessError> {
        let wallet = Wallet::generate(label);
        self.fund(&wallet.pubkey(), self.settings.airdrop_lamports).await?;
        tracing::info!("Keypair generated: {} {}", label, wallet.pubkey());
        Ok(wallet)
    }

    /// Airdrop and wait until the airdrop reaches the client's commitment
    pub async fn fund(&self, address: &Pubkey, lamports: u64) -> Result<Signature, HarnessError> {
        let signature = self.ledger.request_airdrop(address, lamports).await?;
        tracing::debug!("Airdrop {} lamports to {}: {}", lamports, address, signature);

        for poll in 1..=self.settings.airdrop_max_polls {
            tokio::time::sleep(self.settings.airdrop_poll_interval).await;
            if self.ledger.confirm_signature(&signature).await? {
                tracing::debug!("Airdrop {} confirmed after {} poll(s)", signature, poll);
                return Ok(signature);
            }
        }

        Err(HarnessError::Ledger(LedgerError::ConfirmationTimeout(
            signature.to_string(),
        )))
    }

    /// Create a mint with `payer` as fee payer and mint authority
    pub async fn create_mint(
        &self,
        payer: &Wallet,
        mint: &Wallet,
        name: &str,
    ) -> Result<Signature, HarnessError> {
        let token = &self.settings.token;
        let metadata = if token.with_metadata && token.program.supports_metadata() {
            Some(MintMetadata {
                name: name.to_string(),
                symbol: token.symbol.clone(),
                uri: token.uri.clone(),
                is_mutable: token.is_mutable,
            })
        } else {
            if token.with_metadata {
                tracing::warn!("{} mints cannot carry metadata; creating {} without it", token.program, name);
            }
            None
        };

        let params = CreateMintParams {
            payer: payer.pubkey(),
            mint: mint.pubkey(),
            mint_authority: payer.pubkey(),
            freeze_authority: None,
            decimals: token.decimals,
            metadata,
            token_program: token.program,
        };
        let layout = params.layout()?;
        let lamports = self
            .ledger
            .minimum_balance_for_rent_exemption(layout.rent_len)
            .await?;
        let instructions = create_mint_instructions(&params, lamports)?;

        let signature = self
            .submit(&format!("create mint {}", name), &instructions, payer, &[mint])
            .await?;
        tracing::info!("Mint {} created: {}", name, mint.pubkey());
        Ok(signature)
    }

    /// Mint `ui_amount` whole tokens into the owner's associated token account
    pub async fn mint_tokens(
        &self,
        payer: &Wallet,
        mint: &Pubkey,
        mint_authority: &Wallet,
        destination_owner: &Pubkey,
        ui_amount: Decimal,
    ) -> Result<Signature, HarnessError> {
        let decimals = self.settings.token.decimals;
        let params = MintTokensParams {
            payer: payer.pubkey(),
            mint: *mint,
            mint_authority: mint_authority.pubkey(),
            destination_owner: *destination_owner,
            amount: to_base_units(ui_amount, decimals)?,
            decimals,
            token_program: self.settings.token.program,
        };
        let instructions = mint_tokens_instructions(&params)?;

        self.submit(
            &format!("mint {} to {}", ui_amount, destination_owner),
            &instructions,
            payer,
            &[mint_authority],
        )
        .await
    }

    /// Open an offer: deposit `args.deposit` of mint A, ask `args.receive` of mint B
    pub async fn make(
        &self,
        maker: &Wallet,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
        args: MakeArgs,
    ) -> Result<MadeEscrow, HarnessError> {
        let token_program = self.token_program_id();
        let maker_key = maker.pubkey();
        let maker_ata_a = associated_token_address(&maker_key, mint_a, &token_program);
        let addresses = EscrowAddresses::derive(
            &self.settings.program_id,
            &maker_key,
            args.seed,
            mint_a,
            &token_program,
        );
        tracing::debug!(
            "Escrow PDA {} (bump {}), vault {}",
            addresses.escrow,
            addresses.bump,
            addresses.vault
        );

        let ix = escrow_program::make(
            &self.settings.program_id,
            &MakeAccounts {
                maker: maker_key,
                escrow: addresses.escrow,
                mint_a: *mint_a,
                mint_b: *mint_b,
                maker_ata_a,
                vault: addresses.vault,
                token_program,
            },
            &args,
        )?;

        let signature = self.submit("make", &[ix], maker, &[]).await?;
        Ok(MadeEscrow {
            signature,
            maker: maker_key,
            mint_a: *mint_a,
            mint_b: *mint_b,
            maker_ata_a,
            addresses,
            args,
        })
    }

    /// Take an offer whose accounts are already known
    pub async fn take_offer(
        &self,
        taker: &Wallet,
        maker: &Pubkey,
        escrow: &Pubkey,
        mint_a: &Pubkey,
        mint_b: &Pubkey,
    ) -> Result<TakenEscrow, HarnessError> {
        let token_program = self.token_program_id();
        let taker_key = taker.pubkey();
        let accounts = TakeAccounts {
            taker: taker_key,
            maker: *maker,
            escrow: *escrow,
            mint_a: *mint_a,
            mint_b: *mint_b,
            vault: associated_token_address(escrow, mint_a, &token_program),
            taker_ata_a: associated_token_address(&taker_key, mint_a, &token_program),
            taker_ata_b: associated_token_address(&taker_key, mint_b, &token_program),
            maker_ata_b: associated_token_address(maker, mint_b, &token_program),
            token_program,
        };
        let ix = escrow_program::take(&self.settings.program_id, &accounts)?;

        let signature = self.submit("take", &[ix], taker, &[]).await?;
        Ok(TakenEscrow {
            signature,
            taker_ata_a: accounts.taker_ata_a,
            taker_ata_b: accounts.taker_ata_b,
            maker_ata_b: accounts.maker_ata_b,
        })
    }

    /// Take the maker's offer for `seed`, reading its mints from the escrow account
    pub async fn take(
        &self,
        taker: &Wallet,
        maker: &Pubkey,
        seed: u64,
    ) -> Result<TakenEscrow, HarnessError> {
        let (escrow, _) = escrow_address(&self.settings.program_id, maker, seed);
        let state = self
            .fetch_escrow_at(&escrow)
            .await?
            .ok_or(HarnessError::EscrowNotFound(escrow))?;

        self.take_offer(taker, maker, &escrow, &state.mint_a, &state.mint_b)
            .await
    }

    /// Close the maker's offer for `seed` and return the deposit
    pub async fn refund(&self, maker: &Wallet, seed: u64) -> Result<Signature, HarnessError> {
        let (escrow, _) = escrow_address(&self.settings.program_id, &maker.pubkey(), seed);
        let state = self
            .fetch_escrow_at(&escrow)
            .await?
            .ok_or(HarnessError::EscrowNotFound(escrow))?;

        self.refund_offer(maker, &escrow, &state.mint_a).await
    }

    /// Refund an offer whose accounts are already known
    pub async fn refund_offer(
        &self,
        maker: &Wallet,
        escrow: &Pubkey,
        mint_a: &Pubkey,
    ) -> Result<Signature, HarnessError> {
        let token_program = self.token_program_id();
        let maker_key = maker.pubkey();
        let ix = escrow_program::refund(
            &self.settings.program_id,
            &RefundAccounts {
                maker: maker_key,
                escrow: *escrow,
                mint_a: *mint_a,
                vault: associated_token_address(escrow, mint_a, &token_program),
                maker_ata_a: associated_token_address(&maker_key, mint_a, &token_program),
                token_program,
            },
        )?;

        self.submit("refund", &[ix], maker, &[]).await
    }

    /// Escrow state for a maker and seed, `None` once closed
    pub async fn fetch_escrow(
        &self,
        maker: &Pubkey,
        seed: u64,
    ) -> Result<Option<EscrowState>, HarnessError> {
        let (escrow, _) = escrow_address(&self.settings.program_id, maker, seed);
        self.fetch_escrow_at(&escrow).await
    }

    async fn fetch_escrow_at(&self, escrow: &Pubkey) -> Result<Option<EscrowState>, HarnessError> {
        match self.ledger.account_data(escrow).await? {
            Some(data) => Ok(Some(EscrowState::decode(&data)?)),
            None => Ok(None),
        }
    }

    /// Sign with the fee payer plus `extra_signers`, log the explorer link, send and confirm
    async fn submit(
        &self,
        label: &str,
        instructions: &[Instruction],
        fee_payer: &Wallet,
        extra_signers: &[&Wallet],
    ) -> Result<Signature, HarnessError> {
        let blockhash = self.ledger.latest_blockhash().await?;

        let mut signers: Vec<&Keypair> = vec![fee_payer.keypair()];
        signers.extend(extra_signers.iter().map(|w| w.keypair()));
        let tx = build_signed(instructions, &fee_payer.pubkey(), &signers, blockhash)?;

        tracing::info!(
            "{} - Explorer: {}",
            label,
            self.settings.cluster.explorer_tx_link(signature_of(&tx))
        );

        let signature = self.ledger.send_and_confirm(&tx).await?;
        tracing::debug!("{} confirmed: {}", label, signature);
        Ok(signature)
    }
}
