//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config/localnet.toml.

use rust_decimal::Decimal;
use serde::Deserialize;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::adapters::token::TokenProgram;
use crate::domain::Cluster;

/// Main configuration structure matching config/localnet.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cluster: ClusterSection,
    pub program: ProgramSection,
    #[serde(default)]
    pub wallet: WalletSection,
    #[serde(default)]
    pub token: TokenSection,
    #[serde(default)]
    pub scenario: ScenarioSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Cluster connection section
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterSection {
    /// "localnet", "devnet", "testnet", "mainnet" or an RPC URL
    #[serde(default = "default_url_or_moniker")]
    pub url_or_moniker: String,
    /// Commitment level: "processed", "confirmed", "finalized"
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

impl Default for ClusterSection {
    fn default() -> Self {
        Self {
            url_or_moniker: default_url_or_moniker(),
            commitment: default_commitment(),
        }
    }
}

impl ClusterSection {
    /// Cluster with ESCROW_RPC_URL env override
    pub fn cluster(&self) -> Result<Cluster, ConfigError> {
        let raw = std::env::var("ESCROW_RPC_URL").unwrap_or_else(|_| self.url_or_moniker.clone());
        Cluster::from_str(&raw).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig, ConfigError> {
        CommitmentConfig::from_str(&self.commitment).map_err(|_| {
            ConfigError::ValidationError(format!(
                "commitment must be processed, confirmed or finalized, got {}",
                self.commitment
            ))
        })
    }
}

/// Escrow program section
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramSection {
    /// Deployed escrow program id
    pub program_id: String,
}

impl ProgramSection {
    /// Program id with ESCROW_PROGRAM_ID env override
    pub fn program_id(&self) -> Result<Pubkey, ConfigError> {
        let raw = std::env::var("ESCROW_PROGRAM_ID").unwrap_or_else(|_| self.program_id.clone());
        Pubkey::from_str(raw.trim())
            .map_err(|e| ConfigError::ValidationError(format!("program_id {} is invalid: {}", raw, e)))
    }
}

/// Wallet section (single-step commands)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletSection {
    /// Fee payer keypair path; `~` is expanded
    #[serde(default)]
    pub keypair_path: Option<String>,
}

impl WalletSection {
    /// Keypair path with ESCROW_KEYPAIR_PATH env override
    pub fn keypair_path(&self) -> Option<String> {
        std::env::var("ESCROW_KEYPAIR_PATH")
            .ok()
            .or_else(|| self.keypair_path.clone())
            .map(|p| shellexpand::tilde(&p).to_string())
    }

    /// Signer for single-step commands.
    ///
    /// An explicit path wins, then ESCROW_SECRET_KEY, then [`Self::keypair_path`].
    pub fn signer_source(&self, explicit: Option<&Path>) -> Option<SignerSource> {
        if let Some(path) = explicit {
            return Some(SignerSource::File(path.to_path_buf()));
        }
        if let Ok(secret) = std::env::var("ESCROW_SECRET_KEY") {
            return Some(SignerSource::Base58(secret));
        }
        self.keypair_path().map(|p| SignerSource::File(PathBuf::from(p)))
    }
}

/// Where a signer's key pair is read from
#[derive(Clone, PartialEq, Eq)]
pub enum SignerSource {
    /// Solana CLI key file
    File(PathBuf),
    /// Base58 secret from ESCROW_SECRET_KEY
    Base58(String),
}

impl fmt::Debug for SignerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerSource::File(path) => f.debug_tuple("File").field(path).finish(),
            SignerSource::Base58(_) => f.write_str("Base58(<redacted>)"),
        }
    }
}

/// Test token section
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSection {
    #[serde(default)]
    pub program: TokenProgram,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_true")]
    pub is_mutable: bool,
    /// Write name/symbol/uri onto token-2022 mints
    #[serde(default = "default_true")]
    pub with_metadata: bool,
}

impl Default for TokenSection {
    fn default() -> Self {
        Self {
            program: TokenProgram::default(),
            decimals: default_decimals(),
            symbol: default_symbol(),
            uri: default_uri(),
            is_mutable: true,
            with_metadata: true,
        }
    }
}

/// How the scenario settles the offer after `make`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    #[default]
    Take,
    Refund,
    None,
}

/// End-to-end scenario section
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSection {
    /// Lamports airdropped to each generated signer
    #[serde(default = "default_airdrop_lamports")]
    pub airdrop_lamports: u64,
    /// Wait between airdrop confirmation checks
    #[serde(default = "default_airdrop_poll_interval_ms")]
    pub airdrop_poll_interval_ms: u64,
    #[serde(default = "default_airdrop_max_polls")]
    pub airdrop_max_polls: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Base units of mint A deposited by the maker
    #[serde(default = "default_one")]
    pub deposit: u64,
    /// Base units of mint B asked from the taker
    #[serde(default = "default_one")]
    pub receive: u64,
    /// Whole tokens minted to each party before the offer
    #[serde(default = "default_mint_amount")]
    pub mint_amount: Decimal,
    #[serde(default)]
    pub finish: Finish,
    /// Check balances and escrow closure after settlement
    #[serde(default = "default_true")]
    pub verify: bool,
}

impl Default for ScenarioSection {
    fn default() -> Self {
        Self {
            airdrop_lamports: default_airdrop_lamports(),
            airdrop_poll_interval_ms: default_airdrop_poll_interval_ms(),
            airdrop_max_polls: default_airdrop_max_polls(),
            seed: default_seed(),
            deposit: default_one(),
            receive: default_one(),
            mint_amount: default_mint_amount(),
            finish: Finish::default(),
            verify: true,
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_url_or_moniker() -> String {
    "localnet".to_string()
}
fn default_commitment() -> String {
    "confirmed".to_string()
}
fn default_decimals() -> u8 {
    10
}
fn default_symbol() -> String {
    "TEST".to_string()
}
fn default_uri() -> String {
    "https://example.com/metadata.json".to_string()
}
fn default_true() -> bool {
    true
}
fn default_airdrop_lamports() -> u64 {
    5_000_000_000
}
fn default_airdrop_poll_interval_ms() -> u64 {
    2_000
}
fn default_airdrop_max_polls() -> u32 {
    15
}
fn default_seed() -> u64 {
    1
}
fn default_one() -> u64 {
    1
}
fn default_mint_amount() -> Decimal {
    Decimal::TEN
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cluster.cluster()?;
        self.cluster.commitment_config()?;
        self.program.program_id()?;

        if self.token.decimals > crate::domain::amount::MAX_DECIMALS {
            return Err(ConfigError::ValidationError(format!(
                "decimals must be <= {}, got {}",
                crate::domain::amount::MAX_DECIMALS,
                self.token.decimals
            )));
        }

        if self.token.symbol.is_empty() {
            return Err(ConfigError::ValidationError(
                "symbol cannot be empty".to_string(),
            ));
        }

        if self.scenario.airdrop_lamports == 0 {
            return Err(ConfigError::ValidationError(
                "airdrop_lamports must be > 0".to_string(),
            ));
        }

        if self.scenario.airdrop_max_polls == 0 {
            return Err(ConfigError::ValidationError(
                "airdrop_max_polls must be > 0".to_string(),
            ));
        }

        if self.scenario.deposit == 0 || self.scenario.receive == 0 {
            return Err(ConfigError::ValidationError(format!(
                "deposit and receive must be > 0, got {} and {}",
                self.scenario.deposit, self.scenario.receive
            )));
        }

        let minted = crate::domain::to_base_units(self.scenario.mint_amount, self.token.decimals)
            .map_err(|e| ConfigError::ValidationError(format!("mint_amount: {}", e)))?;
        if minted < self.scenario.deposit.max(self.scenario.receive) {
            return Err(ConfigError::ValidationError(format!(
                "mint_amount ({} base units) must cover deposit {} and receive {}",
                minted, self.scenario.deposit, self.scenario.receive
            )));
        }

        Ok(())
    }
}
