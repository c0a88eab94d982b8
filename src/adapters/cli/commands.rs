//! CLI Command Definitions
//!
//! Every command reads the same TOML config; keypair flags default to the
//! config's `[wallet] keypair_path`.

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::adapters::token::TokenProgram;
use crate::config::Finish;

/// Escrow Harness - drive the escrow program end to end on a Solana cluster
#[derive(Parser, Debug)]
#[command(
    name = "escrow-harness",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "End-to-end harness for the escrow program",
    long_about = "Funds signers, creates test token mints, derives the escrow PDA and vault, \
                  and submits make/take/refund transactions against a Solana cluster \
                  (normally a local test validator)."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE", default_value = "config/localnet.toml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override the config's token program ("token-2022" or "token")
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub token_program: Option<TokenProgram>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full scenario: fund, mint, make, then take or refund
    Scenario(ScenarioCmd),

    /// Airdrop SOL to an address and wait for confirmation
    Airdrop(AirdropCmd),

    /// Create a test token mint
    CreateMint(CreateMintCmd),

    /// Mint test tokens into an owner's associated token account
    Mint(MintCmd),

    /// Open an escrow offer
    Make(MakeCmd),

    /// Take an open escrow offer
    Take(TakeCmd),

    /// Refund an open escrow offer to its maker
    Refund(RefundCmd),

    /// Show an escrow account
    Show(ShowCmd),
}

/// How the scenario settles the offer
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinishArg {
    Take,
    Refund,
    None,
}

impl From<FinishArg> for Finish {
    fn from(arg: FinishArg) -> Self {
        match arg {
            FinishArg::Take => Finish::Take,
            FinishArg::Refund => Finish::Refund,
            FinishArg::None => Finish::None,
        }
    }
}

/// Run the end-to-end scenario
#[derive(Parser, Debug)]
pub struct ScenarioCmd {
    /// Override the escrow seed
    #[arg(long, value_name = "SEED", conflicts_with = "random_seed")]
    pub seed: Option<u64>,

    /// Use a random escrow seed
    #[arg(long)]
    pub random_seed: bool,

    /// Override how the offer is settled
    #[arg(long, value_enum)]
    pub finish: Option<FinishArg>,

    /// Skip post-settlement balance checks
    #[arg(long)]
    pub no_verify: bool,

    /// Write the JSON report to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

/// Airdrop SOL
#[derive(Parser, Debug)]
pub struct AirdropCmd {
    /// Recipient address
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Amount in SOL
    #[arg(long, value_name = "SOL", default_value = "5")]
    pub sol: Decimal,
}

/// Create a mint
#[derive(Parser, Debug)]
pub struct CreateMintCmd {
    /// Token name written to the mint metadata
    #[arg(long, value_name = "NAME", default_value = "Mint A")]
    pub name: String,

    /// Fee payer and mint authority keypair
    #[arg(long, value_name = "FILE")]
    pub payer: Option<PathBuf>,

    /// Save the generated mint keypair here
    #[arg(long, value_name = "FILE")]
    pub save_mint: Option<PathBuf>,
}

/// Mint tokens
#[derive(Parser, Debug)]
pub struct MintCmd {
    /// Mint address
    #[arg(value_name = "MINT")]
    pub mint: String,

    /// Owner of the destination associated token account
    #[arg(value_name = "OWNER")]
    pub owner: String,

    /// Whole tokens to mint
    #[arg(value_name = "AMOUNT")]
    pub amount: Decimal,

    /// Fee payer and mint authority keypair
    #[arg(long, value_name = "FILE")]
    pub authority: Option<PathBuf>,
}

/// Open an offer
#[derive(Parser, Debug)]
pub struct MakeCmd {
    /// Mint the maker deposits
    #[arg(value_name = "MINT_A")]
    pub mint_a: String,

    /// Mint the maker wants in return
    #[arg(value_name = "MINT_B")]
    pub mint_b: String,

    /// Escrow seed
    #[arg(long, value_name = "SEED", default_value = "1")]
    pub seed: u64,

    /// Base units of mint A deposited
    #[arg(long, value_name = "AMOUNT", default_value = "1")]
    pub deposit: u64,

    /// Base units of mint B requested
    #[arg(long, value_name = "AMOUNT", default_value = "1")]
    pub receive: u64,

    /// Maker keypair
    #[arg(long, value_name = "FILE")]
    pub maker: Option<PathBuf>,
}

/// Take an offer
#[derive(Parser, Debug)]
pub struct TakeCmd {
    /// Maker address
    #[arg(value_name = "MAKER")]
    pub maker: String,

    /// Escrow seed
    #[arg(long, value_name = "SEED", default_value = "1")]
    pub seed: u64,

    /// Taker keypair
    #[arg(long, value_name = "FILE")]
    pub taker: Option<PathBuf>,
}

/// Refund an offer
#[derive(Parser, Debug)]
pub struct RefundCmd {
    /// Escrow seed
    #[arg(long, value_name = "SEED", default_value = "1")]
    pub seed: u64,

    /// Maker keypair
    #[arg(long, value_name = "FILE")]
    pub maker: Option<PathBuf>,
}

/// Show an escrow
#[derive(Parser, Debug)]
pub struct ShowCmd {
    /// Maker address
    #[arg(value_name = "MAKER")]
    pub maker: String,

    /// Escrow seed
    #[arg(long, value_name = "SEED", default_value = "1")]
    pub seed: u64,
}
