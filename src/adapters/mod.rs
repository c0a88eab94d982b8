//! Adapters Layer - External System Implementations
//!
//! - Solana: RPC client, wallets and transaction signing
//! - Token: mint creation and minting instruction builders
//! - Escrow program: make/take/refund instruction builders
//! - CLI: Command-line interface definitions

pub mod solana;
pub mod token;
pub mod escrow_program;
pub mod cli;

pub use solana::{SolanaClient, Wallet};
pub use token::TokenProgram;
pub use cli::CliApp;
