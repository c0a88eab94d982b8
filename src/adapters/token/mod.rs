//! Token Adapter
//!
//! Instruction builders for the test tokens: mint creation (with Token-2022
//! on-mint metadata) and minting into associated token accounts.

pub mod program;
pub mod create_mint;
pub mod mint_tokens;

pub use program::TokenProgram;
pub use create_mint::{create_mint_instructions, CreateMintParams, MintLayout, MintMetadata};
pub use mint_tokens::{mint_tokens_instructions, MintTokensParams};

use solana_sdk::program_error::ProgramError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token program error: {0}")]
    Program(#[from] ProgramError),
    #[error("Unknown token program: {0}")]
    UnknownProgram(String),
    #[error("On-mint metadata requires the token-2022 program")]
    MetadataUnsupported,
}
