//! Escrow Account Decoding
//!
//! Account layout written by the escrow program:
//! - Offset 0-7:     account discriminator (`sha256("account:Escrow")[..8]`)
//! - Offset 8-15:    seed (u64 LE)
//! - Offset 16-47:   maker (Pubkey)
//! - Offset 48-79:   mint_a (Pubkey)
//! - Offset 80-111:  mint_b (Pubkey)
//! - Offset 112-119: receive (u64 LE)
//! - Offset 120:     bump (u8)

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use super::discriminator::{account_discriminator, DISCRIMINATOR_LEN};

/// Serialized size including the discriminator
pub const ESCROW_ACCOUNT_LEN: usize = DISCRIMINATOR_LEN + 8 + 32 * 3 + 8 + 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EscrowStateError {
    #[error("Escrow account data too short: expected {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("Account is not an escrow (discriminator mismatch)")]
    DiscriminatorMismatch,
    #[error("Malformed escrow account: {0}")]
    Malformed(String),
}

/// On-chain escrow offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowState {
    pub seed: u64,
    pub maker: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    /// Amount of mint B the maker wants in return
    pub receive: u64,
    pub bump: u8,
}

impl EscrowState {
    pub fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator("Escrow")
    }

    pub fn decode(data: &[u8]) -> Result<Self, EscrowStateError> {
        if data.len() < ESCROW_ACCOUNT_LEN {
            return Err(EscrowStateError::TooShort {
                expected: ESCROW_ACCOUNT_LEN,
                actual: data.len(),
            });
        }
        if data[..DISCRIMINATOR_LEN] != Self::discriminator() {
            return Err(EscrowStateError::DiscriminatorMismatch);
        }

        bincode::deserialize(&data[DISCRIMINATOR_LEN..])
            .map_err(|e| EscrowStateError::Malformed(e.to_string()))
    }

    /// Account bytes as the program writes them
    pub fn encode(&self) -> Result<Vec<u8>, EscrowStateError> {
        let mut data = Vec::with_capacity(ESCROW_ACCOUNT_LEN);
        data.extend_from_slice(&Self::discriminator());
        bincode::serialize_into(&mut data, self)
            .map_err(|e| EscrowStateError::Malformed(e.to_string()))?;
        Ok(data)
    }
}
