//! Escrow Address Derivation
//!
//! The escrow account is a PDA of the escrow program seeded by
//! `["escrow", maker, seed (u64 LE)]`. The vault is the escrow's associated
//! token account for mint A.

use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address_with_program_id;

/// Static seed prefix of the escrow PDA
pub const ESCROW_SEED: &[u8] = b"escrow";

/// Escrow PDA, its bump and the vault it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscrowAddresses {
    pub escrow: Pubkey,
    pub bump: u8,
    pub vault: Pubkey,
}

impl EscrowAddresses {
    pub fn derive(
        program_id: &Pubkey,
        maker: &Pubkey,
        seed: u64,
        mint_a: &Pubkey,
        token_program: &Pubkey,
    ) -> Self {
        let (escrow, bump) = escrow_address(program_id, maker, seed);
        let vault = vault_address(&escrow, mint_a, token_program);
        Self { escrow, bump, vault }
    }
}

/// Derive the escrow PDA for a maker and seed
pub fn escrow_address(program_id: &Pubkey, maker: &Pubkey, seed: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[ESCROW_SEED, maker.as_ref(), &seed.to_le_bytes()],
        program_id,
    )
}

/// Vault = ATA(owner = escrow, mint = mint A)
pub fn vault_address(escrow: &Pubkey, mint_a: &Pubkey, token_program: &Pubkey) -> Pubkey {
    associated_token_address(escrow, mint_a, token_program)
}

pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, token_program)
}
