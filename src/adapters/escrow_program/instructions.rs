//! Escrow Program Instructions
//!
//! Instruction data is an 8-byte `global:<name>` discriminator followed by the
//! arguments, little-endian. Account order follows the program's account structs.

use serde::Serialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};
use thiserror::Error;

use crate::domain::discriminator::instruction_discriminator;

#[derive(Debug, Error)]
pub enum EscrowInstructionError {
    #[error("Failed to encode instruction arguments: {0}")]
    Encode(#[from] bincode::Error),
}

/// Arguments of `make`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MakeArgs {
    pub seed: u64,
    /// Amount of mint A moved into the vault
    pub deposit: u64,
    /// Amount of mint B asked from the taker
    pub receive: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct MakeAccounts {
    pub maker: Pubkey,
    pub escrow: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub maker_ata_a: Pubkey,
    pub vault: Pubkey,
    pub token_program: Pubkey,
}

#[derive(Debug, Clone, Copy)]
pub struct TakeAccounts {
    pub taker: Pubkey,
    pub maker: Pubkey,
    pub escrow: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub vault: Pubkey,
    pub taker_ata_a: Pubkey,
    pub taker_ata_b: Pubkey,
    pub maker_ata_b: Pubkey,
    pub token_program: Pubkey,
}

#[derive(Debug, Clone, Copy)]
pub struct RefundAccounts {
    pub maker: Pubkey,
    pub escrow: Pubkey,
    pub mint_a: Pubkey,
    pub vault: Pubkey,
    pub maker_ata_a: Pubkey,
    pub token_program: Pubkey,
}

fn program_accounts(token_program: Pubkey) -> [AccountMeta; 3] {
    [
        AccountMeta::new_readonly(spl_associated_token_account::ID, false),
        AccountMeta::new_readonly(token_program, false),
        AccountMeta::new_readonly(system_program::ID, false),
    ]
}

fn instruction_data<A: Serialize>(name: &str, args: Option<&A>) -> Result<Vec<u8>, EscrowInstructionError> {
    let mut data = instruction_discriminator(name).to_vec();
    if let Some(args) = args {
        data.extend(bincode::serialize(args)?);
    }
    Ok(data)
}

/// Maker opens an offer and deposits mint A into the vault
pub fn make(
    program_id: &Pubkey,
    accounts: &MakeAccounts,
    args: &MakeArgs,
) -> Result<Instruction, EscrowInstructionError> {
    let mut metas = vec![
        AccountMeta::new(accounts.maker, true),
        AccountMeta::new(accounts.escrow, false),
        AccountMeta::new_readonly(accounts.mint_a, false),
        AccountMeta::new_readonly(accounts.mint_b, false),
        AccountMeta::new(accounts.maker_ata_a, false),
        AccountMeta::new(accounts.vault, false),
    ];
    metas.extend(program_accounts(accounts.token_program));

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data: instruction_data("make", Some(args))?,
    })
}

/// Taker pays mint B to the maker and receives the vault's mint A
pub fn take(program_id: &Pubkey, accounts: &TakeAccounts) -> Result<Instruction, EscrowInstructionError> {
    let mut metas = vec![
        AccountMeta::new(accounts.taker, true),
        AccountMeta::new(accounts.maker, false),
        AccountMeta::new(accounts.escrow, false),
        AccountMeta::new_readonly(accounts.mint_a, false),
        AccountMeta::new_readonly(accounts.mint_b, false),
        AccountMeta::new(accounts.vault, false),
        AccountMeta::new(accounts.taker_ata_a, false),
        AccountMeta::new(accounts.taker_ata_b, false),
        AccountMeta::new(accounts.maker_ata_b, false),
    ];
    metas.extend(program_accounts(accounts.token_program));

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data: instruction_data::<()>("take", None)?,
    })
}

/// Maker cancels the offer and gets the deposit back
pub fn refund(program_id: &Pubkey, accounts: &RefundAccounts) -> Result<Instruction, EscrowInstructionError> {
    let mut metas = vec![
        AccountMeta::new(accounts.maker, true),
        AccountMeta::new(accounts.escrow, false),
        AccountMeta::new_readonly(accounts.mint_a, false),
        AccountMeta::new(accounts.vault, false),
        AccountMeta::new(accounts.maker_ata_a, false),
    ];
    metas.extend(program_accounts(accounts.token_program));

    Ok(Instruction {
        program_id: *program_id,
        accounts: metas,
        data: instruction_data::<()>("refund", None)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_accounts() -> MakeAccounts {
        MakeAccounts {
            maker: Pubkey::new_unique(),
            escrow: Pubkey::new_unique(),
            mint_a: Pubkey::new_unique(),
            mint_b: Pubkey::new_unique(),
            maker_ata_a: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            token_program: spl_token_2022::ID,
        }
    }

    #[test]
    fn test_make_data_layout() {
        let program_id = Pubkey::new_unique();
        let args = MakeArgs { seed: 1, deposit: 2, receive: 3 };
        let ix = make(&program_id, &make_accounts(), &args).unwrap();

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.data.len(), 8 + 24);
        assert_eq!(ix.data[..8], instruction_discriminator("make"));
        assert_eq!(ix.data[8..16], 1u64.to_le_bytes());
        assert_eq!(ix.data[16..24], 2u64.to_le_bytes());
        assert_eq!(ix.data[24..32], 3u64.to_le_bytes());
    }

    #[test]
    fn test_make_account_flags() {
        let accounts = make_accounts();
        let ix = make(&Pubkey::new_unique(), &accounts, &MakeArgs { seed: 1, deposit: 1, receive: 1 }).unwrap();

        assert_eq!(ix.accounts.len(), 9);
        assert_eq!(ix.accounts[0].pubkey, accounts.maker);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        // only the maker signs
        assert_eq!(ix.accounts.iter().filter(|m| m.is_signer).count(), 1);
        assert!(!ix.accounts[2].is_writable);
        assert!(ix.accounts[5].is_writable);
        assert_eq!(ix.accounts[6].pubkey, spl_associated_token_account::ID);
        assert_eq!(ix.accounts[7].pubkey, spl_token_2022::ID);
        assert_eq!(ix.accounts[8].pubkey, system_program::ID);
    }

    #[test]
    fn test_take_layout() {
        let accounts = TakeAccounts {
            taker: Pubkey::new_unique(),
            maker: Pubkey::new_unique(),
            escrow: Pubkey::new_unique(),
            mint_a: Pubkey::new_unique(),
            mint_b: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            taker_ata_a: Pubkey::new_unique(),
            taker_ata_b: Pubkey::new_unique(),
            maker_ata_b: Pubkey::new_unique(),
            token_program: spl_token_2022::ID,
        };
        let ix = take(&Pubkey::new_unique(), &accounts).unwrap();

        assert_eq!(ix.data, instruction_discriminator("take").to_vec());
        assert_eq!(ix.accounts.len(), 12);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[1].pubkey, accounts.maker);
        assert!(ix.accounts[1].is_writable && !ix.accounts[1].is_signer);
        assert_eq!(ix.accounts[8].pubkey, accounts.maker_ata_b);
    }

    #[test]
    fn test_refund_layout() {
        let accounts = RefundAccounts {
            maker: Pubkey::new_unique(),
            escrow: Pubkey::new_unique(),
            mint_a: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            maker_ata_a: Pubkey::new_unique(),
            token_program: spl_token::ID,
        };
        let ix = refund(&Pubkey::new_unique(), &accounts).unwrap();

        assert_eq!(ix.data, instruction_discriminator("refund").to_vec());
        assert_eq!(ix.accounts.len(), 8);
        assert_eq!(ix.accounts[6].pubkey, spl_token::ID);
    }
}
