use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;

use super::{TokenError, TokenProgram};
use crate::domain::associated_token_address;

#[derive(Debug, Clone)]
pub struct MintTokensParams {
    pub payer: Pubkey,
    pub mint: Pubkey,
    pub mint_authority: Pubkey,
    /// Wallet that owns the destination ATA
    pub destination_owner: Pubkey,
    /// Base units
    pub amount: u64,
    pub decimals: u8,
    pub token_program: TokenProgram,
}

impl MintTokensParams {
    pub fn destination_ata(&self) -> Pubkey {
        associated_token_address(&self.destination_owner, &self.mint, &self.token_program.id())
    }
}

/// Idempotently create the owner's ATA, then `mint_to_checked` into it
pub fn mint_tokens_instructions(params: &MintTokensParams) -> Result<Vec<Instruction>, TokenError> {
    let program_id = params.token_program.id();
    let destination = params.destination_ata();

    let create_ata = create_associated_token_account_idempotent(
        &params.payer,
        &params.destination_owner,
        &params.mint,
        &program_id,
    );

    let mint_to = spl_token_2022::instruction::mint_to_checked(
        &program_id,
        &params.mint,
        &destination,
        &params.mint_authority,
        &[],
        params.amount,
        params.decimals,
    )?;

    Ok(vec![create_ata, mint_to])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_into_owner_ata() {
        let params = MintTokensParams {
            payer: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            mint_authority: Pubkey::new_unique(),
            destination_owner: Pubkey::new_unique(),
            amount: 100_000_000_000,
            decimals: 10,
            token_program: TokenProgram::Token2022,
        };

        let ixs = mint_tokens_instructions(&params).unwrap();
        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, spl_associated_token_account::ID);

        let mint_to = &ixs[1];
        assert_eq!(mint_to.program_id, spl_token_2022::ID);
        assert_eq!(mint_to.accounts[0].pubkey, params.mint);
        assert_eq!(mint_to.accounts[1].pubkey, params.destination_ata());
        assert_eq!(mint_to.accounts[2].pubkey, params.mint_authority);
        assert!(mint_to.accounts[2].is_signer);
    }
}
