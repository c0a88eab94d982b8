//! Create-Mint Instructions
//!
//! Token-2022 mints carry their metadata on the mint account itself:
//! 1. `create_account` sized for a mint with the MetadataPointer extension,
//!    funded for the mint plus the metadata TLV entry written later
//! 2. metadata pointer `initialize` (pointer = the mint)
//! 3. `initialize_mint2`
//! 4. token-metadata `initialize` (name, symbol, uri)
//! 5. token-metadata `update_authority` to none, when metadata is immutable
//!
//! Legacy mints (and Token-2022 mints without metadata) only need 1 and 3.

use solana_sdk::{instruction::Instruction, program_pack::Pack, pubkey::Pubkey, system_instruction};
use spl_pod::optional_keys::OptionalNonZeroPubkey;
use spl_token_2022::extension::{metadata_pointer, ExtensionType};
use spl_token_metadata_interface::state::TokenMetadata;

use super::{TokenError, TokenProgram};

/// On-mint metadata for test tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub is_mutable: bool,
}

#[derive(Debug, Clone)]
pub struct CreateMintParams {
    pub payer: Pubkey,
    pub mint: Pubkey,
    pub mint_authority: Pubkey,
    pub freeze_authority: Option<Pubkey>,
    pub decimals: u8,
    pub metadata: Option<MintMetadata>,
    pub token_program: TokenProgram,
}

/// Account size to allocate and size to fund for rent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintLayout {
    pub space: usize,
    pub rent_len: usize,
}

impl CreateMintParams {
    pub fn layout(&self) -> Result<MintLayout, TokenError> {
        match (&self.metadata, self.token_program) {
            (Some(_), TokenProgram::Legacy) => Err(TokenError::MetadataUnsupported),
            (Some(metadata), TokenProgram::Token2022) => {
                let space = ExtensionType::try_calculate_account_len::<spl_token_2022::state::Mint>(
                    &[ExtensionType::MetadataPointer],
                )?;
                let metadata_len = self.token_metadata(metadata)?.tlv_size_of()?;
                Ok(MintLayout {
                    space,
                    rent_len: space + metadata_len,
                })
            }
            (None, _) => {
                let space = spl_token_2022::state::Mint::LEN;
                Ok(MintLayout { space, rent_len: space })
            }
        }
    }

    fn token_metadata(&self, metadata: &MintMetadata) -> Result<TokenMetadata, TokenError> {
        Ok(TokenMetadata {
            update_authority: OptionalNonZeroPubkey::try_from(Some(self.mint_authority))?,
            mint: self.mint,
            name: metadata.name.clone(),
            symbol: metadata.symbol.clone(),
            uri: metadata.uri.clone(),
            additional_metadata: Vec::new(),
        })
    }
}

/// Build the create-mint instructions; `lamports` must cover `layout().rent_len`
pub fn create_mint_instructions(
    params: &CreateMintParams,
    lamports: u64,
) -> Result<Vec<Instruction>, TokenError> {
    let layout = params.layout()?;
    let program_id = params.token_program.id();

    let mut instructions = vec![system_instruction::create_account(
        &params.payer,
        &params.mint,
        lamports,
        layout.space as u64,
        &program_id,
    )];

    if params.metadata.is_some() {
        instructions.push(metadata_pointer::instruction::initialize(
            &program_id,
            &params.mint,
            Some(params.mint_authority),
            Some(params.mint),
        )?);
    }

    instructions.push(spl_token_2022::instruction::initialize_mint2(
        &program_id,
        &params.mint,
        &params.mint_authority,
        params.freeze_authority.as_ref(),
        params.decimals,
    )?);

    if let Some(metadata) = &params.metadata {
        instructions.push(spl_token_metadata_interface::instruction::initialize(
            &program_id,
            &params.mint,
            &params.mint_authority,
            &params.mint,
            &params.mint_authority,
            metadata.name.clone(),
            metadata.symbol.clone(),
            metadata.uri.clone(),
        ));

        if !metadata.is_mutable {
            instructions.push(spl_token_metadata_interface::instruction::update_authority(
                &program_id,
                &params.mint,
                &params.mint_authority,
                OptionalNonZeroPubkey::try_from(None)?,
            ));
        }
    }

    Ok(instructions)
}
