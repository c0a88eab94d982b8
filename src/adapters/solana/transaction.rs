//! Legacy transaction assembly and signing.

use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};

use super::wallet::WalletError;

/// Build a legacy transaction paid by `fee_payer` and sign it with every signer.
///
/// `signers` must include the fee payer's key pair; missing or extra signers are
/// reported as `WalletError::SigningError`.
pub fn build_signed(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    signers: &[&Keypair],
    blockhash: Hash,
) -> Result<Transaction, WalletError> {
    let mut tx = Transaction::new_with_payer(instructions, Some(fee_payer));
    tx.try_sign(signers, blockhash)
        .map_err(|e| WalletError::SigningError(e.to_string()))?;
    Ok(tx)
}

/// Fee payer signature, which is the transaction id
pub fn signature_of(tx: &Transaction) -> Signature {
    tx.signatures.first().copied().unwrap_or_default()
}
