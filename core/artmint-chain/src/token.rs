//! SPL Token program helpers: program ids, associated accounts, instructions

use crate::errors::ChainResult;
use crate::pubkey::Pubkey;
use crate::transaction::{AccountMeta, Instruction};
use once_cell::sync::Lazy;

/// SPL Token program
pub static TOKEN_PROGRAM_ID: Lazy<Pubkey> = Lazy::new(|| {
    "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        .parse()
        .expect("token program id is valid base58")
});

/// Associated Token Account program
pub static ASSOCIATED_TOKEN_PROGRAM_ID: Lazy<Pubkey> = Lazy::new(|| {
    "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        .parse()
        .expect("associated token program id is valid base58")
});

/// Token instruction discriminators
pub mod discriminator {
    pub const TRANSFER: u8 = 3;
    pub const BURN: u8 = 8;
}

/// Deterministic token account holding `owner`'s balance of `mint`
pub fn get_associated_token_address(owner: &Pubkey, mint: &Pubkey) -> ChainResult<Pubkey> {
    let (address, _bump) = Pubkey::find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )?;
    Ok(address)
}

fn amount_data(tag: u8, amount: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(9);
    data.push(tag);
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

/// Burn `amount` raw units from `account`
///
/// Accounts:
/// 0. [writable] source token account
/// 1. [writable] mint
/// 2. [signer] owner
pub fn burn(account: &Pubkey, mint: &Pubkey, owner: &Pubkey, amount: u64) -> Instruction {
    Instruction {
        program_id: *TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*account, false),
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data: amount_data(discriminator::BURN, amount),
    }
}

/// Move `amount` raw units between token accounts of the same mint
///
/// Accounts:
/// 0. [writable] source token account
/// 1. [writable] destination token account
/// 2. [signer] source owner
pub fn transfer(source: &Pubkey, destination: &Pubkey, owner: &Pubkey, amount: u64) -> Instruction {
    Instruction {
        program_id: *TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*source, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data: amount_data(discriminator::TRANSFER, amount),
    }
}

/// Human amount to raw integer units; `None` for negative, non-finite or overflowing input
pub fn ui_amount_to_raw(amount: f64, decimals: u8) -> Option<u64> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    let scaled = (amount * 10f64.powi(decimals as i32)).round();
    if scaled > u64::MAX as f64 {
        return None;
    }
    Some(scaled as u64)
}

/// Raw integer units to a human amount
pub fn raw_to_ui_amount(raw: u64, decimals: u8) -> f64 {
    raw as f64 / 10f64.powi(decimals as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_ids_parse() {
        assert_eq!(TOKEN_PROGRAM_ID.to_string(), "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
        assert_eq!(
            ASSOCIATED_TOKEN_PROGRAM_ID.to_string(),
            "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        );
    }

    #[test]
    fn test_associated_address_is_deterministic_per_mint() {
        let owner = Pubkey::new([1u8; 32]);
        let mint_a = Pubkey::new([2u8; 32]);
        let mint_b = Pubkey::new([3u8; 32]);

        let ata_a = get_associated_token_address(&owner, &mint_a).unwrap();
        assert_eq!(ata_a, get_associated_token_address(&owner, &mint_a).unwrap());
        assert_ne!(ata_a, get_associated_token_address(&owner, &mint_b).unwrap());
        assert!(!ata_a.is_on_curve());
    }

    #[test]
    fn test_burn_instruction_layout() {
        let ix = burn(&Pubkey::new([1; 32]), &Pubkey::new([2; 32]), &Pubkey::new([3; 32]), 500);
        assert_eq!(ix.program_id, *TOKEN_PROGRAM_ID);
        assert_eq!(ix.data, vec![8, 0xf4, 0x01, 0, 0, 0, 0, 0, 0]);
        assert!(ix.accounts[0].is_writable && !ix.accounts[0].is_signer);
        assert!(ix.accounts[1].is_writable);
        assert!(ix.accounts[2].is_signer && !ix.accounts[2].is_writable);
    }

    #[test]
    fn test_transfer_instruction_layout() {
        let ix = transfer(&Pubkey::new([1; 32]), &Pubkey::new([2; 32]), &Pubkey::new([3; 32]), 1);
        assert_eq!(ix.data[0], discriminator::TRANSFER);
        assert_eq!(&ix.data[1..], &1u64.to_le_bytes());
    }

    #[test]
    fn test_ui_amount_conversion() {
        assert_eq!(ui_amount_to_raw(1.5, 9), Some(1_500_000_000));
        assert_eq!(ui_amount_to_raw(0.3, 9), Some(300_000_000));
        assert_eq!(ui_amount_to_raw(0.0, 6), Some(0));
        assert_eq!(ui_amount_to_raw(-1.0, 6), None);
        assert_eq!(ui_amount_to_raw(f64::NAN, 6), None);
        assert_eq!(ui_amount_to_raw(1e30, 9), None);
        assert_eq!(raw_to_ui_amount(2_500_000, 6), 2.5);
    }
}
