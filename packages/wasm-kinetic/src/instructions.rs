//! Instruction builders for the programs Kinetic transactions touch.

use crate::error::KineticError;
use crate::memo::KinBinaryMemo;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use spl_token::instruction::{AuthorityType, TokenInstruction};
use spl_token::solana_program::program_option::COption;

/// Program IDs as base58 strings.
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const ATA_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
/// Kin memos go through the v1 memo program.
pub const MEMO_V1_PROGRAM_ID: &str = "Memo1UhkJRfHyvLMcVucJwxXeuD728EqVDDwQDxFMNo";

mod program_ids {
    use super::Pubkey;

    pub fn system_program() -> Pubkey {
        super::SYSTEM_PROGRAM_ID.parse().unwrap()
    }

    pub fn token_program() -> Pubkey {
        super::TOKEN_PROGRAM_ID.parse().unwrap()
    }

    pub fn ata_program() -> Pubkey {
        super::ATA_PROGRAM_ID.parse().unwrap()
    }

    pub fn memo_v1_program() -> Pubkey {
        super::MEMO_V1_PROGRAM_ID.parse().unwrap()
    }
}

/// Parse a base58 address, naming the field on failure.
pub fn parse_pubkey(field: &'static str, value: &str) -> Result<Pubkey, KineticError> {
    value
        .parse()
        .map_err(|_| KineticError::invalid_address(field, value))
}

/// Associated token account of `owner` for `mint`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    let token_program = program_ids::token_program();
    let seeds = &[owner.as_ref(), token_program.as_ref(), mint.as_ref()];
    let (ata, _bump) = Pubkey::find_program_address(seeds, &program_ids::ata_program());
    ata
}

/// Create the associated token account of `owner` for `mint`, paid by `payer`.
pub fn create_associated_token_account(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    let ata = associated_token_address(owner, mint);
    Instruction::new_with_bytes(
        program_ids::ata_program(),
        &[],
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(ata, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(program_ids::system_program(), false),
            AccountMeta::new_readonly(program_ids::token_program(), false),
        ],
    )
}

/// Hand the close authority of `account` to `new_authority`.
///
/// Kinetic moves it to the fee payer, which funds the account rent and can
/// then reclaim it.
pub fn set_close_authority(account: &Pubkey, new_authority: &Pubkey, owner: &Pubkey) -> Instruction {
    let data = TokenInstruction::SetAuthority {
        authority_type: AuthorityType::CloseAccount,
        new_authority: COption::Some(spl_token::solana_program::pubkey::Pubkey::new_from_array(
            new_authority.to_bytes(),
        )),
    }
    .pack();

    Instruction::new_with_bytes(
        program_ids::token_program(),
        &data,
        vec![
            AccountMeta::new(*account, false),
            AccountMeta::new_readonly(*owner, true),
        ],
    )
}

/// SPL `TransferChecked` between two token accounts.
pub fn transfer_checked(
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Instruction {
    let data = TokenInstruction::TransferChecked { amount, decimals }.pack();
    Instruction::new_with_bytes(
        program_ids::token_program(),
        &data,
        vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*owner, true),
        ],
    )
}

/// Memo v1 instruction carrying the base64 text of a Kin memo.
pub fn kin_memo(memo: &KinBinaryMemo) -> Instruction {
    Instruction::new_with_bytes(
        program_ids::memo_v1_program(),
        memo.to_base64().as_bytes(),
        vec![],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::memo::TransactionType;
    use base64::Engine;

    const OWNER: &str = "DgT9qyYwYKBRDyDw3EfR12LHQCQjtNrKu2qMsXHuosmB";
    const FEE_PAYER: &str = "FKjSjCqByQRwSzZoMXA7bKnDbJe41YgJTHFFzBeC42bH";
    const MINT: &str = "KinDesK3dYWo3R2wDk6Ucaf31tvQCCSYyL8Fuqp33GX";

    fn key(value: &str) -> Pubkey {
        value.parse().unwrap()
    }

    #[test]
    fn test_parse_pubkey_names_field() {
        let err = parse_pubkey("destination", "not-a-key").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAddress);
        assert_eq!(err.to_string(), "Invalid destination: not-a-key");
        assert_eq!(parse_pubkey("mint", MINT).unwrap(), key(MINT));
    }

    #[test]
    fn test_associated_token_address_is_deterministic() {
        let a = associated_token_address(&key(OWNER), &key(MINT));
        let b = associated_token_address(&key(OWNER), &key(MINT));
        assert_eq!(a, b);
        assert_ne!(a, associated_token_address(&key(FEE_PAYER), &key(MINT)));
    }

    #[test]
    fn test_create_associated_token_account() {
        let ix = create_associated_token_account(&key(FEE_PAYER), &key(OWNER), &key(MINT));
        assert_eq!(ix.program_id.to_string(), ATA_PROGRAM_ID);
        assert!(ix.data.is_empty());
        assert_eq!(ix.accounts.len(), 6);
        assert_eq!(ix.accounts[0].pubkey, key(FEE_PAYER));
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(
            ix.accounts[1].pubkey,
            associated_token_address(&key(OWNER), &key(MINT))
        );
        assert_eq!(ix.accounts[2].pubkey, key(OWNER));
        assert!(!ix.accounts[2].is_signer);
        assert_eq!(ix.accounts[5].pubkey.to_string(), TOKEN_PROGRAM_ID);
    }

    #[test]
    fn test_set_close_authority() {
        let account = associated_token_address(&key(OWNER), &key(MINT));
        let ix = set_close_authority(&account, &key(FEE_PAYER), &key(OWNER));
        assert_eq!(ix.program_id.to_string(), TOKEN_PROGRAM_ID);
        assert_eq!(ix.accounts[1].pubkey, key(OWNER));
        assert!(ix.accounts[1].is_signer);

        match TokenInstruction::unpack(&ix.data).unwrap() {
            TokenInstruction::SetAuthority {
                authority_type,
                new_authority,
            } => {
                assert_eq!(authority_type, AuthorityType::CloseAccount);
                let new_authority = new_authority.unwrap();
                assert_eq!(new_authority.to_bytes(), key(FEE_PAYER).to_bytes());
            }
            other => panic!("unexpected instruction {:?}", other),
        }
    }

    #[test]
    fn test_transfer_checked() {
        let source = associated_token_address(&key(OWNER), &key(MINT));
        let destination = associated_token_address(&key(FEE_PAYER), &key(MINT));
        let ix = transfer_checked(&source, &key(MINT), &destination, &key(OWNER), 1050, 5);

        assert_eq!(ix.accounts[0].pubkey, source);
        assert_eq!(ix.accounts[2].pubkey, destination);
        assert!(ix.accounts[3].is_signer);
        match TokenInstruction::unpack(&ix.data).unwrap() {
            TokenInstruction::TransferChecked { amount, decimals } => {
                assert_eq!(amount, 1050);
                assert_eq!(decimals, 5);
            }
            other => panic!("unexpected instruction {:?}", other),
        }
    }

    #[test]
    fn test_kin_memo() {
        let memo = KinBinaryMemo::for_app(TransactionType::Earn, 1).unwrap();
        let ix = kin_memo(&memo);
        assert_eq!(ix.program_id.to_string(), MEMO_V1_PROGRAM_ID);
        assert!(ix.accounts.is_empty());

        let raw = base64::engine::general_purpose::STANDARD
            .decode(&ix.data)
            .unwrap();
        assert_eq!(raw.len(), 32);
        assert_eq!(raw[0], 0x25);
        assert_eq!(raw[1], 0x04);
    }
}
