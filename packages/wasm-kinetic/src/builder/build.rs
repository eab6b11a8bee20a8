//! Transaction building implementation.
//!
//! Uses the Solana SDK for message compilation and account ordering.

use crate::amount::parse_amount;
use crate::error::KineticError;
use crate::instructions::{self, parse_pubkey};
use crate::memo::{KinBinaryMemo, TransactionType};

use super::types::{
    BlockReference, CreateAccountParams, TransactionKind, TransferParams,
    UnsignedTransactionIntent,
};

use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

/// Build the transaction that opens `owner`'s token account for the mint.
///
/// Instructions: optional Kin memo, create associated token account, then
/// hand the account's close authority to the fee payer.
pub fn build_create_account(
    params: CreateAccountParams,
) -> Result<UnsignedTransactionIntent, KineticError> {
    let mint = parse_pubkey("mint", &params.mint.public_key)?;
    let fee_payer = parse_pubkey("feePayer", &params.mint.fee_payer)?;
    let owner = parse_pubkey("owner", params.owner)?;

    let mut instructions: Vec<Instruction> = Vec::new();

    let memo = if params.mint.add_memo {
        let memo = KinBinaryMemo::for_app(TransactionType::None, params.app_index)?;
        instructions.push(instructions::kin_memo(&memo));
        Some(memo.as_bytes().to_vec())
    } else {
        None
    };

    let owner_token_account = instructions::associated_token_address(&owner, &mint);
    instructions.push(instructions::create_associated_token_account(
        &fee_payer, &owner, &mint,
    ));
    instructions.push(instructions::set_close_authority(
        &owner_token_account,
        &fee_payer,
        &owner,
    ));

    Ok(UnsignedTransactionIntent {
        kind: TransactionKind::CreateAccount,
        mint: params.mint.public_key.clone(),
        owner: params.owner.to_string(),
        destination: None,
        amount: None,
        sender_create: false,
        memo,
        last_valid_block_height: params.block.last_valid_block_height,
        transaction: compile(&instructions, &fee_payer, params.block)?,
    })
}

/// Build a `TransferChecked` from `owner`'s token account to the
/// destination's, optionally creating the destination account first.
pub fn build_transfer(params: TransferParams) -> Result<UnsignedTransactionIntent, KineticError> {
    let mint = parse_pubkey("mint", &params.mint.public_key)?;
    let fee_payer = parse_pubkey("feePayer", &params.mint.fee_payer)?;
    let owner = parse_pubkey("owner", params.owner)?;
    let destination = parse_pubkey("destination", params.destination)?;
    let amount = parse_amount(params.amount, params.mint.decimals)?;

    let mut instructions: Vec<Instruction> = Vec::new();

    let memo = if params.mint.add_memo {
        let memo = KinBinaryMemo::for_app(params.tx_type, params.app_index)?;
        instructions.push(instructions::kin_memo(&memo));
        Some(memo.as_bytes().to_vec())
    } else {
        None
    };

    if params.sender_create {
        instructions.push(instructions::create_associated_token_account(
            &fee_payer,
            &destination,
            &mint,
        ));
    }

    let source_token_account = instructions::associated_token_address(&owner, &mint);
    let destination_token_account = instructions::associated_token_address(&destination, &mint);
    instructions.push(instructions::transfer_checked(
        &source_token_account,
        &mint,
        &destination_token_account,
        &owner,
        amount,
        params.mint.decimals,
    ));

    Ok(UnsignedTransactionIntent {
        kind: TransactionKind::Transfer,
        mint: params.mint.public_key.clone(),
        owner: params.owner.to_string(),
        destination: Some(params.destination.to_string()),
        amount: Some(amount),
        sender_create: params.sender_create,
        memo,
        last_valid_block_height: params.block.last_valid_block_height,
        transaction: compile(&instructions, &fee_payer, params.block)?,
    })
}

fn compile(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    block: &BlockReference,
) -> Result<Transaction, KineticError> {
    let blockhash: Hash = block
        .blockhash
        .parse()
        .map_err(|_| KineticError::invalid_address("blockhash", &block.blockhash))?;

    // Message handles account ordering: fee payer first, then signers
    let message = Message::new_with_blockhash(instructions, Some(fee_payer), &blockhash);
    Ok(Transaction::new_unsigned(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{test_mint, FEE_PAYER, MINT};
    use crate::config::AppConfigMint;
    use crate::error::ErrorKind;
    use crate::instructions::{ATA_PROGRAM_ID, MEMO_V1_PROGRAM_ID, TOKEN_PROGRAM_ID};
    use spl_token::instruction::TokenInstruction;

    const OWNER: &str = "DgT9qyYwYKBRDyDw3EfR12LHQCQjtNrKu2qMsXHuosmB";
    const DESTINATION: &str = "5ZWgXcyqrrNpQHCme5SdC5hCeYb2o3fEJhF7Gok3bTVN";
    const BLOCKHASH: &str = "GWaQEymC3Z9SHM2gkh8u12xL1zJPMHPCSVR3pSDpEXE4";

    fn block() -> BlockReference {
        BlockReference {
            blockhash: BLOCKHASH.to_string(),
            last_valid_block_height: 1000,
        }
    }

    fn program_ids(tx: &Transaction) -> Vec<String> {
        tx.message
            .instructions
            .iter()
            .map(|ix| tx.message.account_keys[ix.program_id_index as usize].to_string())
            .collect()
    }

    fn transfer_params<'a>(
        mint: &'a AppConfigMint,
        block: &'a BlockReference,
        sender_create: bool,
    ) -> TransferParams<'a> {
        TransferParams {
            mint,
            amount: "10.5",
            block,
            destination: DESTINATION,
            app_index: 1,
            owner: OWNER,
            sender_create,
            tx_type: TransactionType::P2P,
        }
    }

    #[test]
    fn test_create_account_with_memo() {
        let mint = test_mint(MINT, 5, true);
        let block = block();
        let intent = build_create_account(CreateAccountParams {
            mint: &mint,
            block: &block,
            app_index: 1,
            owner: OWNER,
        })
        .unwrap();

        assert_eq!(intent.kind, TransactionKind::CreateAccount);
        assert_eq!(intent.last_valid_block_height, 1000);
        assert_eq!(intent.memo.as_ref().unwrap().len(), 32);
        assert_eq!(
            program_ids(&intent.transaction),
            vec![MEMO_V1_PROGRAM_ID, ATA_PROGRAM_ID, TOKEN_PROGRAM_ID]
        );

        let message = &intent.transaction.message;
        assert_eq!(message.account_keys[0].to_string(), FEE_PAYER);
        assert_eq!(message.recent_blockhash.to_string(), BLOCKHASH);
        // fee payer and owner
        assert_eq!(message.header.num_required_signatures, 2);
    }

    #[test]
    fn test_create_account_without_memo() {
        let mint = test_mint(MINT, 5, false);
        let block = block();
        let intent = build_create_account(CreateAccountParams {
            mint: &mint,
            block: &block,
            app_index: 1,
            owner: OWNER,
        })
        .unwrap();

        assert!(intent.memo.is_none());
        assert_eq!(
            program_ids(&intent.transaction),
            vec![ATA_PROGRAM_ID, TOKEN_PROGRAM_ID]
        );
    }

    #[test]
    fn test_transfer_instruction_order() {
        let mint = test_mint(MINT, 5, true);
        let block = block();
        let intent = build_transfer(transfer_params(&mint, &block, true)).unwrap();

        assert_eq!(
            program_ids(&intent.transaction),
            vec![MEMO_V1_PROGRAM_ID, ATA_PROGRAM_ID, TOKEN_PROGRAM_ID]
        );
        assert_eq!(intent.amount, Some(1_050_000));
        assert_eq!(intent.destination.as_deref(), Some(DESTINATION));
        assert!(intent.sender_create);

        // P2P memo header: magic 1 | version 1 << 2 | type 3 << 5
        assert_eq!(intent.memo.as_ref().unwrap()[0], 0x65);
    }

    #[test]
    fn test_transfer_instruction_counts() {
        let block = block();
        for (add_memo, sender_create, expected) in [
            (false, false, 1),
            (true, false, 2),
            (false, true, 2),
            (true, true, 3),
        ] {
            let mint = test_mint(MINT, 5, add_memo);
            let intent = build_transfer(transfer_params(&mint, &block, sender_create)).unwrap();
            assert_eq!(intent.transaction.message.instructions.len(), expected);
        }
    }

    #[test]
    fn test_transfer_checked_data() {
        let mint = test_mint(MINT, 2, false);
        let block = block();
        let intent = build_transfer(transfer_params(&mint, &block, false)).unwrap();

        let ix = &intent.transaction.message.instructions[0];
        match TokenInstruction::unpack(&ix.data).unwrap() {
            TokenInstruction::TransferChecked { amount, decimals } => {
                assert_eq!(amount, 1050);
                assert_eq!(decimals, 2);
            }
            other => panic!("unexpected instruction {:?}", other),
        }
        assert_eq!(
            intent.transaction.message.account_keys[0].to_string(),
            FEE_PAYER
        );
    }

    #[test]
    fn test_transfer_rejects_excess_decimals() {
        let mint = test_mint(MINT, 0, false);
        let block = block();
        let err = build_transfer(transfer_params(&mint, &block, false)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    }

    #[test]
    fn test_invalid_addresses() {
        let mint = test_mint(MINT, 5, false);
        let block = block();

        let mut params = transfer_params(&mint, &block, false);
        params.destination = "invalid";
        let err = build_transfer(params).unwrap_err();
        assert_eq!(err.to_string(), "Invalid destination: invalid");

        let bad_block = BlockReference {
            blockhash: "not-a-hash".to_string(),
            last_valid_block_height: 1,
        };
        let err = build_transfer(transfer_params(&mint, &bad_block, false)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAddress);
    }

    #[test]
    fn test_memo_app_index_out_of_range() {
        let mint = test_mint(MINT, 5, true);
        let block = block();
        let mut params = transfer_params(&mint, &block, false);
        params.app_index = 1 << 16;
        assert_eq!(
            build_transfer(params).unwrap_err().kind(),
            ErrorKind::InvalidMemo
        );
    }
}
