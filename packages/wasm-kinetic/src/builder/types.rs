//! Types for transaction building.
//!
//! Public keys are carried as base58 strings, the way they arrive from the
//! Kinetic API and from JavaScript callers.

use crate::config::AppConfigMint;
use crate::memo::TransactionType;
use serde::{Deserialize, Serialize};
use solana_sdk::transaction::Transaction;

/// Recent blockhash with the last block height at which it is accepted.
///
/// Response of `GET /api/transaction/latest-blockhash/{environment}/{index}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockReference {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    CreateAccount,
    Transfer,
}

/// Inputs for a token account creation.
#[derive(Debug, Clone, Copy)]
pub struct CreateAccountParams<'a> {
    pub mint: &'a AppConfigMint,
    pub block: &'a BlockReference,
    pub app_index: u32,
    /// Owner public key (base58).
    pub owner: &'a str,
}

/// Inputs for a token transfer.
#[derive(Debug, Clone, Copy)]
pub struct TransferParams<'a> {
    pub mint: &'a AppConfigMint,
    /// Decimal amount, e.g. `"10.5"`.
    pub amount: &'a str,
    pub block: &'a BlockReference,
    /// Destination wallet (not token account) public key.
    pub destination: &'a str,
    pub app_index: u32,
    pub owner: &'a str,
    /// Create the destination token account as part of the transfer.
    pub sender_create: bool,
    pub tx_type: TransactionType,
}

/// A built transaction that still needs the owner's signature.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedTransactionIntent {
    pub kind: TransactionKind,
    pub mint: String,
    pub owner: String,
    pub destination: Option<String>,
    /// Raw base units.
    pub amount: Option<u64>,
    pub sender_create: bool,
    /// The 32-byte Kin memo, when one was attached.
    pub memo: Option<Vec<u8>>,
    pub last_valid_block_height: u64,
    pub transaction: Transaction,
}
