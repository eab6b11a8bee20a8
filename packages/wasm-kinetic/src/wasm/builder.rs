//! WASM binding for Kinetic transaction building.
//!
//! JavaScript callers fetch the app config and a blockhash themselves, then
//! use these functions to get owner-signed wire bytes ready for the relay.

use crate::amount;
use crate::builder::{self, BlockReference, CreateAccountParams, TransferParams};
use crate::config::AppConfigMint;
use crate::error::KineticError;
use crate::keypair::SigningIdentity;
use crate::memo::{KinBinaryMemo, TransactionType};
use crate::transaction::{SerializeConfig, TransactionExt};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use super::keypair::WasmKeypair;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountRequest {
    mint: AppConfigMint,
    block: BlockReference,
    app_index: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferRequest {
    mint: AppConfigMint,
    block: BlockReference,
    app_index: u32,
    amount: String,
    destination: String,
    #[serde(default)]
    sender_create: bool,
    #[serde(default)]
    tx_type: TransactionType,
}

/// Namespace for transaction building operations.
#[wasm_bindgen]
pub struct BuilderNamespace;

#[wasm_bindgen]
impl BuilderNamespace {
    /// Build and owner-sign a create-account transaction.
    ///
    /// ```json
    /// {
    ///   "mint": { "publicKey": "...", "decimals": 5, "feePayer": "...", "addMemo": false },
    ///   "block": { "blockhash": "...", "lastValidBlockHeight": 1234 },
    ///   "appIndex": 1
    /// }
    /// ```
    ///
    /// @returns Wire bytes with the fee payer signature slot empty
    #[wasm_bindgen]
    pub fn build_create_account(params: JsValue, owner: &WasmKeypair) -> Result<Vec<u8>, JsValue> {
        let request: CreateAccountRequest = serde_wasm_bindgen::from_value(params)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse create account params: {}", e)))?;
        Ok(create_account_bytes(&request, owner.inner())?)
    }

    /// Build and owner-sign a transfer transaction.
    ///
    /// Same shape as `buildCreateAccount` plus `amount` (decimal string),
    /// `destination`, and optional `senderCreate` and `txType`
    /// (`none`, `earn`, `spend`, `p2p`).
    #[wasm_bindgen]
    pub fn build_make_transfer(params: JsValue, owner: &WasmKeypair) -> Result<Vec<u8>, JsValue> {
        let request: TransferRequest = serde_wasm_bindgen::from_value(params)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse transfer params: {}", e)))?;
        Ok(transfer_bytes(&request, owner.inner())?)
    }

    /// Base64 Kin memo for a transaction type and app index.
    #[wasm_bindgen]
    pub fn kin_memo(tx_type: JsValue, app_index: u32) -> Result<String, JsValue> {
        let tx_type: TransactionType = serde_wasm_bindgen::from_value(tx_type)
            .map_err(|e| JsValue::from_str(&format!("Invalid transaction type: {}", e)))?;
        Ok(KinBinaryMemo::for_app(tx_type, app_index)?.to_base64())
    }

    /// Convert a decimal amount to raw base units.
    #[wasm_bindgen]
    pub fn parse_amount(amount: &str, decimals: u8) -> Result<u64, KineticError> {
        amount::parse_amount(amount, decimals)
    }
}

fn create_account_bytes(
    request: &CreateAccountRequest,
    owner: &SigningIdentity,
) -> Result<Vec<u8>, KineticError> {
    let intent = builder::build_create_account(CreateAccountParams {
        mint: &request.mint,
        block: &request.block,
        app_index: request.app_index,
        owner: owner.public_key(),
    })?;
    let mut transaction = intent.transaction;
    TransactionExt::partial_sign(&mut transaction, owner)?;
    transaction.serialize_with(SerializeConfig::PARTIAL)
}

fn transfer_bytes(
    request: &TransferRequest,
    owner: &SigningIdentity,
) -> Result<Vec<u8>, KineticError> {
    let intent = builder::build_transfer(TransferParams {
        mint: &request.mint,
        amount: &request.amount,
        block: &request.block,
        destination: &request.destination,
        app_index: request.app_index,
        owner: owner.public_key(),
        sender_create: request.sender_create,
        tx_type: request.tx_type,
    })?;
    let mut transaction = intent.transaction;
    TransactionExt::partial_sign(&mut transaction, owner)?;
    transaction.serialize_with(SerializeConfig::PARTIAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{FEE_PAYER, MINT};
    use crate::transaction::Transaction;
    use serde_json::json;

    fn owner() -> SigningIdentity {
        crate::derivation::from_secret_bytes(&[21u8; 32]).unwrap()
    }

    fn mint_json() -> serde_json::Value {
        json!({ "publicKey": MINT, "decimals": 5, "feePayer": FEE_PAYER, "addMemo": true })
    }

    fn block_json() -> serde_json::Value {
        json!({ "blockhash": "GWaQEymC3Z9SHM2gkh8u12xL1zJPMHPCSVR3pSDpEXE4", "lastValidBlockHeight": 99 })
    }

    #[test]
    fn test_create_account_request() {
        let request: CreateAccountRequest = serde_json::from_value(json!({
            "mint": mint_json(),
            "block": block_json(),
            "appIndex": 1,
        }))
        .unwrap();
        let owner = owner();

        let bytes = create_account_bytes(&request, &owner).unwrap();
        let tx = Transaction::from_bytes(&bytes).unwrap();
        assert_eq!(tx.message.instructions.len(), 3);
        assert_eq!(tx.missing_signers(), vec![FEE_PAYER]);
    }

    #[test]
    fn test_transfer_request_defaults() {
        let request: TransferRequest = serde_json::from_value(json!({
            "mint": mint_json(),
            "block": block_json(),
            "appIndex": 1,
            "amount": "2.5",
            "destination": "5ZWgXcyqrrNpQHCme5SdC5hCeYb2o3fEJhF7Gok3bTVN",
        }))
        .unwrap();
        assert!(!request.sender_create);
        assert_eq!(request.tx_type, TransactionType::None);

        let bytes = transfer_bytes(&request, &owner()).unwrap();
        let tx = Transaction::from_bytes(&bytes).unwrap();
        assert_eq!(tx.message.instructions.len(), 2);
    }

    #[test]
    fn test_transfer_request_with_type() {
        let request: TransferRequest = serde_json::from_value(json!({
            "mint": mint_json(),
            "block": block_json(),
            "appIndex": 1,
            "amount": "2.5",
            "destination": "5ZWgXcyqrrNpQHCme5SdC5hCeYb2o3fEJhF7Gok3bTVN",
            "senderCreate": true,
            "txType": "spend",
        }))
        .unwrap();
        assert_eq!(request.tx_type, TransactionType::Spend);

        let bytes = transfer_bytes(&request, &owner()).unwrap();
        let tx = Transaction::from_bytes(&bytes).unwrap();
        assert_eq!(tx.message.instructions.len(), 3);
    }
}
