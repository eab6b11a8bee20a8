//! Program IDs and helpers exported via WASM.

use wasm_bindgen::prelude::*;

use crate::client::USER_AGENT;
use crate::instructions::{
    self, parse_pubkey, ATA_PROGRAM_ID, MEMO_V1_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};

/// System Program ID
#[wasm_bindgen]
pub fn system_program_id() -> String {
    SYSTEM_PROGRAM_ID.to_string()
}

/// Token Program ID (SPL Token)
#[wasm_bindgen]
pub fn token_program_id() -> String {
    TOKEN_PROGRAM_ID.to_string()
}

/// Associated Token Account Program ID
#[wasm_bindgen]
pub fn ata_program_id() -> String {
    ATA_PROGRAM_ID.to_string()
}

/// Memo v1 Program ID, which carries Kin memos
#[wasm_bindgen]
pub fn memo_v1_program_id() -> String {
    MEMO_V1_PROGRAM_ID.to_string()
}

/// Value sent in the `kinetic-user-agent` header
#[wasm_bindgen]
pub fn kinetic_user_agent() -> String {
    USER_AGENT.to_string()
}

/// Derive the Associated Token Account address for a wallet and mint.
///
/// @param wallet_address - Owner wallet address (base58)
/// @param mint_address - Token mint address (base58)
/// @returns The derived ATA address (base58)
#[wasm_bindgen]
pub fn get_associated_token_address(
    wallet_address: &str,
    mint_address: &str,
) -> Result<String, JsValue> {
    let wallet = parse_pubkey("wallet address", wallet_address)?;
    let mint = parse_pubkey("mint address", mint_address)?;
    Ok(instructions::associated_token_address(&wallet, &mint).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_matches_http_header() {
        assert_eq!(kinetic_user_agent(), USER_AGENT);
        assert!(USER_AGENT.starts_with("wasm-kinetic@"));
    }
}
