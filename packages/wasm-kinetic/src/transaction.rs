//! Signing and wire encoding of Kinetic transactions.
//!
//! Kinetic transactions are signed twice: the owner signs on the client and
//! the relay adds the fee payer's signature before broadcasting. The client
//! therefore serializes a partially signed transaction with the fee payer's
//! slot left empty.

use crate::error::KineticError;
use crate::keypair::SigningIdentity;
use base64::Engine;
use solana_address::Address;
use solana_signature::Signature;
use std::str::FromStr;

/// Re-export the underlying Solana Transaction type.
pub use solana_transaction::Transaction;

/// Checks applied by [`TransactionExt::serialize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeConfig {
    pub require_all_signatures: bool,
    pub verify_signatures: bool,
}

impl SerializeConfig {
    /// What the relay expects: missing fee payer signature, nothing verified.
    pub const PARTIAL: SerializeConfig = SerializeConfig {
        require_all_signatures: false,
        verify_signatures: false,
    };
}

impl Default for SerializeConfig {
    fn default() -> Self {
        SerializeConfig {
            require_all_signatures: true,
            verify_signatures: true,
        }
    }
}

pub trait TransactionExt {
    /// Deserialize a transaction from raw bytes (wire format).
    fn from_bytes(bytes: &[u8]) -> Result<Transaction, KineticError>;

    fn fee_payer_string(&self) -> Option<String>;

    fn blockhash_string(&self) -> String;

    /// Get the signable message bytes (what gets signed).
    fn signable_payload(&self) -> Vec<u8>;

    /// Serialize without any signature checks.
    fn to_bytes(&self) -> Result<Vec<u8>, KineticError>;

    /// Serialize, first enforcing the checks in `config`.
    fn serialize_with(&self, config: SerializeConfig) -> Result<Vec<u8>, KineticError>;

    /// Relay payload: partially signed wire bytes, base64 encoded.
    fn to_base64(&self) -> Result<String, KineticError>;

    /// Add a signature for a given public key.
    ///
    /// The pubkey must be one of the required signers in the transaction.
    /// The signature bytes must be exactly 64 bytes (Ed25519 signature).
    fn add_signature(&mut self, pubkey: &str, signature: &[u8]) -> Result<(), KineticError>;

    /// Sign the message with `identity`, leaving other signer slots as they are.
    fn partial_sign(&mut self, identity: &SigningIdentity) -> Result<(), KineticError>;

    /// Get the index of a pubkey in the account keys, if it's a signer.
    fn signer_index(&self, pubkey: &str) -> Option<usize>;

    /// Signers whose slot still holds the default signature.
    fn missing_signers(&self) -> Vec<String>;
}

impl TransactionExt for Transaction {
    fn from_bytes(bytes: &[u8]) -> Result<Transaction, KineticError> {
        bincode::deserialize(bytes).map_err(|e| {
            KineticError::Serialization(format!("Failed to deserialize transaction: {}", e))
        })
    }

    fn fee_payer_string(&self) -> Option<String> {
        self.message.account_keys.first().map(|p| p.to_string())
    }

    fn blockhash_string(&self) -> String {
        self.message.recent_blockhash.to_string()
    }

    fn signable_payload(&self) -> Vec<u8> {
        self.message.serialize()
    }

    fn to_bytes(&self) -> Result<Vec<u8>, KineticError> {
        bincode::serialize(self).map_err(|e| {
            KineticError::Serialization(format!("Failed to serialize transaction: {}", e))
        })
    }

    fn serialize_with(&self, config: SerializeConfig) -> Result<Vec<u8>, KineticError> {
        if config.require_all_signatures {
            let missing = self.missing_signers();
            if !missing.is_empty() {
                return Err(KineticError::Serialization(format!(
                    "Missing signature for {}",
                    missing.join(", ")
                )));
            }
        }
        if config.verify_signatures {
            // Unsigned slots are skipped here; they are covered by the check above
            let bad = self
                .signatures
                .iter()
                .zip(self.message.account_keys.iter())
                .zip(self.verify_with_results())
                .filter(|((signature, _), ok)| **signature != Signature::default() && !ok)
                .map(|((_, key), _)| key.to_string())
                .collect::<Vec<_>>();
            if !bad.is_empty() {
                return Err(KineticError::Serialization(format!(
                    "Invalid signature for {}",
                    bad.join(", ")
                )));
            }
        }
        self.to_bytes()
    }

    fn to_base64(&self) -> Result<String, KineticError> {
        let bytes = self.serialize_with(SerializeConfig::PARTIAL)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    fn signer_index(&self, pubkey: &str) -> Option<usize> {
        let target_address = Address::from_str(pubkey).ok()?;
        let num_signers = self.message.header.num_required_signatures as usize;

        let signed_keys = self.message.account_keys.get(0..num_signers)?;
        signed_keys.iter().position(|x| *x == target_address)
    }

    fn add_signature(&mut self, pubkey: &str, signature_bytes: &[u8]) -> Result<(), KineticError> {
        let bytes: [u8; 64] = signature_bytes.try_into().map_err(|_| {
            KineticError::Serialization(format!(
                "Invalid signature length: expected 64 bytes, got {}",
                signature_bytes.len()
            ))
        })?;

        let signer_idx = self.signer_index(pubkey).ok_or_else(|| {
            KineticError::Serialization(format!("{} is not a signer of this transaction", pubkey))
        })?;

        let num_signers = self.message.header.num_required_signatures as usize;
        if self.signatures.len() < num_signers {
            self.signatures.resize(num_signers, Signature::default());
        }

        self.signatures[signer_idx] = Signature::from(bytes);
        Ok(())
    }

    fn partial_sign(&mut self, identity: &SigningIdentity) -> Result<(), KineticError> {
        let signature = identity.sign(&self.signable_payload())?;
        self.add_signature(identity.public_key(), &signature)
    }

    fn missing_signers(&self) -> Vec<String> {
        let num_signers = self.message.header.num_required_signatures as usize;
        self.message
            .account_keys
            .iter()
            .take(num_signers)
            .enumerate()
            .filter(|(i, _)| {
                self.signatures
                    .get(*i)
                    .map_or(true, |signature| *signature == Signature::default())
            })
            .map(|(_, key)| key.to_string())
            .collect()
    }
}
