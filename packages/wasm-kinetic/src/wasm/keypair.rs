//! WASM bindings for Kinetic signing identities.

use crate::derivation;
use crate::error::KineticError;
use crate::keypair::{RecoveryPhrase, SigningIdentity};
use wasm_bindgen::prelude::*;

/// WASM wrapper for a [`SigningIdentity`].
#[wasm_bindgen]
#[derive(Debug)]
pub struct WasmKeypair {
    inner: SigningIdentity,
}

#[wasm_bindgen]
impl WasmKeypair {
    /// Generate a 12-word recovery phrase and derive its first account.
    #[wasm_bindgen]
    pub fn random() -> Result<WasmKeypair, KineticError> {
        SigningIdentity::random().map(|inner| WasmKeypair { inner })
    }

    /// Generate a recovery phrase of 12 or 24 words.
    #[wasm_bindgen]
    pub fn generate_mnemonic(strength: u32) -> Result<String, KineticError> {
        let word_count = match strength {
            128 | 12 => derivation::WordCount::Twelve,
            256 | 24 => derivation::WordCount::TwentyFour,
            _ => {
                return Err(KineticError::InvalidPhrase(format!(
                    "unsupported strength {}",
                    strength
                )))
            }
        };
        let phrase = derivation::generate_mnemonic(word_count)?;
        Ok(phrase.words().join(" "))
    }

    /// Decode a base58 secret key (64-byte Solana format or 32-byte seed).
    #[wasm_bindgen]
    pub fn from_secret_key(secret_key: &str) -> Result<WasmKeypair, KineticError> {
        SigningIdentity::from_secret(secret_key).map(|inner| WasmKeypair { inner })
    }

    /// Derive the account at index 0 of a recovery phrase.
    #[wasm_bindgen]
    pub fn from_mnemonic(mnemonic: &str) -> Result<WasmKeypair, KineticError> {
        let phrase = RecoveryPhrase::parse(mnemonic)?;
        SigningIdentity::from_mnemonic(&phrase).map(|inner| WasmKeypair { inner })
    }

    /// Derive the accounts at indices `from..max(to, from + 1)`, at most
    /// 1000 per call.
    ///
    /// @param mnemonic - Space separated recovery phrase
    /// @param from - First index (default 0)
    /// @param to - End index, exclusive (default 10)
    #[wasm_bindgen]
    pub fn from_mnemonic_set(
        mnemonic: &str,
        from: Option<u32>,
        to: Option<u32>,
    ) -> Result<Vec<WasmKeypair>, KineticError> {
        let phrase = RecoveryPhrase::parse(mnemonic)?;
        let identities = derivation::derive_range(
            &phrase,
            from.unwrap_or(0),
            to.unwrap_or(derivation::DEFAULT_MNEMONIC_SET_SIZE),
        )?;
        Ok(identities
            .into_iter()
            .map(|inner| WasmKeypair { inner })
            .collect())
    }

    /// Restore from the JSON produced by `toJson`.
    #[wasm_bindgen]
    pub fn from_json(json: &str) -> Result<WasmKeypair, KineticError> {
        SigningIdentity::from_json(json).map(|inner| WasmKeypair { inner })
    }

    /// Get the public key as a base58 string.
    #[wasm_bindgen(getter)]
    pub fn public_key(&self) -> String {
        self.inner.public_key().to_string()
    }

    /// Get the 64-byte secret key as a base58 string.
    #[wasm_bindgen]
    pub fn secret_key(&self) -> Result<String, KineticError> {
        self.inner.secret_key()
    }

    /// The recovery phrase, when the keypair was derived from one.
    #[wasm_bindgen(getter)]
    pub fn mnemonic(&self) -> Option<String> {
        self.inner.mnemonic().map(|phrase| phrase.words().join(" "))
    }

    /// The derivation index, when the keypair was derived from a phrase.
    #[wasm_bindgen(getter)]
    pub fn index(&self) -> Option<u32> {
        self.inner.index()
    }

    /// Sign a message and return the 64-byte Ed25519 signature.
    #[wasm_bindgen]
    pub fn sign(&self, message: &[u8]) -> Result<js_sys::Uint8Array, KineticError> {
        let signature = self.inner.sign(message)?;
        Ok(js_sys::Uint8Array::from(&signature[..]))
    }

    /// Drop the secret key. The public key stays readable.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, KineticError> {
        self.inner.to_json()
    }
}

impl WasmKeypair {
    /// Get the inner identity for internal Rust use.
    pub fn inner(&self) -> &SigningIdentity {
        &self.inner
    }
}
