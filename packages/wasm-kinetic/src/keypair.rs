//! Ed25519 signing identities for Kinetic accounts.
//!
//! Wraps `solana_keypair::Keypair` together with the recovery phrase and
//! derivation index it came from, if any.

use crate::derivation;
use crate::error::KineticError;
use serde::{Deserialize, Serialize};
use solana_signer::Signer;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Re-export the underlying Solana Keypair type.
pub use solana_keypair::Keypair;

/// Extension trait for Keypair to add byte-level constructors with
/// [`KineticError`] handling.
pub trait KeypairExt {
    fn from_secret_key_bytes(secret_key: &[u8]) -> Result<Keypair, KineticError>;
    fn from_solana_secret_key(secret_key: &[u8]) -> Result<Keypair, KineticError>;
    fn secret_key_bytes(&self) -> [u8; 32];
    fn address(&self) -> String;
}

impl KeypairExt for Keypair {
    /// Create a keypair from a 32-byte secret key (Ed25519 seed).
    fn from_secret_key_bytes(secret_key: &[u8]) -> Result<Keypair, KineticError> {
        let bytes: [u8; 32] = secret_key.try_into().map_err(|_| {
            KineticError::MalformedSecret(format!(
                "Secret key must be 32 bytes, got {}",
                secret_key.len()
            ))
        })?;

        Ok(Keypair::new_from_array(bytes))
    }

    /// Create a keypair from a 64-byte Solana secret key (secret + public concatenated).
    fn from_solana_secret_key(secret_key: &[u8]) -> Result<Keypair, KineticError> {
        if secret_key.len() != 64 {
            return Err(KineticError::MalformedSecret(format!(
                "Solana secret key must be 64 bytes, got {}",
                secret_key.len()
            )));
        }

        Keypair::try_from(secret_key)
            .map_err(|e| KineticError::MalformedSecret(format!("Invalid keypair: {}", e)))
    }

    fn secret_key_bytes(&self) -> [u8; 32] {
        let bytes = Zeroizing::new(self.to_bytes());
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes[..32]);
        secret
    }

    /// Get the Solana address (base58-encoded public key).
    fn address(&self) -> String {
        self.pubkey().to_string()
    }
}

/// A BIP-39 recovery phrase (English word list). Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(try_from = "Vec<String>")]
pub struct RecoveryPhrase(Vec<String>);

impl RecoveryPhrase {
    /// Parse and checksum-validate a space separated phrase.
    pub fn parse(phrase: &str) -> Result<Self, KineticError> {
        let mnemonic = parse_mnemonic(phrase)?;
        Ok(Self::from_mnemonic(&mnemonic))
    }

    pub fn from_words<I, S>(words: I) -> Result<Self, KineticError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = Zeroizing::new(
            words
                .into_iter()
                .map(|w| w.as_ref().to_string())
                .collect::<Vec<_>>()
                .join(" "),
        );
        Self::parse(&joined)
    }

    pub(crate) fn from_mnemonic(mnemonic: &bip39::Mnemonic) -> Self {
        RecoveryPhrase(mnemonic.words().map(str::to_string).collect())
    }

    pub fn words(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// BIP-39 seed with an empty passphrase.
    pub fn to_seed(&self) -> Result<Zeroizing<[u8; 64]>, KineticError> {
        let joined = Zeroizing::new(self.0.join(" "));
        let mnemonic = parse_mnemonic(&joined)?;
        Ok(Zeroizing::new(mnemonic.to_seed("")))
    }
}

impl TryFrom<Vec<String>> for RecoveryPhrase {
    type Error = KineticError;

    fn try_from(words: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_words(&words)
    }
}

impl fmt::Debug for RecoveryPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoveryPhrase({} words)", self.0.len())
    }
}

fn parse_mnemonic(phrase: &str) -> Result<bip39::Mnemonic, KineticError> {
    bip39::Mnemonic::parse_in_normalized(bip39::Language::English, phrase)
        .map_err(|e| KineticError::InvalidPhrase(e.to_string()))
}

/// A keypair able to authorize ledger operations.
///
/// Identities are compared by public key only. The secret is exclusively
/// owned: the type is not `Clone`, and [`SigningIdentity::clear`] drops it.
pub struct SigningIdentity {
    public_key: String,
    keypair: Option<Keypair>,
    mnemonic: Option<RecoveryPhrase>,
    index: Option<u32>,
}

impl SigningIdentity {
    pub(crate) fn from_keypair(keypair: Keypair) -> Self {
        SigningIdentity {
            public_key: keypair.address(),
            keypair: Some(keypair),
            mnemonic: None,
            index: None,
        }
    }

    pub(crate) fn with_origin(mut self, mnemonic: RecoveryPhrase, index: u32) -> Self {
        self.mnemonic = Some(mnemonic);
        self.index = Some(index);
        self
    }

    /// Fresh 12-word phrase, derived at index 0.
    pub fn random() -> Result<Self, KineticError> {
        derivation::generate_random()
    }

    /// Decode a base58 secret key (64-byte Solana format or 32-byte seed).
    pub fn from_secret(secret: &str) -> Result<Self, KineticError> {
        derivation::from_secret(secret)
    }

    pub fn from_mnemonic(phrase: &RecoveryPhrase) -> Result<Self, KineticError> {
        derivation::derive_one(phrase)
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn mnemonic(&self) -> Option<&RecoveryPhrase> {
        self.mnemonic.as_ref()
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    pub fn is_cleared(&self) -> bool {
        self.keypair.is_none()
    }

    pub fn keypair(&self) -> Result<&Keypair, KineticError> {
        self.keypair
            .as_ref()
            .ok_or_else(|| KineticError::SecretCleared(self.public_key.clone()))
    }

    /// Base58 encoding of the 64-byte Solana secret key.
    pub fn secret_key(&self) -> Result<String, KineticError> {
        let bytes = Zeroizing::new(self.keypair()?.to_bytes());
        Ok(bs58::encode(&bytes[..]).into_string())
    }

    /// Sign a message and return the 64-byte Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> Result<[u8; 64], KineticError> {
        let signature = self.keypair()?.sign_message(message);
        let mut out = [0u8; 64];
        out.copy_from_slice(signature.as_ref());
        Ok(out)
    }

    /// Drop the secret key and recovery phrase. The public key stays readable.
    pub fn clear(&mut self) {
        self.keypair = None;
        self.mnemonic = None;
    }

    pub fn to_json(&self) -> Result<String, KineticError> {
        let record = IdentityRecord {
            public_key: self.public_key.clone(),
            secret_key: Zeroizing::new(self.secret_key()?),
            mnemonic: self.mnemonic.clone(),
            index: self.index,
        };
        serde_json::to_string(&record).map_err(|e| KineticError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, KineticError> {
        let record: IdentityRecord =
            serde_json::from_str(json).map_err(|e| KineticError::Serialization(e.to_string()))?;
        let mut identity = derivation::from_secret(&record.secret_key)?;
        if identity.public_key != record.public_key {
            return Err(KineticError::MalformedSecret(format!(
                "secret key does not match public key {}",
                record.public_key
            )));
        }
        identity.mnemonic = record.mnemonic.clone();
        identity.index = record.index;
        Ok(identity)
    }
}

impl PartialEq for SigningIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for SigningIdentity {}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("public_key", &self.public_key)
            .field("index", &self.index)
            .field("cleared", &self.is_cleared())
            .finish_non_exhaustive()
    }
}

/// On-disk / JSON shape of an identity.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityRecord {
    public_key: String,
    secret_key: Zeroizing<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mnemonic: Option<RecoveryPhrase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index: Option<u32>,
}
