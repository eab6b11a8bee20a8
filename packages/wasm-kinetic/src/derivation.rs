//! Deterministic account derivation from recovery phrases.
//!
//! Accounts live on the Solana BIP-44 path `m/44'/501'/{index}'/0'`, derived
//! with SLIP-0010 from the BIP-39 seed (empty passphrase). The same phrase
//! and index always produce the same account, which is what makes account
//! recovery possible.

use crate::error::KineticError;
use crate::keypair::{Keypair, KeypairExt, RecoveryPhrase, SigningIdentity};
use solana_derivation_path::DerivationPath;
use solana_keypair::seed_derivable::keypair_from_seed_and_derivation_path;
use zeroize::Zeroizing;

/// Number of accounts `from_mnemonic_set` derives.
pub const DEFAULT_MNEMONIC_SET_SIZE: u32 = 10;

/// Highest index usable as a hardened path component.
pub const MAX_DERIVATION_INDEX: u32 = (1 << 31) - 1;

/// Most accounts a single `derive_range` call produces.
pub const MAX_DERIVATION_SPAN: u32 = 1000;

/// Recovery phrase length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordCount {
    #[default]
    Twelve,
    TwentyFour,
}

impl WordCount {
    fn entropy_len(self) -> usize {
        match self {
            WordCount::Twelve => 16,
            WordCount::TwentyFour => 32,
        }
    }
}

pub fn generate_mnemonic(word_count: WordCount) -> Result<RecoveryPhrase, KineticError> {
    let mut entropy = Zeroizing::new([0u8; 32]);
    let entropy = &mut entropy[..word_count.entropy_len()];
    getrandom::getrandom(entropy)
        .map_err(|e| KineticError::InvalidPhrase(format!("entropy unavailable: {}", e)))?;

    let mnemonic = bip39::Mnemonic::from_entropy(entropy)
        .map_err(|e| KineticError::InvalidPhrase(e.to_string()))?;
    Ok(RecoveryPhrase::from_mnemonic(&mnemonic))
}

/// Generate a fresh 12-word phrase and derive its first account.
pub fn generate_random() -> Result<SigningIdentity, KineticError> {
    let phrase = generate_mnemonic(WordCount::Twelve)?;
    derive_one(&phrase)
}

/// Decode a base58 secret key. No recovery phrase is attached.
pub fn from_secret(secret: &str) -> Result<SigningIdentity, KineticError> {
    let bytes = bs58::decode(secret.trim())
        .into_vec()
        .map(Zeroizing::new)
        .map_err(|e| KineticError::MalformedSecret(format!("Invalid base58: {}", e)))?;
    from_secret_bytes(&bytes)
}

/// Accepts either the 64-byte Solana secret key or a 32-byte seed.
pub fn from_secret_bytes(bytes: &[u8]) -> Result<SigningIdentity, KineticError> {
    let keypair = match bytes.len() {
        32 => Keypair::from_secret_key_bytes(bytes)?,
        _ => Keypair::from_solana_secret_key(bytes)?,
    };
    Ok(SigningIdentity::from_keypair(keypair))
}

/// Derive the accounts at indices `from..max(to, from + 1)`.
///
/// At most [`MAX_DERIVATION_SPAN`] accounts are derived per call.
pub fn derive_range(
    phrase: &RecoveryPhrase,
    from: u32,
    to: u32,
) -> Result<Vec<SigningIdentity>, KineticError> {
    if from > MAX_DERIVATION_INDEX {
        return Err(KineticError::InvalidDerivationIndex(from));
    }
    // Always generate at least one
    let to = to.max(from + 1);
    if to - 1 > MAX_DERIVATION_INDEX {
        return Err(KineticError::InvalidDerivationIndex(to - 1));
    }
    if to - from > MAX_DERIVATION_SPAN {
        return Err(KineticError::DerivationRangeTooLarge { from, to });
    }

    let seed = phrase.to_seed()?;
    (from..to)
        .map(|index| {
            derive(&seed[..], index)
                .map(|keypair| SigningIdentity::from_keypair(keypair).with_origin(phrase.clone(), index))
        })
        .collect()
}

pub fn derive_one(phrase: &RecoveryPhrase) -> Result<SigningIdentity, KineticError> {
    derive_range(phrase, 0, 1)?
        .into_iter()
        .next()
        .ok_or(KineticError::InvalidDerivationIndex(0))
}

pub fn from_mnemonic_set(phrase: &RecoveryPhrase) -> Result<Vec<SigningIdentity>, KineticError> {
    derive_range(phrase, 0, DEFAULT_MNEMONIC_SET_SIZE)
}

/// Derive the keypair at `m/44'/501'/{index}'/0'` from a BIP-39 seed.
pub fn derive(seed: &[u8], index: u32) -> Result<Keypair, KineticError> {
    if index > MAX_DERIVATION_INDEX {
        return Err(KineticError::InvalidDerivationIndex(index));
    }
    let path = DerivationPath::new_bip44(Some(index), Some(0));
    keypair_from_seed_and_derivation_path(seed, Some(path))
        .map_err(|e| KineticError::MalformedSecret(format!("derivation failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashSet;

    const TEST_PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn phrase() -> RecoveryPhrase {
        RecoveryPhrase::parse(TEST_PHRASE).unwrap()
    }

    #[test]
    fn test_derive_range_first_three() {
        let identities = derive_range(&phrase(), 0, 3).unwrap();
        assert_eq!(identities.len(), 3);

        let indexes: Vec<_> = identities.iter().map(|i| i.index().unwrap()).collect();
        assert_eq!(indexes, vec![0, 1, 2]);

        let keys: HashSet<_> = identities.iter().map(|i| i.public_key().to_string()).collect();
        assert_eq!(keys.len(), 3);

        for identity in &identities {
            assert_eq!(identity.mnemonic(), Some(&phrase()));
        }
    }

    #[test]
    fn test_known_addresses() {
        // m/44'/501'/{index}'/0', as used by Solana wallets
        let identities = derive_range(&phrase(), 0, 3).unwrap();
        assert_eq!(
            identities[0].public_key(),
            "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk"
        );
        assert_eq!(
            identities[1].public_key(),
            "Hh8QwFUA6MtVu1qAoq12ucvFHNwCcVTV7hpWjeY1Hztb"
        );
        assert_eq!(
            identities[2].public_key(),
            "7WktogJEd2wQ9eH2oWusmcoFTgeYi6rS632UviTBJ2jm"
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let first = derive_range(&phrase(), 5, 6).unwrap();
        let second = derive_range(&phrase(), 5, 6).unwrap();
        assert_eq!(first[0].public_key(), second[0].public_key());

        // Same index reached through a wider range
        let wide = derive_range(&phrase(), 0, 6).unwrap();
        assert_eq!(wide[5].public_key(), first[0].public_key());
    }

    #[test]
    fn test_derive_range_always_returns_one() {
        let identities = derive_range(&phrase(), 4, 2).unwrap();
        assert_eq!(identities.len(), 1);
        assert_eq!(identities[0].index(), Some(4));

        let identities = derive_range(&phrase(), 4, 4).unwrap();
        assert_eq!(identities.len(), 1);
    }

    #[test]
    fn test_range_length_law() {
        for (from, to) in [(0u32, 0u32), (0, 1), (2, 7), (7, 2), (3, 4)] {
            let identities = derive_range(&phrase(), from, to).unwrap();
            let expected = to.max(from + 1) - from;
            assert_eq!(identities.len() as u32, expected, "from={from} to={to}");
            for (offset, identity) in identities.iter().enumerate() {
                assert_eq!(identity.index(), Some(from + offset as u32));
            }
        }
    }

    #[test]
    fn test_derive_one_matches_index_zero() {
        let one = derive_one(&phrase()).unwrap();
        let set = from_mnemonic_set(&phrase()).unwrap();
        assert_eq!(set.len(), DEFAULT_MNEMONIC_SET_SIZE as usize);
        assert_eq!(one, set[0]);
    }

    #[test]
    fn test_index_outside_hardened_range() {
        let err = derive_range(&phrase(), MAX_DERIVATION_INDEX + 1, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDerivationIndex);

        let err = derive_range(&phrase(), 0, MAX_DERIVATION_INDEX + 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDerivationIndex);
    }

    #[test]
    fn test_span_is_capped() {
        let err = derive_range(&phrase(), 0, MAX_DERIVATION_INDEX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DerivationRangeTooLarge);

        let err = derive_range(&phrase(), 10, 10 + MAX_DERIVATION_SPAN + 1).unwrap_err();
        assert_eq!(
            err,
            KineticError::DerivationRangeTooLarge {
                from: 10,
                to: 10 + MAX_DERIVATION_SPAN + 1
            }
        );
    }

    #[test]
    fn test_generate_random() {
        let identity = generate_random().unwrap();
        assert_eq!(identity.mnemonic().unwrap().len(), 12);
        assert_eq!(identity.index(), Some(0));

        let rederived = derive_one(identity.mnemonic().unwrap()).unwrap();
        assert_eq!(rederived, identity);
    }

    #[test]
    fn test_generate_twenty_four_words() {
        let phrase = generate_mnemonic(WordCount::TwentyFour).unwrap();
        assert_eq!(phrase.len(), 24);
    }

    #[test]
    fn test_from_secret_roundtrip() {
        let identity = derive_one(&phrase()).unwrap();
        let secret = identity.secret_key().unwrap();

        let restored = from_secret(&secret).unwrap();
        assert_eq!(restored, identity);
        assert!(restored.mnemonic().is_none());
        assert!(restored.index().is_none());
    }

    #[test]
    fn test_from_secret_seed_bytes() {
        let seed = [1u8; 32];
        let encoded = bs58::encode(seed).into_string();
        let identity = from_secret(&encoded).unwrap();
        let expected = Keypair::from_secret_key_bytes(&seed).unwrap();
        assert_eq!(identity.public_key(), expected.address());
    }

    #[test]
    fn test_from_secret_malformed() {
        assert_eq!(
            from_secret("not base58 0OIl").unwrap_err().kind(),
            ErrorKind::MalformedSecret
        );
        let short = bs58::encode([1u8; 20]).into_string();
        assert_eq!(
            from_secret(&short).unwrap_err().kind(),
            ErrorKind::MalformedSecret
        );
    }
}
