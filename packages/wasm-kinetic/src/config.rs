//! Application configuration served by the Kinetic API.
//!
//! The config lists the mints an app may transact in, which fee payer
//! covers each mint, and whether transactions carry a Kin memo. It is
//! fetched once per session and shared read-only through
//! [`AppConfigResolver`].

use crate::error::KineticError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Response of `GET /api/app/{environment}/{index}/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub app: AppConfigApp,
    pub environment: AppConfigEnvironment,
    /// The default mint.
    pub mint: AppConfigMint,
    pub mints: Vec<AppConfigMint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigApp {
    pub index: u32,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigEnvironment {
    pub name: String,
    /// Explorer URL template containing a `{path}` placeholder.
    #[serde(default)]
    pub explorer: String,
    #[serde(default)]
    pub cluster: Option<AppConfigCluster>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigCluster {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub cluster_type: String,
}

/// A token mint the app can use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigMint {
    pub public_key: String,
    pub decimals: u8,
    pub fee_payer: String,
    #[serde(default)]
    pub add_memo: bool,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub program_id: String,
    #[serde(default)]
    pub airdrop: bool,
    #[serde(default)]
    pub airdrop_amount: Option<u64>,
    #[serde(default)]
    pub airdrop_max: Option<u64>,
}

impl AppConfig {
    pub fn environment_name(&self) -> &str {
        &self.environment.name
    }

    pub fn app_index(&self) -> u32 {
        self.app.index
    }

    pub fn default_mint(&self) -> &AppConfigMint {
        &self.mint
    }

    /// Resolve the requested mint, or the default mint when none is given.
    ///
    /// Either way the result is taken from `mints`; the first entry with a
    /// matching public key wins.
    pub fn resolve_mint(&self, requested: Option<&str>) -> Result<&AppConfigMint, KineticError> {
        let wanted = requested.unwrap_or(self.mint.public_key.as_str());
        self.mints
            .iter()
            .find(|mint| mint.public_key == wanted)
            .ok_or_else(|| KineticError::MintNotFound(wanted.to_string()))
    }

    pub fn is_mint_address(&self, address: &str) -> bool {
        self.mints.iter().any(|mint| mint.public_key == address)
    }

    /// Transfers to a mint address can never succeed.
    pub fn validate_destination(&self, destination: &str) -> Result<(), KineticError> {
        if self.is_mint_address(destination) {
            return Err(KineticError::InvalidDestination(destination.to_string()));
        }
        Ok(())
    }

    pub fn explorer_url(&self, path: &str) -> String {
        self.environment.explorer.replace("{path}", path)
    }
}

/// Holds the most recently fetched [`AppConfig`].
///
/// Readers get an `Arc` snapshot, so the lock is never held across an
/// `.await`.
#[derive(Debug, Default)]
pub struct AppConfigResolver {
    current: RwLock<Option<Arc<AppConfig>>>,
}

impl AppConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_config(&self, config: AppConfig) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Some(Arc::new(config));
    }

    pub fn config(&self) -> Option<Arc<AppConfig>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn require_config(&self) -> Result<Arc<AppConfig>, KineticError> {
        self.config().ok_or(KineticError::ConfigNotInitialized)
    }

    pub fn resolve_mint<'a>(
        &self,
        config: &'a AppConfig,
        requested: Option<&str>,
    ) -> Result<&'a AppConfigMint, KineticError> {
        config.resolve_mint(requested)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;

    pub const MINT: &str = "KinDesK3dYWo3R2wDk6Ucaf31tvQCCSYyL8Fuqp33GX";
    pub const OTHER_MINT: &str = "DgT9qyYwYKBRDyDw3EfR12LHQCQjtNrKu2qMsXHuosmB";
    pub const FEE_PAYER: &str = "FKjSjCqByQRwSzZoMXA7bKnDbJe41YgJTHFFzBeC42bH";

    pub fn test_mint(public_key: &str, decimals: u8, add_memo: bool) -> AppConfigMint {
        serde_json::from_value(serde_json::json!({
            "publicKey": public_key,
            "decimals": decimals,
            "feePayer": FEE_PAYER,
            "addMemo": add_memo,
            "symbol": "KIN",
        }))
        .unwrap()
    }

    pub fn test_config(mints: Vec<AppConfigMint>) -> AppConfig {
        AppConfig {
            app: AppConfigApp {
                index: 1,
                name: "App 1".to_string(),
            },
            environment: AppConfigEnvironment {
                name: "devnet".to_string(),
                explorer: "https://explorer.solana.com/{path}?cluster=devnet".to_string(),
                cluster: None,
            },
            mint: mints[0].clone(),
            mints,
        }
    }

    #[test]
    fn test_deserialize_api_response() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "app": { "index": 1, "name": "App 1" },
            "api": { "name": "kinetic", "version": "1.0.0" },
            "environment": {
                "name": "devnet",
                "explorer": "https://explorer.solana.com/{path}?cluster=devnet",
                "cluster": { "id": "solana-devnet", "name": "Solana Devnet", "type": "SolanaDevnet" }
            },
            "mint": {
                "addMemo": false, "airdrop": true, "airdropAmount": 1000, "airdropMax": 50000,
                "decimals": 5, "feePayer": FEE_PAYER, "logoUrl": "https://example.com/kin.svg",
                "name": "Kin", "programId": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
                "publicKey": MINT, "symbol": "KIN"
            },
            "mints": [{
                "addMemo": false, "airdrop": true, "airdropAmount": 1000, "airdropMax": 50000,
                "decimals": 5, "feePayer": FEE_PAYER, "logoUrl": "https://example.com/kin.svg",
                "name": "Kin", "programId": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
                "publicKey": MINT, "symbol": "KIN"
            }]
        }))
        .unwrap();

        assert_eq!(config.environment_name(), "devnet");
        assert_eq!(config.app_index(), 1);
        assert_eq!(config.default_mint().decimals, 5);
        assert_eq!(config.default_mint().airdrop_max, Some(50000));
        assert_eq!(
            config.environment.cluster.as_ref().unwrap().cluster_type,
            "SolanaDevnet"
        );
    }

    #[test]
    fn test_resolve_default_mint() {
        let config = test_config(vec![test_mint(MINT, 2, false)]);
        let mint = config.resolve_mint(None).unwrap();
        assert_eq!(mint.public_key, MINT);
        assert_eq!(mint.decimals, 2);
        assert_eq!(mint, config.resolve_mint(Some(MINT)).unwrap());
    }

    #[test]
    fn test_resolve_unknown_mint() {
        let config = test_config(vec![test_mint(MINT, 2, false)]);
        let err = config.resolve_mint(Some(OTHER_MINT)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MintNotFound);
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let config = test_config(vec![
            test_mint(MINT, 2, false),
            test_mint(OTHER_MINT, 5, true),
            test_mint(MINT, 9, true),
        ]);
        assert_eq!(config.resolve_mint(Some(MINT)).unwrap().decimals, 2);
        assert_eq!(config.resolve_mint(Some(OTHER_MINT)).unwrap().decimals, 5);
    }

    #[test]
    fn test_validate_destination() {
        let config = test_config(vec![test_mint(MINT, 2, false), test_mint(OTHER_MINT, 5, true)]);
        for mint in [MINT, OTHER_MINT] {
            let err = config.validate_destination(mint).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidDestination);
        }
        assert!(config.validate_destination(FEE_PAYER).is_ok());
    }

    #[test]
    fn test_explorer_url() {
        let config = test_config(vec![test_mint(MINT, 2, false)]);
        assert_eq!(
            config.explorer_url("tx/abc"),
            "https://explorer.solana.com/tx/abc?cluster=devnet"
        );
    }

    #[test]
    fn test_resolver_requires_config() {
        let resolver = AppConfigResolver::new();
        assert_eq!(
            resolver.require_config().unwrap_err().kind(),
            ErrorKind::ConfigNotInitialized
        );

        resolver.set_config(test_config(vec![test_mint(MINT, 2, false)]));
        let config = resolver.require_config().unwrap();
        assert_eq!(resolver.resolve_mint(&config, None).unwrap().public_key, MINT);

        resolver.set_config(test_config(vec![test_mint(OTHER_MINT, 5, false)]));
        // Earlier snapshots are unaffected by a refresh
        assert_eq!(config.default_mint().public_key, MINT);
        assert_eq!(
            resolver.require_config().unwrap().default_mint().public_key,
            OTHER_MINT
        );
    }
}
