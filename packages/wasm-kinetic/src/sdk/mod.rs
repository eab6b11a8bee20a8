//! The Kinetic SDK facade.
//!
//! [`KineticSdk`] ties together the connection settings, an API transport,
//! the cached app config and the transaction flows.
//!
//! ```no_run
//! # async fn run() -> Result<(), wasm_kinetic::KineticError> {
//! use wasm_kinetic::{KineticSdk, KineticSdkConfig, MakeTransferOptions, SigningIdentity};
//!
//! let sdk = KineticSdk::setup(KineticSdkConfig::new(
//!     "https://sandbox.kinetic.host",
//!     "devnet",
//!     1,
//! ))
//! .await?;
//!
//! let owner = SigningIdentity::random()?;
//! let mut transfer = MakeTransferOptions::new(&owner, "5ZWgXcyqrrNpQHCme5SdC5hCeYb2o3fEJhF7Gok3bTVN", "10.5");
//! transfer.sender_create = true;
//! let record = sdk.make_transfer(transfer).await?;
//! println!("{:?}", record.signature);
//! # Ok(())
//! # }
//! ```

mod config;
mod orchestrator;

pub use config::KineticSdkConfig;
pub use orchestrator::{CreateAccountOptions, MakeTransferOptions, TransactionOrchestrator};

#[cfg(not(target_arch = "wasm32"))]
use crate::client::KineticHttpClient;
use crate::client::{
    BalanceResponse, Commitment, GetTransactionResponse, HistoryResponse, KineticApi,
    RequestAirdropRequest, RequestAirdropResponse, TransactionRecord,
};
use crate::config::{AppConfig, AppConfigResolver};
use crate::error::KineticError;
use std::sync::Arc;
use tracing::info;

/// Options for [`KineticSdk::request_airdrop`].
#[derive(Debug, Clone, Default)]
pub struct RequestAirdropOptions {
    pub account: String,
    /// Decimal amount; the API default applies when absent.
    pub amount: Option<String>,
    pub commitment: Option<Commitment>,
    pub mint: Option<String>,
}

pub struct KineticSdk<A> {
    config: KineticSdkConfig,
    api: Arc<A>,
    resolver: Arc<AppConfigResolver>,
    orchestrator: TransactionOrchestrator<A>,
}

#[cfg(not(target_arch = "wasm32"))]
impl KineticSdk<KineticHttpClient> {
    /// Connect over HTTP and fetch the app config.
    pub async fn setup(config: KineticSdkConfig) -> Result<Self, KineticError> {
        let api = KineticHttpClient::new(&config)?;
        let sdk = KineticSdk::with_api(config, api)?;
        sdk.init().await?;
        Ok(sdk)
    }
}

impl<A: KineticApi> KineticSdk<A> {
    /// Use a custom transport. Call [`KineticSdk::init`] before any
    /// transaction.
    pub fn with_api(config: KineticSdkConfig, api: A) -> Result<Self, KineticError> {
        config.validate()?;
        let api = Arc::new(api);
        let resolver = Arc::new(AppConfigResolver::new());
        let orchestrator =
            TransactionOrchestrator::new(api.clone(), resolver.clone(), config.commitment);
        Ok(KineticSdk {
            config,
            api,
            resolver,
            orchestrator,
        })
    }

    /// Fetch and cache the app config.
    pub async fn init(&self) -> Result<Arc<AppConfig>, KineticError> {
        let app_config = self
            .api
            .fetch_app_config(&self.config.environment, self.config.index)
            .await?;
        info!(
            environment = %self.config.environment,
            index = self.config.index,
            mints = app_config.mints.len(),
            "app config loaded"
        );
        self.resolver.set_config(app_config);
        self.resolver.require_config()
    }

    pub fn sdk_config(&self) -> &KineticSdkConfig {
        &self.config
    }

    /// The cached config, if [`KineticSdk::init`] has run.
    pub fn config(&self) -> Option<Arc<AppConfig>> {
        self.resolver.config()
    }

    /// Fetch the app config without touching the cache.
    pub async fn get_app_config(
        &self,
        environment: &str,
        index: u32,
    ) -> Result<AppConfig, KineticError> {
        self.api.fetch_app_config(environment, index).await
    }

    pub async fn create_account(
        &self,
        options: CreateAccountOptions<'_>,
    ) -> Result<TransactionRecord, KineticError> {
        self.orchestrator.create_account(options).await
    }

    pub async fn make_transfer(
        &self,
        options: MakeTransferOptions<'_>,
    ) -> Result<TransactionRecord, KineticError> {
        self.orchestrator.make_transfer(options).await
    }

    pub async fn get_balance(&self, account: &str) -> Result<BalanceResponse, KineticError> {
        self.api.get_balance(account).await
    }

    pub async fn get_history(
        &self,
        account: &str,
        mint: Option<&str>,
    ) -> Result<Vec<HistoryResponse>, KineticError> {
        let mint = self.mint_address(mint)?;
        self.api.get_history(account, &mint).await
    }

    pub async fn get_token_accounts(
        &self,
        account: &str,
        mint: Option<&str>,
    ) -> Result<Vec<String>, KineticError> {
        let mint = self.mint_address(mint)?;
        self.api.list_token_accounts(account, &mint).await
    }

    pub async fn get_transaction(
        &self,
        signature: &str,
    ) -> Result<GetTransactionResponse, KineticError> {
        self.api.get_transaction(signature).await
    }

    pub async fn request_airdrop(
        &self,
        options: RequestAirdropOptions,
    ) -> Result<RequestAirdropResponse, KineticError> {
        let mint = self.mint_address(options.mint.as_deref())?;
        let request = RequestAirdropRequest {
            account: options.account,
            commitment: options.commitment.unwrap_or(self.config.commitment),
            environment: self.config.environment.clone(),
            index: self.config.index,
            mint,
            amount: options.amount,
        };
        self.api.request_airdrop(&request).await
    }

    /// Explorer link for `path`, e.g. `tx/<signature>` or `address/<key>`.
    pub fn get_explorer_url(&self, path: &str) -> Result<String, KineticError> {
        Ok(self.resolver.require_config()?.explorer_url(path))
    }

    fn mint_address(&self, requested: Option<&str>) -> Result<String, KineticError> {
        let config = self.resolver.require_config()?;
        let mint = config.resolve_mint(requested)?;
        Ok(mint.public_key.clone())
    }
}
