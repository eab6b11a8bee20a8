//! Collaborators the SDK talks to over the network.
//!
//! Each concern is its own async trait so tests and alternative transports
//! can implement only what they need. [`KineticApi`] bundles all of them
//! and is implemented automatically.

#[cfg(not(target_arch = "wasm32"))]
mod http;
mod types;

use crate::builder::BlockReference;
use crate::config::AppConfig;
use crate::error::KineticError;
use async_trait::async_trait;

#[cfg(not(target_arch = "wasm32"))]
pub use http::KineticHttpClient;
pub use types::{
    BalanceResponse, BalanceToken, Commitment, ConfirmedSignatureInfo, GetTransactionResponse,
    HistoryResponse, RequestAirdropRequest, RequestAirdropResponse, SubmissionEnvelope,
    TransactionRecord, TransactionStatus,
};

/// Sent as `kinetic-user-agent`.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "@", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait AccountLookup: Send + Sync {
    /// Token accounts `account` holds for `mint`. Empty when there are none.
    async fn list_token_accounts(
        &self,
        account: &str,
        mint: &str,
    ) -> Result<Vec<String>, KineticError>;
}

#[async_trait]
pub trait BlockReferenceSource: Send + Sync {
    async fn latest_block_reference(&self) -> Result<BlockReference, KineticError>;
}

/// Submits partially signed transactions to the relay, which adds the fee
/// payer signature and broadcasts.
#[async_trait]
pub trait TransactionRelay: Send + Sync {
    async fn submit_create_account(
        &self,
        envelope: &SubmissionEnvelope,
    ) -> Result<TransactionRecord, KineticError>;

    async fn submit_transfer(
        &self,
        envelope: &SubmissionEnvelope,
    ) -> Result<TransactionRecord, KineticError>;
}

#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn fetch_app_config(&self, environment: &str, index: u32)
        -> Result<AppConfig, KineticError>;
}

#[async_trait]
pub trait AccountInfoSource: Send + Sync {
    async fn get_balance(&self, account: &str) -> Result<BalanceResponse, KineticError>;

    async fn get_history(
        &self,
        account: &str,
        mint: &str,
    ) -> Result<Vec<HistoryResponse>, KineticError>;
}

#[async_trait]
pub trait TransactionLookup: Send + Sync {
    async fn get_transaction(&self, signature: &str)
        -> Result<GetTransactionResponse, KineticError>;
}

#[async_trait]
pub trait AirdropSource: Send + Sync {
    async fn request_airdrop(
        &self,
        request: &RequestAirdropRequest,
    ) -> Result<RequestAirdropResponse, KineticError>;
}

/// Everything the SDK needs from the Kinetic API.
pub trait KineticApi:
    AccountLookup
    + BlockReferenceSource
    + TransactionRelay
    + ConfigSource
    + AccountInfoSource
    + TransactionLookup
    + AirdropSource
{
}

impl<T> KineticApi for T where
    T: AccountLookup
        + BlockReferenceSource
        + TransactionRelay
        + ConfigSource
        + AccountInfoSource
        + TransactionLookup
        + AirdropSource
{
}
