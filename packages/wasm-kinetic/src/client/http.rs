//! REST transport for the Kinetic API.

use super::types::{
    BalanceResponse, GetTransactionResponse, HistoryResponse, RequestAirdropRequest,
    RequestAirdropResponse, SubmissionEnvelope, TransactionRecord,
};
use super::{
    AccountInfoSource, AccountLookup, AirdropSource, BlockReferenceSource, ConfigSource,
    TransactionLookup, TransactionRelay, USER_AGENT,
};
use crate::builder::BlockReference;
use crate::config::AppConfig;
use crate::error::KineticError;
use crate::sdk::KineticSdkConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Whether a request goes to one of the relay's submit endpoints.
#[derive(Clone, Copy)]
enum Endpoint<'a> {
    Query,
    Submit { reference_id: Option<&'a str> },
}

#[derive(Debug, Clone)]
pub struct KineticHttpClient {
    base_url: String,
    environment: String,
    index: u32,
    http: Client,
}

impl KineticHttpClient {
    pub fn new(config: &KineticSdkConfig) -> Result<Self, KineticError> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    fn with_timeout(config: &KineticSdkConfig, timeout: Duration) -> Result<Self, KineticError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            headers.insert(header_name(name)?, header_value(name, value)?);
        }
        headers.insert(
            HeaderName::from_static("kinetic-environment"),
            header_value("kinetic-environment", &config.environment)?,
        );
        headers.insert(
            HeaderName::from_static("kinetic-index"),
            HeaderValue::from(config.index),
        );
        headers.insert(
            HeaderName::from_static("kinetic-user-agent"),
            HeaderValue::from_static(USER_AGENT),
        );

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                KineticError::InvalidSdkConfig(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(KineticHttpClient {
            base_url: config.base_url().to_string(),
            environment: config.environment.clone(),
            index: config.index,
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, KineticError> {
        debug!(method = "GET", path, "kinetic request");
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| KineticError::TransientNetwork(format!("GET {path} failed: {e}")))?;
        read_json(response, path, Endpoint::Query).await
    }

    async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        endpoint: Endpoint<'_>,
    ) -> Result<T, KineticError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug!(method = "POST", path, "kinetic request");
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| send_failed(path, endpoint, e.is_connect(), e))?;
        read_json(response, path, endpoint).await
    }
}

/// Maps a transport failure to an error kind.
///
/// Only a failed connect proves a submission never left the client. Any
/// other failure on a submit endpoint may have reached the relay.
fn send_failed(
    path: &str,
    endpoint: Endpoint<'_>,
    connect_failed: bool,
    error: impl std::fmt::Display,
) -> KineticError {
    match endpoint {
        Endpoint::Submit { reference_id } if !connect_failed => {
            warn!(path, reference_id, "submission outcome unknown");
            KineticError::SubmissionOutcomeUnknown {
                endpoint: path.to_string(),
                reference_id: reference_id.map(str::to_string),
                message: error.to_string(),
            }
        }
        _ => KineticError::TransientNetwork(format!("POST {path} failed: {error}")),
    }
}

async fn read_json<T: DeserializeOwned>(
    response: Response,
    path: &str,
    endpoint: Endpoint<'_>,
) -> Result<T, KineticError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(path, status = status.as_u16(), "kinetic request rejected");
        return Err(match endpoint {
            Endpoint::Submit { .. } => KineticError::RelaySubmission(format!("{path} returned {status}: {body}")),
            Endpoint::Query => KineticError::ApiRequest {
                endpoint: path.to_string(),
                status: status.as_u16(),
                message: body,
            },
        });
    }

    // A lost body after a successful submit still means the relay has it
    let bytes = response
        .bytes()
        .await
        .map_err(|e| match endpoint {
            Endpoint::Submit { .. } => send_failed(path, endpoint, false, e),
            Endpoint::Query => KineticError::TransientNetwork(format!("{path} body: {e}")),
        })?;
    serde_json::from_slice(&bytes)
        .map_err(|e| KineticError::Serialization(format!("{path} invalid JSON: {e}")))
}

fn header_name(name: &str) -> Result<HeaderName, KineticError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| KineticError::InvalidSdkConfig(format!("invalid header name {:?}", name)))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, KineticError> {
    HeaderValue::from_str(value)
        .map_err(|_| KineticError::InvalidSdkConfig(format!("invalid value for header {:?}", name)))
}

fn submit(envelope: &SubmissionEnvelope) -> Endpoint<'_> {
    Endpoint::Submit {
        reference_id: envelope.reference_id.as_deref(),
    }
}

#[async_trait]
impl AccountLookup for KineticHttpClient {
    async fn list_token_accounts(
        &self,
        account: &str,
        mint: &str,
    ) -> Result<Vec<String>, KineticError> {
        self.get_json(&format!(
            "/api/account/token-accounts/{}/{}/{}/{}",
            self.environment, self.index, account, mint
        ))
        .await
    }
}

#[async_trait]
impl BlockReferenceSource for KineticHttpClient {
    async fn latest_block_reference(&self) -> Result<BlockReference, KineticError> {
        self.get_json(&format!(
            "/api/transaction/latest-blockhash/{}/{}",
            self.environment, self.index
        ))
        .await
    }
}

#[async_trait]
impl TransactionRelay for KineticHttpClient {
    async fn submit_create_account(
        &self,
        envelope: &SubmissionEnvelope,
    ) -> Result<TransactionRecord, KineticError> {
        self.post_json("/api/account/create", envelope, submit(envelope))
            .await
    }

    async fn submit_transfer(
        &self,
        envelope: &SubmissionEnvelope,
    ) -> Result<TransactionRecord, KineticError> {
        self.post_json("/api/transaction/make-transfer", envelope, submit(envelope))
            .await
    }
}

#[async_trait]
impl ConfigSource for KineticHttpClient {
    async fn fetch_app_config(
        &self,
        environment: &str,
        index: u32,
    ) -> Result<AppConfig, KineticError> {
        self.get_json(&format!("/api/app/{}/{}/config", environment, index))
            .await
    }
}

#[async_trait]
impl AccountInfoSource for KineticHttpClient {
    async fn get_balance(&self, account: &str) -> Result<BalanceResponse, KineticError> {
        self.get_json(&format!(
            "/api/account/balance/{}/{}/{}",
            self.environment, self.index, account
        ))
        .await
    }

    async fn get_history(
        &self,
        account: &str,
        mint: &str,
    ) -> Result<Vec<HistoryResponse>, KineticError> {
        self.get_json(&format!(
            "/api/account/history/{}/{}/{}/{}",
            self.environment, self.index, account, mint
        ))
        .await
    }
}

#[async_trait]
impl TransactionLookup for KineticHttpClient {
    async fn get_transaction(
        &self,
        signature: &str,
    ) -> Result<GetTransactionResponse, KineticError> {
        self.get_json(&format!(
            "/api/transaction/transaction/{}/{}/{}",
            self.environment, self.index, signature
        ))
        .await
    }
}

#[async_trait]
impl AirdropSource for KineticHttpClient {
    async fn request_airdrop(
        &self,
        request: &RequestAirdropRequest,
    ) -> Result<RequestAirdropResponse, KineticError> {
        self.post_json("/api/airdrop", request, Endpoint::Query)
            .await
    }
}
