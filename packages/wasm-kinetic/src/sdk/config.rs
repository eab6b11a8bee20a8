use crate::client::Commitment;
use crate::error::KineticError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Connection settings for a Kinetic API deployment.
///
/// ```
/// use wasm_kinetic::KineticSdkConfig;
///
/// let config: KineticSdkConfig = serde_json::from_str(
///     r#"{ "endpoint": "https://sandbox.kinetic.host", "environment": "devnet", "index": 1 }"#,
/// ).unwrap();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KineticSdkConfig {
    pub endpoint: String,
    pub environment: String,
    pub index: u32,
    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Used when a call does not name its own commitment.
    #[serde(default)]
    pub commitment: Commitment,
}

impl KineticSdkConfig {
    pub fn new(endpoint: impl Into<String>, environment: impl Into<String>, index: u32) -> Self {
        KineticSdkConfig {
            endpoint: endpoint.into(),
            environment: environment.into(),
            index,
            headers: BTreeMap::new(),
            commitment: Commitment::default(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn validate(&self) -> Result<(), KineticError> {
        let url = url::Url::parse(&self.endpoint).map_err(|e| {
            KineticError::InvalidSdkConfig(format!("endpoint {:?}: {}", self.endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(KineticError::InvalidSdkConfig(format!(
                "endpoint {:?} is not an http(s) URL",
                self.endpoint
            )));
        }
        if self.environment.trim().is_empty() {
            return Err(KineticError::InvalidSdkConfig(
                "environment is empty".to_string(),
            ));
        }
        if self.index == 0 {
            return Err(KineticError::InvalidSdkConfig(
                "index must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Endpoint without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}
