use wasm_bindgen::prelude::*;

/// Copyable discriminant of [`KineticError`], for callers that branch on
/// the failure class (retry, fix input, surface to the user).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPhrase,
    MalformedSecret,
    InvalidDerivationIndex,
    DerivationRangeTooLarge,
    SecretCleared,
    ConfigNotInitialized,
    InvalidSdkConfig,
    MintNotFound,
    AccountAlreadyExists,
    DestinationAccountMissing,
    InvalidDestination,
    InvalidAmount,
    InvalidAddress,
    InvalidMemo,
    Serialization,
    TransientNetwork,
    RelaySubmission,
    SubmissionOutcomeUnknown,
    ApiRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KineticError {
    #[error("Invalid recovery phrase: {0}")]
    InvalidPhrase(String),

    #[error("Malformed secret key: {0}")]
    MalformedSecret(String),

    #[error("Derivation index {0} is outside the hardened range")]
    InvalidDerivationIndex(u32),

    #[error("Cannot derive indices {from}..{to} in one call")]
    DerivationRangeTooLarge { from: u32, to: u32 },

    #[error("Secret key has been cleared for {0}")]
    SecretCleared(String),

    #[error("App config not initialized")]
    ConfigNotInitialized,

    #[error("Invalid SDK config: {0}")]
    InvalidSdkConfig(String),

    #[error("Mint not found: {0}")]
    MintNotFound(String),

    #[error("Token account already exists for owner {owner} and mint {mint}")]
    AccountAlreadyExists { owner: String, mint: String },

    #[error("Destination account {destination} does not exist for mint {mint}")]
    DestinationAccountMissing { destination: String, mint: String },

    #[error("Cannot transfer to a mint address: {0}")]
    InvalidDestination(String),

    #[error("Invalid amount {amount:?}: {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("Invalid {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("Invalid memo: {0}")]
    InvalidMemo(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Network request failed: {0}")]
    TransientNetwork(String),

    #[error("Relay rejected submission: {0}")]
    RelaySubmission(String),

    /// The submission left the client but no response came back. The relay
    /// may have accepted it; reconcile by `reference_id` before resubmitting.
    #[error("Outcome of submission to {endpoint} is unknown (reference {reference_id:?}): {message}")]
    SubmissionOutcomeUnknown {
        endpoint: String,
        reference_id: Option<String>,
        message: String,
    },

    #[error("Request to {endpoint} returned {status}: {message}")]
    ApiRequest {
        endpoint: String,
        status: u16,
        message: String,
    },
}

impl KineticError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KineticError::InvalidPhrase(_) => ErrorKind::InvalidPhrase,
            KineticError::MalformedSecret(_) => ErrorKind::MalformedSecret,
            KineticError::InvalidDerivationIndex(_) => ErrorKind::InvalidDerivationIndex,
            KineticError::DerivationRangeTooLarge { .. } => ErrorKind::DerivationRangeTooLarge,
            KineticError::SecretCleared(_) => ErrorKind::SecretCleared,
            KineticError::ConfigNotInitialized => ErrorKind::ConfigNotInitialized,
            KineticError::InvalidSdkConfig(_) => ErrorKind::InvalidSdkConfig,
            KineticError::MintNotFound(_) => ErrorKind::MintNotFound,
            KineticError::AccountAlreadyExists { .. } => ErrorKind::AccountAlreadyExists,
            KineticError::DestinationAccountMissing { .. } => ErrorKind::DestinationAccountMissing,
            KineticError::InvalidDestination(_) => ErrorKind::InvalidDestination,
            KineticError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            KineticError::InvalidAddress { .. } => ErrorKind::InvalidAddress,
            KineticError::InvalidMemo(_) => ErrorKind::InvalidMemo,
            KineticError::Serialization(_) => ErrorKind::Serialization,
            KineticError::TransientNetwork(_) => ErrorKind::TransientNetwork,
            KineticError::RelaySubmission(_) => ErrorKind::RelaySubmission,
            KineticError::SubmissionOutcomeUnknown { .. } => ErrorKind::SubmissionOutcomeUnknown,
            KineticError::ApiRequest { .. } => ErrorKind::ApiRequest,
        }
    }

    pub(crate) fn invalid_amount(amount: &str, reason: impl Into<String>) -> Self {
        KineticError::InvalidAmount {
            amount: amount.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_address(field: &'static str, value: &str) -> Self {
        KineticError::InvalidAddress {
            field,
            value: value.to_string(),
        }
    }
}

// Required for wasm_bindgen to convert errors to JavaScript exceptions
// Uses js_sys::Error to create a proper JavaScript Error with stack trace
impl From<KineticError> for JsValue {
    fn from(err: KineticError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let err = KineticError::AccountAlreadyExists {
            owner: "owner".to_string(),
            mint: "mint".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::AccountAlreadyExists);
        assert_eq!(
            KineticError::ConfigNotInitialized.kind(),
            ErrorKind::ConfigNotInitialized
        );
    }

    #[test]
    fn test_display_names_offending_field() {
        let err = KineticError::invalid_address("destination", "not-a-key");
        assert_eq!(err.to_string(), "Invalid destination: not-a-key");

        let err = KineticError::invalid_amount("1.234", "too many decimals");
        assert!(err.to_string().contains("\"1.234\""));
    }
}
