//! Create-account and transfer flows.
//!
//! Each call resolves the app config and mint, checks preconditions against
//! the API, then fetches a fresh block reference, builds, signs and submits.
//! Nothing is retried. Once a submission has been dispatched, a failed or
//! cancelled call has an unknown outcome and callers should reconcile by
//! reference id.

use crate::amount;
use crate::builder::{self, CreateAccountParams, TransferParams, UnsignedTransactionIntent};
use crate::client::{Commitment, KineticApi, SubmissionEnvelope, TransactionRecord};
use crate::config::{AppConfig, AppConfigMint, AppConfigResolver};
use crate::error::KineticError;
use crate::keypair::SigningIdentity;
use crate::memo::TransactionType;
use crate::transaction::TransactionExt;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct CreateAccountOptions<'a> {
    pub commitment: Option<Commitment>,
    pub mint: Option<String>,
    pub owner: &'a SigningIdentity,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
}

impl<'a> CreateAccountOptions<'a> {
    pub fn new(owner: &'a SigningIdentity) -> Self {
        CreateAccountOptions {
            commitment: None,
            mint: None,
            owner,
            reference_id: None,
            reference_type: None,
        }
    }
}

#[derive(Debug)]
pub struct MakeTransferOptions<'a> {
    /// Decimal amount, e.g. `"10.5"`.
    pub amount: String,
    pub commitment: Option<Commitment>,
    pub destination: String,
    pub mint: Option<String>,
    pub owner: &'a SigningIdentity,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
    /// Create the destination's token account if it has none.
    pub sender_create: bool,
    pub tx_type: TransactionType,
}

impl<'a> MakeTransferOptions<'a> {
    pub fn new(
        owner: &'a SigningIdentity,
        destination: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        MakeTransferOptions {
            amount: amount.into(),
            commitment: None,
            destination: destination.into(),
            mint: None,
            owner,
            reference_id: None,
            reference_type: None,
            sender_create: false,
            tx_type: TransactionType::None,
        }
    }
}

/// Runs the per-call flows against a [`KineticApi`].
pub struct TransactionOrchestrator<A> {
    api: Arc<A>,
    resolver: Arc<AppConfigResolver>,
    default_commitment: Commitment,
}

impl<A: KineticApi> TransactionOrchestrator<A> {
    pub fn new(api: Arc<A>, resolver: Arc<AppConfigResolver>, default_commitment: Commitment) -> Self {
        TransactionOrchestrator {
            api,
            resolver,
            default_commitment,
        }
    }

    pub async fn create_account(
        &self,
        options: CreateAccountOptions<'_>,
    ) -> Result<TransactionRecord, KineticError> {
        let owner = options.owner.public_key();
        debug!(owner, "create_account: init");

        let config = self.resolver.require_config()?;
        let mint = config.resolve_mint(options.mint.as_deref())?;
        debug!(owner, mint = %mint.public_key, "create_account: mint resolved");

        let existing = self
            .api
            .list_token_accounts(owner, &mint.public_key)
            .await?;
        if !existing.is_empty() {
            return Err(KineticError::AccountAlreadyExists {
                owner: owner.to_string(),
                mint: mint.public_key.clone(),
            });
        }
        debug!(owner, "create_account: preconditions checked");

        let block = self.api.latest_block_reference().await?;
        debug!(
            owner,
            last_valid_block_height = block.last_valid_block_height,
            "create_account: block reference fetched"
        );

        let intent = builder::build_create_account(CreateAccountParams {
            mint,
            block: &block,
            app_index: config.app_index(),
            owner,
        })?;
        let envelope = self.sign_and_wrap(
            intent,
            options.owner,
            &config,
            mint,
            options.commitment,
            options.reference_id,
            options.reference_type,
        )?;

        let record = self.api.submit_create_account(&envelope).await?;
        info!(
            owner,
            signature = record.signature.as_deref().unwrap_or_default(),
            "create_account: submitted"
        );
        Ok(record)
    }

    pub async fn make_transfer(
        &self,
        options: MakeTransferOptions<'_>,
    ) -> Result<TransactionRecord, KineticError> {
        let owner = options.owner.public_key();
        debug!(owner, destination = %options.destination, "make_transfer: init");

        let config = self.resolver.require_config()?;
        let mint = config.resolve_mint(options.mint.as_deref())?;
        debug!(owner, mint = %mint.public_key, "make_transfer: mint resolved");

        amount::parse_amount(&options.amount, mint.decimals)?;
        config.validate_destination(&options.destination)?;

        let accounts = self
            .api
            .list_token_accounts(&options.destination, &mint.public_key)
            .await?;
        if accounts.is_empty() && !options.sender_create {
            return Err(KineticError::DestinationAccountMissing {
                destination: options.destination.clone(),
                mint: mint.public_key.clone(),
            });
        }
        debug!(owner, "make_transfer: preconditions checked");

        let block = self.api.latest_block_reference().await?;
        debug!(
            owner,
            last_valid_block_height = block.last_valid_block_height,
            "make_transfer: block reference fetched"
        );

        let intent = builder::build_transfer(TransferParams {
            mint,
            amount: &options.amount,
            block: &block,
            destination: &options.destination,
            app_index: config.app_index(),
            owner,
            sender_create: options.sender_create,
            tx_type: options.tx_type,
        })?;
        let envelope = self.sign_and_wrap(
            intent,
            options.owner,
            &config,
            mint,
            options.commitment,
            options.reference_id,
            options.reference_type,
        )?;

        let record = self.api.submit_transfer(&envelope).await?;
        info!(
            owner,
            signature = record.signature.as_deref().unwrap_or_default(),
            "make_transfer: submitted"
        );
        Ok(record)
    }

    #[allow(clippy::too_many_arguments)]
    fn sign_and_wrap(
        &self,
        intent: UnsignedTransactionIntent,
        owner: &SigningIdentity,
        config: &AppConfig,
        mint: &AppConfigMint,
        commitment: Option<Commitment>,
        reference_id: Option<String>,
        reference_type: Option<String>,
    ) -> Result<SubmissionEnvelope, KineticError> {
        let mut transaction = intent.transaction;
        TransactionExt::partial_sign(&mut transaction, owner)?;
        debug!(owner = owner.public_key(), "transaction built and signed");

        let tx = transaction.to_base64()?;
        debug!(owner = owner.public_key(), bytes = tx.len(), "transaction serialized");

        Ok(SubmissionEnvelope {
            commitment: commitment.unwrap_or(self.default_commitment),
            environment: config.environment_name().to_string(),
            index: config.app_index(),
            mint: mint.public_key.clone(),
            last_valid_block_height: intent.last_valid_block_height,
            tx,
            reference_id,
            reference_type,
        })
    }
}
