//! wasm-kinetic: client core for the Kinetic token API on Solana.
//!
//! Kinetic apps hold their own keys but never pay fees: the client builds
//! and signs a transaction as the token owner, and the Kinetic relay adds
//! the fee payer signature and broadcasts it.
//!
//! # Architecture
//!
//! The crate follows a two-layer architecture:
//!
//! 1. **Core** - key derivation (`derivation`, `keypair`), app config
//!    resolution (`config`), pure transaction building (`builder`,
//!    `instructions`, `memo`, `amount`), signing (`transaction`), async API
//!    collaborators (`client`) and the per-call flows (`sdk`)
//! 2. **WASM bindings** (`wasm/`) - Thin wrappers that expose key handling
//!    and transaction building to JavaScript
//!
//! # Usage from Rust
//!
//! ```rust
//! use wasm_kinetic::{derivation, RecoveryPhrase};
//!
//! let phrase = RecoveryPhrase::parse(
//!     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
//! ).unwrap();
//! let accounts = derivation::derive_range(&phrase, 0, 3).unwrap();
//! assert_eq!(accounts.len(), 3);
//! assert_eq!(accounts[2].index(), Some(2));
//! ```

pub mod amount;
pub mod builder;
pub mod client;
pub mod config;
pub mod derivation;
mod error;
pub mod instructions;
pub mod keypair;
pub mod memo;
pub mod sdk;
pub mod transaction;
pub mod wasm;

// Re-export core types at crate root
pub use builder::{BlockReference, UnsignedTransactionIntent};
pub use client::{Commitment, KineticApi, SubmissionEnvelope, TransactionRecord};
pub use config::{AppConfig, AppConfigMint, AppConfigResolver};
pub use error::{ErrorKind, KineticError};
pub use keypair::{Keypair, KeypairExt, RecoveryPhrase, SigningIdentity};
pub use memo::{KinBinaryMemo, TransactionType};
pub use sdk::{
    CreateAccountOptions, KineticSdk, KineticSdkConfig, MakeTransferOptions,
    RequestAirdropOptions, TransactionOrchestrator,
};
pub use transaction::{SerializeConfig, Transaction, TransactionExt};

#[cfg(not(target_arch = "wasm32"))]
pub use client::KineticHttpClient;

// Re-export WASM types
pub use wasm::{BuilderNamespace, WasmKeypair};
