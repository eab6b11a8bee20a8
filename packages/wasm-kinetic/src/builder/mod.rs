//! Transaction building module.
//!
//! Turns a resolved mint, a fresh block reference and the caller's
//! parameters into an unsigned Solana transaction. Nothing here performs
//! I/O; the orchestrator fetches inputs and submits outputs.

mod build;
mod types;

pub use build::{build_create_account, build_transfer};
pub use types::{
    BlockReference, CreateAccountParams, TransactionKind, TransferParams,
    UnsignedTransactionIntent,
};
