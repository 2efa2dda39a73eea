//! Transaction construction and submission to relay endpoints
//!
//! Blockhash and nonce reads go through [`rpc::RpcReader`]; message building
//! and signing use solana-sdk behind the [`TransactionSdk`] trait; the
//! [`Submitter`] drives a [`SubmissionPlan`] sequentially or as a fan-out.

pub mod endpoint;
pub mod keys;
pub mod rpc;
pub mod sdk;
pub mod submit;

pub use endpoint::{RelayEndpoint, Tip};
pub use keys::{parse_keypair, parse_pubkey};
pub use rpc::{parse_nonce_account, RpcReader};
pub use sdk::{HashSource, SolanaSdk, TransactionSdk, TransferPlan};
pub use submit::{SubmissionOutcome, SubmissionPlan, SubmissionReport, SubmissionResult, Submitter};
