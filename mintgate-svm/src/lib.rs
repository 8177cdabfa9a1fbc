//! Solana implementation of the mintgate co-signed minting protocol.
//!
//! The hard problem this crate solves is building a single atomic,
//! six-instruction Solana transaction that must be signed by two
//! parties who never share key material: the server's request-scoped
//! mint keypair and the requesting wallet's fee-paying key. The
//! server partially signs, hands the envelope over as base64, and the
//! client completes signing, submission, and bounded confirmation.
//!
//! # Modules
//!
//! - [`derive`] — deterministic account derivation (associated token
//!   account, metadata, master edition)
//! - [`instructions`] — the ordered six-instruction assembly
//! - [`metadata`] — metadata/edition builders and the adapter across
//!   the metadata toolkit's SDK boundary
//! - [`envelope`] — transaction envelope with positioned partial
//!   signing and transfer encoding
//! - [`build`] — server-side composition and partial signing
//! - [`client`] — client-side completion state machine
//! - [`custodial`] — single-signer alternative where the server holds
//!   a durable funded keypair
//! - [`rpc`] — the network client seam

pub mod build;
pub mod client;
pub mod custodial;
pub mod derive;
pub mod envelope;
pub mod instructions;
pub mod metadata;
pub mod rpc;

pub use build::build_mint_transaction;
pub use client::{Completion, CompletionConfig, CompletionState};
pub use custodial::mint_asset;
pub use envelope::Envelope;
pub use rpc::{ChainRpc, TxStatus};
