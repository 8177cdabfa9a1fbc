//! Protocol core for the mintgate co-signed minting service.
//!
//! A mint is produced by two signers that never share key material:
//! the server holds an ephemeral keypair for the new asset, the
//! requesting wallet holds the fee-paying owner key. The server builds
//! and partially signs one atomic transaction, hands it across the
//! process boundary in a transport-safe encoding, and the client
//! completes signing and submission on the other side.
//!
//! This crate holds the chain-agnostic pieces of that protocol:
//!
//! - [`proto`] — request/result wire types and their validation
//! - [`encoding`] — the transfer encoding for partially signed
//!   envelopes
//! - [`error`] — the shared error taxonomy
//! - [`uri`] — metadata pointer normalization
//!
//! The Solana-specific implementation lives in `mintgate-svm`; the
//! HTTP surface in `mintgate-server`.

pub mod encoding;
pub mod error;
pub mod proto;
pub mod uri;

pub use error::MintError;
pub use proto::{CustodialMintResult, MintRequest, MintResult};
