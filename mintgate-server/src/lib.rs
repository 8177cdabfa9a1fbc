//! HTTP surface of the minting service.
//!
//! Exposes two mint endpoints: `/api/mintTx` builds a partially
//! signed transaction for a co-signing wallet, and `/api/mint` is the
//! custodial path where a configured treasury keypair pays and signs
//! everything. Configuration, error mapping, and the router live in
//! the submodules.

pub mod config;
pub mod error;
pub mod handlers;

pub use config::ServerConfig;
pub use error::ApiError;
pub use handlers::{AppState, mint_router};
