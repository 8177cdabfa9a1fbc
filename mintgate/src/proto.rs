//! Wire types for the minting API.
//!
//! Field names follow the JSON surface consumed by the wallet UI
//! (camelCase). Validation is purely structural here; key parsing
//! belongs to the chain layer.

use serde::{Deserialize, Serialize};

use crate::error::MintError;

/// Display name applied when the request leaves `name` empty.
pub const DEFAULT_ASSET_NAME: &str = "Mintgate Asset";

/// Inbound request to build (or custodially perform) a mint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    /// Display name for the asset. Empty falls back to
    /// [`DEFAULT_ASSET_NAME`].
    #[serde(default)]
    pub name: String,
    /// Metadata pointer (typically `ipfs://CID`). Required.
    #[serde(default)]
    pub metadata_uri: String,
    /// Base58 public identity of the requesting wallet. Required.
    #[serde(default)]
    pub owner: String,
}

impl MintRequest {
    /// Checks that the required fields are present.
    ///
    /// Runs before any key generation or network call so that a
    /// malformed request never costs an RPC round trip.
    ///
    /// # Errors
    ///
    /// Returns [`MintError::Validation`] naming the missing field.
    pub fn validate(&self) -> Result<(), MintError> {
        if self.metadata_uri.trim().is_empty() {
            return Err(MintError::validation("metadataUri required"));
        }
        if self.owner.trim().is_empty() {
            return Err(MintError::validation("owner required"));
        }
        Ok(())
    }

    /// The display name to embed on chain.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            DEFAULT_ASSET_NAME
        } else {
            trimmed
        }
    }
}

/// Result of a co-signed build: a partially signed envelope the
/// client must complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintResult {
    /// Transport-encoded (base64) partially signed envelope.
    pub tx_encoded: String,
    /// Public identity of the freshly generated asset.
    pub mint_address: String,
    /// Last block height at which the envelope's freshness token is
    /// still valid. The client restarts from a fresh build past this.
    pub freshness_expiry: u64,
}

/// Result of the custodial single-signer path: the mint has already
/// been submitted and confirmed server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodialMintResult {
    /// Public identity of the minted asset.
    pub mint_address: String,
    /// Normalized metadata URI embedded on chain.
    pub uri: String,
}
