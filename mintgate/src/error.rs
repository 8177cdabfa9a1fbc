//! Error taxonomy shared across the minting protocol.

/// Errors surfaced by transaction building, completion, and the
/// custodial path.
///
/// Only [`MintError::Network`] is worth retrying, and a retry means a
/// fresh build: an already-signed envelope fixes its freshness token
/// at signing time and cannot be salvaged.
#[derive(Debug, thiserror::Error)]
pub enum MintError {
    /// A request field is missing or malformed. Surfaced to the
    /// caller verbatim; never retryable.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A deterministic address derivation produced no result. This
    /// cannot happen with well-formed inputs and indicates a logic
    /// defect, not an environmental failure.
    #[error("address derivation failed: {0}")]
    Derivation(String),

    /// An RPC call failed (rent minimum, freshness token, submission,
    /// or status polling). Retryable with backoff by the caller.
    #[error("network error: {0}")]
    Network(String),

    /// The network rejected a fully signed transaction. Carries the
    /// network's raw reason text; usually means rebuild from scratch.
    #[error("transaction rejected: {0}")]
    AuthorizationRejected(String),

    /// An upstream dependency returned a payload that is neither the
    /// expected artifact nor a recognizable error body. The raw
    /// payload is attached for diagnosis.
    #[error("unexpected upstream response: {0}")]
    UnexpectedResponse(String),

    /// A required signer was unavailable or not among the
    /// transaction's required signers. Raised before any network
    /// call: an envelope claiming a signature that was never applied
    /// would silently corrupt the protocol.
    #[error("signing failed: {0}")]
    Signing(String),
}

impl MintError {
    /// Whether the caller may retry the operation (with a fresh
    /// build) rather than treat the failure as terminal.
    #[must_use]
    pub const fn retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Shorthand for a [`MintError::Validation`] error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Shorthand for a [`MintError::Network`] error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}
