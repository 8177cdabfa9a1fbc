//! Axum route handlers for the minting service.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use mintgate::proto::{CustodialMintResult, MintRequest, MintResult};
use mintgate_svm::ChainRpc;
use mintgate_svm::{build_mint_transaction, mint_asset};
use solana_keypair::Keypair;

use crate::error::ApiError;

/// Shared application state.
pub struct AppState {
    /// Ledger client behind the network seam.
    pub rpc: Arc<dyn ChainRpc>,
    /// Gateway that `ipfs://` metadata URIs resolve through.
    pub ipfs_gateway: String,
    /// Treasury keypair; present only when custodial minting is
    /// enabled.
    pub treasury: Option<Keypair>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("ipfs_gateway", &self.ipfs_gateway)
            .field("custodial", &self.treasury.is_some())
            .finish_non_exhaustive()
    }
}

/// `POST /api/mintTx` — builds a partially signed mint transaction
/// for the requesting wallet to co-sign and submit.
///
/// # Errors
///
/// Returns 400 on a missing or malformed request field, 502 when the
/// ledger RPC is unreachable.
pub async fn post_mint_tx(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MintRequest>,
) -> Result<Json<MintResult>, ApiError> {
    let result =
        build_mint_transaction(state.rpc.as_ref(), &request, &state.ipfs_gateway).await?;
    Ok(Json(result))
}

/// `POST /api/mint` — mints with the server treasury paying and
/// signing everything.
///
/// # Errors
///
/// Returns 404 when custodial minting is disabled, 400 on bad input,
/// 422 when the ledger rejects the transaction.
pub async fn post_mint(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MintRequest>,
) -> Result<Json<CustodialMintResult>, ApiError> {
    let treasury = state.treasury.as_ref().ok_or(ApiError::CustodialDisabled)?;
    let result = mint_asset(state.rpc.as_ref(), treasury, &request, &state.ipfs_gateway).await?;
    Ok(Json(result))
}

/// `GET /health` — liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Creates the service router.
///
/// Endpoints:
/// - `POST /api/mintTx` — build a co-signable mint transaction
/// - `POST /api/mint` — custodial mint (404 unless configured)
/// - `GET /health` — liveness probe
pub fn mint_router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/api/mintTx", axum::routing::post(post_mint_tx))
        .route("/api/mint", axum::routing::post(post_mint))
        .route("/health", axum::routing::get(health))
        .with_state(state)
}
