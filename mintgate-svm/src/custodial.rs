//! Fully custodial minting with a durable server treasury.
//!
//! The treasury keypair pays the fees and holds every authority; the
//! requesting wallet only receives the token. The server signs the
//! whole transaction, submits it, and waits for settlement itself.

use std::path::Path;

use mintgate::proto::{CustodialMintResult, MintRequest};
use mintgate::{MintError, uri};
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;

use crate::client::{CompletionConfig, await_confirmation};
use crate::derive;
use crate::envelope::Envelope;
use crate::instructions::{self, MintParties};
use crate::rpc::ChainRpc;

/// Mints an asset entirely with the treasury keypair.
///
/// `owner` on the request is optional here; when empty, the treasury
/// keeps the freshly minted token.
///
/// # Errors
///
/// - [`MintError::Validation`] for a missing `metadataUri` or a
///   malformed owner key.
/// - [`MintError::AuthorizationRejected`] if the ledger rejects the
///   transaction or the freshness token expires before settlement.
pub async fn mint_asset<R: ChainRpc + ?Sized, S: Signer>(
    rpc: &R,
    treasury: &S,
    request: &MintRequest,
    ipfs_gateway: &str,
) -> Result<CustodialMintResult, MintError> {
    if request.metadata_uri.trim().is_empty() {
        return Err(MintError::validation("metadataUri is required"));
    }
    let token_owner: Pubkey = if request.owner.trim().is_empty() {
        treasury.pubkey()
    } else {
        request
            .owner
            .parse()
            .map_err(|e| MintError::validation(format!("owner is not a valid public key: {e}")))?
    };

    let metadata_uri = uri::normalize(&request.metadata_uri, ipfs_gateway);
    let mint = Keypair::new();
    let mint_address = mint.pubkey();

    let rent_lamports = derive::mint_rent_minimum(rpc).await?;
    let parties = MintParties {
        payer: treasury.pubkey(),
        token_owner,
    };
    let instructions = instructions::assemble(
        &mint_address,
        &parties,
        rent_lamports,
        request.display_name(),
        &metadata_uri,
    )?;

    let (recent_blockhash, last_valid_block_height) = rpc.latest_blockhash().await?;
    let mut envelope = Envelope::compose(&treasury.pubkey(), &instructions, recent_blockhash)?;
    envelope.sign_with(treasury)?;
    envelope.sign_with(&mint)?;
    if !envelope.is_fully_signed() {
        return Err(MintError::Signing(
            "custodial envelope incomplete after treasury and mint signed".into(),
        ));
    }

    let signature = rpc.submit(envelope.inner()).await?;
    tracing::info!(%signature, mint = %mint_address, "submitted custodial mint");
    await_confirmation(
        rpc,
        &signature,
        last_valid_block_height,
        CompletionConfig::default().poll_interval,
    )
    .await?;

    Ok(CustodialMintResult {
        mint_address: mint_address.to_string(),
        uri: metadata_uri,
    })
}

/// Loads the treasury keypair from a JSON byte-array file, the format
/// wallet tooling exports.
pub fn load_treasury_keypair(path: &Path) -> Result<Keypair, MintError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        MintError::Signing(format!("cannot read keypair file {}: {e}", path.display()))
    })?;
    let bytes: Vec<u8> = serde_json::from_str(&raw)
        .map_err(|e| MintError::Signing(format!("keypair file is not a JSON byte array: {e}")))?;
    Keypair::try_from(bytes.as_slice())
        .map_err(|e| MintError::Signing(format!("invalid keypair bytes: {e}")))
}

#[cfg(test)]
mod tests {
    use mintgate::uri::DEFAULT_IPFS_GATEWAY;

    use super::*;
    use crate::rpc::TxStatus;
    use crate::rpc::testing::MockRpc;

    fn request(owner: String) -> MintRequest {
        MintRequest {
            name: "Custodial Test".into(),
            metadata_uri: "ipfs://abc".into(),
            owner,
        }
    }

    #[tokio::test]
    async fn test_custodial_mint_settles() {
        let rpc = MockRpc::default();
        rpc.push_status(TxStatus::Confirmed);

        let treasury = Keypair::new();
        let recipient = Keypair::new();
        let result = mint_asset(
            &rpc,
            &treasury,
            &request(recipient.pubkey().to_string()),
            DEFAULT_IPFS_GATEWAY,
        )
        .await
        .unwrap();

        assert_eq!(rpc.submit_count(), 1);
        assert!(result.uri.starts_with(DEFAULT_IPFS_GATEWAY));
        assert_ne!(result.mint_address, treasury.pubkey().to_string());
    }

    #[tokio::test]
    async fn test_empty_owner_defaults_to_the_treasury() {
        let rpc = MockRpc::default();
        rpc.push_status(TxStatus::Confirmed);

        let treasury = Keypair::new();
        mint_asset(&rpc, &treasury, &request(String::new()), DEFAULT_IPFS_GATEWAY)
            .await
            .unwrap();
        assert_eq!(rpc.submit_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_uri_is_rejected_offline() {
        let rpc = MockRpc::default();
        let treasury = Keypair::new();
        let mut req = request(String::new());
        req.metadata_uri = String::new();

        let err = mint_asset(&rpc, &treasury, &req, DEFAULT_IPFS_GATEWAY)
            .await
            .unwrap_err();
        assert!(matches!(err, MintError::Validation(_)));
        assert_eq!(rpc.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_ledger_rejection_propagates() {
        let rpc = MockRpc::default();
        rpc.push_status(TxStatus::Failed("insufficient funds for rent".into()));

        let treasury = Keypair::new();
        let recipient = Keypair::new();
        let err = mint_asset(
            &rpc,
            &treasury,
            &request(recipient.pubkey().to_string()),
            DEFAULT_IPFS_GATEWAY,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MintError::AuthorizationRejected(_)));
    }

    #[test]
    fn test_load_treasury_keypair_round_trip() {
        let keypair = Keypair::new();
        let dir = std::env::temp_dir();
        let path = dir.join(format!("mintgate-treasury-{}.json", keypair.pubkey()));
        let bytes: Vec<u8> = keypair.to_bytes().to_vec();
        std::fs::write(&path, serde_json::to_string(&bytes).unwrap()).unwrap();

        let loaded = load_treasury_keypair(&path).unwrap();
        assert_eq!(loaded.pubkey(), keypair.pubkey());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_treasury_keypair_missing_file() {
        let err = load_treasury_keypair(Path::new("/nonexistent/treasury.json")).unwrap_err();
        assert!(matches!(err, MintError::Signing(_)));
    }
}
