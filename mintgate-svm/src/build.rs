//! Server-side composition and partial signing.
//!
//! One call builds one envelope. The asset identity is generated
//! here, signs here, and is dropped here; nothing about it survives
//! the call except the signature embedded in the returned envelope.

use mintgate::proto::{MintRequest, MintResult};
use mintgate::{MintError, uri};
use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;

use crate::derive;
use crate::envelope::Envelope;
use crate::instructions::{self, MintParties};
use crate::rpc::ChainRpc;

/// Builds and partially signs the mint transaction for a co-signing
/// wallet.
///
/// The owner identity is the fee payer and every authority; the
/// server contributes only the ephemeral mint signature. Validation
/// runs before any network call, and the freshness token is fetched
/// immediately before signing so its validity window starts as late
/// as possible.
///
/// # Errors
///
/// - [`MintError::Validation`] for a missing or malformed field,
///   raised with zero RPC calls made.
/// - [`MintError::Network`] if the rent or blockhash fetch fails.
/// - [`MintError::Signing`] if the ephemeral key cannot sign.
pub async fn build_mint_transaction<R: ChainRpc + ?Sized>(
    rpc: &R,
    request: &MintRequest,
    ipfs_gateway: &str,
) -> Result<MintResult, MintError> {
    request.validate()?;
    let owner: Pubkey = request
        .owner
        .parse()
        .map_err(|e| MintError::validation(format!("owner is not a valid public key: {e}")))?;

    let metadata_uri = uri::normalize(&request.metadata_uri, ipfs_gateway);

    // Request-scoped asset identity. The secret half lives only in
    // this binding; it is never persisted or logged.
    let mint = Keypair::new();
    let mint_address = mint.pubkey();

    let rent_lamports = derive::mint_rent_minimum(rpc).await?;
    let parties = MintParties {
        payer: owner,
        token_owner: owner,
    };
    let instructions = instructions::assemble(
        &mint_address,
        &parties,
        rent_lamports,
        request.display_name(),
        &metadata_uri,
    )?;

    let (recent_blockhash, freshness_expiry) = rpc.latest_blockhash().await?;
    let mut envelope = Envelope::compose(&owner, &instructions, recent_blockhash)?;
    envelope.sign_with(&mint)?;

    tracing::debug!(
        mint = %mint_address,
        owner = %owner,
        freshness_expiry,
        "built partially signed mint envelope"
    );

    Ok(MintResult {
        tx_encoded: envelope.encode_base64()?,
        mint_address: mint_address.to_string(),
        freshness_expiry,
    })
}
