//! Deterministic account derivation.
//!
//! Every address in the mint transaction other than the mint itself
//! is a pure function of the mint and owner identities. The derivation
//! rules must match the on-chain programs exactly; a mismatched seed
//! order produces an address the network rejects as not-found.

use mintgate::MintError;
use solana_pubkey::{Pubkey, pubkey};
use spl_token::solana_program::program_pack::Pack;

use crate::rpc::ChainRpc;

/// Associated Token Account program.
pub const ATA_PROGRAM_ID: Pubkey = pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// System program.
pub const SYSTEM_PROGRAM_ID: Pubkey = pubkey!("11111111111111111111111111111111");

/// Token Metadata program.
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Derives the owner's associated token account for a mint.
///
/// Seeds are `[owner, token_program, mint]` under the ATA program.
#[must_use]
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    let (address, _) = Pubkey::find_program_address(
        &[owner.as_ref(), spl_token::ID.as_ref(), mint.as_ref()],
        &ATA_PROGRAM_ID,
    );
    address
}

/// Derives the metadata account for a mint.
#[must_use]
pub fn metadata_address(mint: &Pubkey) -> Pubkey {
    let (address, _) = Pubkey::find_program_address(
        &[
            b"metadata",
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    );
    address
}

/// Derives the master edition account for a mint.
#[must_use]
pub fn edition_address(mint: &Pubkey) -> Pubkey {
    let (address, _) = Pubkey::find_program_address(
        &[
            b"metadata",
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
            b"edition",
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    );
    address
}

/// Fetches the lamports needed to keep a mint-sized account
/// rent-exempt. Consumed, not cached: the minimum moves with network
/// parameters.
///
/// # Errors
///
/// Returns [`MintError::Network`] if the RPC call fails.
pub async fn mint_rent_minimum<R: ChainRpc + ?Sized>(rpc: &R) -> Result<u64, MintError> {
    rpc.rent_exempt_minimum(spl_token::state::Mint::LEN).await
}
