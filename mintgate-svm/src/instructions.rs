//! The six-instruction mint assembly.
//!
//! Order matters: each instruction depends on state established by the
//! previous one inside the same atomic transaction. The mint account
//! must exist before it is initialized, and the metadata record must
//! exist before the edition links back to it.

use mintgate::MintError;
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;
use spl_token::solana_program::program_pack::Pack;

use crate::derive::{ATA_PROGRAM_ID, SYSTEM_PROGRAM_ID, associated_token_address};
use crate::metadata;

/// Non-fungible: supply is exactly one indivisible unit.
pub const MINT_DECIMALS: u8 = 0;

/// System program `CreateAccount` discriminant.
const SYSTEM_CREATE_ACCOUNT: u32 = 0;

/// ATA program `CreateIdempotent` discriminator byte.
const ATA_CREATE_IDEMPOTENT: u8 = 1;

/// The identities an assembly is built around.
///
/// In the co-signed flow the payer is the requesting wallet and also
/// receives the token. The custodial flow pays from the server's
/// durable key and may deliver the token to a different wallet.
#[derive(Debug, Clone, Copy)]
pub struct MintParties {
    /// Pays rent and fees and holds mint, freeze, and update
    /// authority. A required signer.
    pub payer: Pubkey,
    /// Wallet whose associated token account receives the one unit.
    pub token_owner: Pubkey,
}

/// Builds the full instruction sequence for one mint.
///
/// 1. Create the mint account (rent-exempt, mint-sized, owned by the
///    token program).
/// 2. Initialize it: zero decimals, payer as mint + freeze authority.
/// 3. Create the owner's associated token account if absent.
/// 4. Mint exactly one unit into it, authority = payer.
/// 5. Create the metadata record.
/// 6. Create the master edition, capping supply at zero.
///
/// # Errors
///
/// Returns [`MintError::Derivation`] if a token instruction builder
/// rejects its inputs; this cannot happen with well-formed identities.
pub fn assemble(
    mint: &Pubkey,
    parties: &MintParties,
    rent_lamports: u64,
    name: &str,
    uri: &str,
) -> Result<Vec<Instruction>, MintError> {
    let token_account = associated_token_address(&parties.token_owner, mint);

    let initialize_mint = spl_token::instruction::initialize_mint(
        &spl_token::ID,
        mint,
        &parties.payer,
        Some(&parties.payer),
        MINT_DECIMALS,
    )
    .map_err(|e| MintError::Derivation(e.to_string()))?;

    let mint_one_unit = spl_token::instruction::mint_to(
        &spl_token::ID,
        mint,
        &token_account,
        &parties.payer,
        &[],
        1,
    )
    .map_err(|e| MintError::Derivation(e.to_string()))?;

    Ok(vec![
        create_mint_account(&parties.payer, mint, rent_lamports),
        initialize_mint,
        create_token_account(&parties.payer, &token_account, &parties.token_owner, mint),
        mint_one_unit,
        metadata::create_metadata_instruction(mint, &parties.payer, name, uri),
        metadata::create_master_edition_instruction(mint, &parties.payer),
    ])
}

/// System-program instruction creating the mint account at the asset
/// identity's address, funded by the payer.
///
/// Wire layout: `u32` discriminant, lamports and space as `u64` LE,
/// then the owning program id. Both the funder and the new account
/// must sign, which is why the ephemeral mint key is a required
/// signer of the whole transaction.
fn create_mint_account(payer: &Pubkey, mint: &Pubkey, lamports: u64) -> Instruction {
    let space = spl_token::state::Mint::LEN as u64;
    let mut data = Vec::with_capacity(4 + 8 + 8 + 32);
    data.extend_from_slice(&SYSTEM_CREATE_ACCOUNT.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    data.extend_from_slice(&space.to_le_bytes());
    data.extend_from_slice(spl_token::ID.as_ref());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*mint, true),
        ],
        data,
    }
}

/// ATA-program instruction creating the owner's associated token
/// account. `CreateIdempotent` succeeds even when the account already
/// exists.
fn create_token_account(
    payer: &Pubkey,
    token_account: &Pubkey,
    wallet: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: ATA_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*token_account, false),
            AccountMeta::new_readonly(*wallet, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(spl_token::ID, false),
        ],
        data: vec![ATA_CREATE_IDEMPOTENT],
    }
}

#[cfg(test)]
mod tests {
    use solana_keypair::Keypair;
    use solana_signer::Signer;

    use super::*;
    use crate::derive::TOKEN_METADATA_PROGRAM_ID;

    fn parties() -> MintParties {
        let owner = Keypair::new().pubkey();
        MintParties {
            payer: owner,
            token_owner: owner,
        }
    }

    #[test]
    fn test_six_instructions_in_fixed_order() {
        let mint = Keypair::new().pubkey();
        let ixs = assemble(&mint, &parties(), 1_461_600, "Test #1", "https://x/m.json").unwrap();
        let programs: Vec<Pubkey> = ixs.iter().map(|ix| ix.program_id).collect();
        assert_eq!(
            programs,
            vec![
                SYSTEM_PROGRAM_ID,
                spl_token::ID,
                ATA_PROGRAM_ID,
                spl_token::ID,
                TOKEN_METADATA_PROGRAM_ID,
                TOKEN_METADATA_PROGRAM_ID,
            ]
        );
    }

    #[test]
    fn test_create_account_wire_layout() {
        let mint = Keypair::new().pubkey();
        let payer = Keypair::new().pubkey();
        let ix = create_mint_account(&payer, &mint, 42);

        assert_eq!(&ix.data[0..4], &0u32.to_le_bytes());
        assert_eq!(&ix.data[4..12], &42u64.to_le_bytes());
        assert_eq!(
            &ix.data[12..20],
            &(spl_token::state::Mint::LEN as u64).to_le_bytes()
        );
        assert_eq!(&ix.data[20..52], spl_token::ID.as_ref());

        // Both the funder and the new account sign.
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, mint);
        assert!(ix.accounts[1].is_signer && ix.accounts[1].is_writable);
    }

    #[test]
    fn test_token_account_creation_is_idempotent() {
        let mint = Keypair::new().pubkey();
        let p = parties();
        let ixs = assemble(&mint, &p, 1, "n", "u").unwrap();
        assert_eq!(ixs[2].data, vec![ATA_CREATE_IDEMPOTENT]);
        assert_eq!(
            ixs[2].accounts[1].pubkey,
            associated_token_address(&p.token_owner, &mint)
        );
    }

    #[test]
    fn test_mint_to_mints_exactly_one_unit() {
        let mint = Keypair::new().pubkey();
        let ixs = assemble(&mint, &parties(), 1, "n", "u").unwrap();
        // MintTo data: tag byte 7 then amount as u64 LE.
        assert_eq!(ixs[3].data[0], 7);
        assert_eq!(&ixs[3].data[1..9], &1u64.to_le_bytes());
    }
}
