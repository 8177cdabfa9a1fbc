//! Metadata and master-edition instruction builders.
//!
//! These two instructions come from the `mpl-token-metadata` builders,
//! which are generated against a different SDK line (`solana-program`
//! v2) than the rest of the transaction (`solana-instruction` v3).
//! The types are structurally identical but nominally distinct, so
//! [`bridge_instruction`] translates the toolkit's shape into the
//! shared one field-for-field. Signer/writable flags must survive the
//! translation exactly; a dropped flag surfaces later as a
//! network-level authorization rejection.

use mpl_token_metadata::accounts::{MasterEdition, Metadata};
use mpl_token_metadata::instructions::{
    CreateMasterEditionV3Builder, CreateMetadataAccountV3Builder,
};
use mpl_token_metadata::types::DataV2;
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

/// Fixed on-chain symbol for every asset minted through this service.
pub const ASSET_SYMBOL: &str = "MGATE";

/// Fixed royalty, in basis points.
pub const ROYALTY_BASIS_POINTS: u16 = 500;

type ToolkitInstruction = solana_program::instruction::Instruction;
type ToolkitPubkey = solana_program::pubkey::Pubkey;

fn to_toolkit_key(key: &Pubkey) -> ToolkitPubkey {
    ToolkitPubkey::new_from_array(key.to_bytes())
}

fn from_toolkit_key(key: &ToolkitPubkey) -> Pubkey {
    Pubkey::new_from_array(key.to_bytes())
}

/// Translates a toolkit instruction into the shared instruction
/// shape: program id and account pubkeys by value, signer/writable
/// flags and payload verbatim.
#[must_use]
pub fn bridge_instruction(instruction: ToolkitInstruction) -> Instruction {
    Instruction {
        program_id: from_toolkit_key(&instruction.program_id),
        accounts: instruction
            .accounts
            .iter()
            .map(|meta| AccountMeta {
                pubkey: from_toolkit_key(&meta.pubkey),
                is_signer: meta.is_signer,
                is_writable: meta.is_writable,
            })
            .collect(),
        data: instruction.data,
    }
}

/// Builds the create-metadata instruction: name, fixed symbol, URI,
/// fixed royalty, no creators, no collection, no uses, mutable.
///
/// `authority` pays for the account and becomes both mint and update
/// authority; it must co-sign the transaction.
#[must_use]
pub fn create_metadata_instruction(
    mint: &Pubkey,
    authority: &Pubkey,
    name: &str,
    uri: &str,
) -> Instruction {
    let toolkit_mint = to_toolkit_key(mint);
    let toolkit_authority = to_toolkit_key(authority);
    let (metadata_pda, _) = Metadata::find_pda(&toolkit_mint);

    let instruction = CreateMetadataAccountV3Builder::new()
        .metadata(metadata_pda)
        .mint(toolkit_mint)
        .mint_authority(toolkit_authority)
        .payer(toolkit_authority)
        .update_authority(toolkit_authority, true)
        .data(DataV2 {
            name: name.to_owned(),
            symbol: ASSET_SYMBOL.to_owned(),
            uri: uri.to_owned(),
            seller_fee_basis_points: ROYALTY_BASIS_POINTS,
            creators: None,
            collection: None,
            uses: None,
        })
        .is_mutable(true)
        .instruction();

    bridge_instruction(instruction)
}

/// Builds the create-master-edition instruction with max supply 0:
/// no further editions may ever be printed.
#[must_use]
pub fn create_master_edition_instruction(mint: &Pubkey, authority: &Pubkey) -> Instruction {
    let toolkit_mint = to_toolkit_key(mint);
    let toolkit_authority = to_toolkit_key(authority);
    let (metadata_pda, _) = Metadata::find_pda(&toolkit_mint);
    let (edition_pda, _) = MasterEdition::find_pda(&toolkit_mint);

    let instruction = CreateMasterEditionV3Builder::new()
        .edition(edition_pda)
        .mint(toolkit_mint)
        .update_authority(toolkit_authority)
        .mint_authority(toolkit_authority)
        .payer(toolkit_authority)
        .metadata(metadata_pda)
        .max_supply(0)
        .instruction();

    bridge_instruction(instruction)
}

/// Metadata PDA as the toolkit derives it. Used to cross-check the
/// local derivation.
#[must_use]
pub fn toolkit_metadata_pda(mint: &Pubkey) -> Pubkey {
    let (pda, _) = Metadata::find_pda(&to_toolkit_key(mint));
    from_toolkit_key(&pda)
}

/// Master edition PDA as the toolkit derives it.
#[must_use]
pub fn toolkit_edition_pda(mint: &Pubkey) -> Pubkey {
    let (pda, _) = MasterEdition::find_pda(&to_toolkit_key(mint));
    from_toolkit_key(&pda)
}

#[cfg(test)]
mod tests {
    use solana_keypair::Keypair;
    use solana_signer::Signer;

    use super::*;
    use crate::derive::TOKEN_METADATA_PROGRAM_ID;

    fn raw_metadata_instruction(mint: &Pubkey, authority: &Pubkey) -> ToolkitInstruction {
        let toolkit_mint = to_toolkit_key(mint);
        let toolkit_authority = to_toolkit_key(authority);
        let (metadata_pda, _) = Metadata::find_pda(&toolkit_mint);
        CreateMetadataAccountV3Builder::new()
            .metadata(metadata_pda)
            .mint(toolkit_mint)
            .mint_authority(toolkit_authority)
            .payer(toolkit_authority)
            .update_authority(toolkit_authority, true)
            .data(DataV2 {
                name: "Flag Test".to_owned(),
                symbol: ASSET_SYMBOL.to_owned(),
                uri: "https://example.com/meta.json".to_owned(),
                seller_fee_basis_points: ROYALTY_BASIS_POINTS,
                creators: None,
                collection: None,
                uses: None,
            })
            .is_mutable(true)
            .instruction()
    }

    #[test]
    fn test_bridge_preserves_every_account_flag() {
        let mint = Keypair::new().pubkey();
        let authority = Keypair::new().pubkey();
        let toolkit = raw_metadata_instruction(&mint, &authority);
        let bridged = bridge_instruction(toolkit.clone());

        assert_eq!(bridged.accounts.len(), toolkit.accounts.len());
        for (ours, theirs) in bridged.accounts.iter().zip(&toolkit.accounts) {
            assert_eq!(ours.pubkey.to_bytes(), theirs.pubkey.to_bytes());
            assert_eq!(ours.is_signer, theirs.is_signer);
            assert_eq!(ours.is_writable, theirs.is_writable);
        }
        assert_eq!(bridged.program_id.to_bytes(), toolkit.program_id.to_bytes());
        assert_eq!(bridged.data, toolkit.data);
    }

    #[test]
    fn test_metadata_instruction_targets_metadata_program() {
        let mint = Keypair::new().pubkey();
        let authority = Keypair::new().pubkey();
        let ix = create_metadata_instruction(&mint, &authority, "Test #1", "https://x/m.json");
        assert_eq!(ix.program_id, TOKEN_METADATA_PROGRAM_ID);
        // Mint authority and payer must be flagged as signers for the
        // owner's co-signature to authorize metadata creation.
        let signer_count = ix.accounts.iter().filter(|m| m.is_signer).count();
        assert!(signer_count >= 2, "expected mint authority and payer signers");
    }

    #[test]
    fn test_master_edition_instruction_targets_metadata_program() {
        let mint = Keypair::new().pubkey();
        let authority = Keypair::new().pubkey();
        let ix = create_master_edition_instruction(&mint, &authority);
        assert_eq!(ix.program_id, TOKEN_METADATA_PROGRAM_ID);
        assert!(!ix.data.is_empty());
    }
}
