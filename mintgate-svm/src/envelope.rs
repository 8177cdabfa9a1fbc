//! Transaction envelope: composition, positioned partial signing,
//! and the transfer encoding.
//!
//! An envelope is valid for transport the moment it is composed;
//! it is valid for submission only once every required signer slot is
//! filled. Signatures cover the serialized message bytes, so any
//! mutation after signing invalidates them.

use mintgate::{MintError, encoding};
use solana_instruction::Instruction;
use solana_message::compiled_instruction::CompiledInstruction;
use solana_message::v0::Message as MessageV0;
use solana_message::{Hash, VersionedMessage};
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::versioned::VersionedTransaction;

/// A versioned transaction with positioned signing helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    inner: VersionedTransaction,
}

impl Envelope {
    /// Compiles instructions into a v0 message stamped with the given
    /// freshness token and fee payer. No signature slots are filled.
    ///
    /// # Errors
    ///
    /// Returns [`MintError::Derivation`] if message compilation fails
    /// (duplicate or unresolvable account references).
    pub fn compose(
        fee_payer: &Pubkey,
        instructions: &[Instruction],
        recent_blockhash: Hash,
    ) -> Result<Self, MintError> {
        let message = MessageV0::try_compile(fee_payer, instructions, &[], recent_blockhash)
            .map_err(|e| MintError::Derivation(format!("message compilation failed: {e}")))?;
        Ok(Self {
            inner: VersionedTransaction {
                signatures: vec![],
                message: VersionedMessage::V0(message),
            },
        })
    }

    /// Wraps an already-deserialized transaction.
    #[must_use]
    pub const fn from_transaction(inner: VersionedTransaction) -> Self {
        Self { inner }
    }

    /// The wrapped transaction.
    #[must_use]
    pub const fn inner(&self) -> &VersionedTransaction {
        &self.inner
    }

    /// Unwraps into the raw transaction.
    #[must_use]
    pub fn into_inner(self) -> VersionedTransaction {
        self.inner
    }

    /// Signs the message and places the signature in the signer's
    /// slot, leaving every other slot untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MintError::Signing`] if the signer fails or is not
    /// among the message's required signers; an envelope must never
    /// pretend to carry a signature that was not applied.
    pub fn sign_with<S: Signer>(&mut self, signer: &S) -> Result<(), MintError> {
        let message_bytes = self.inner.message.serialize();
        let signature = signer
            .try_sign_message(&message_bytes)
            .map_err(|e| MintError::Signing(e.to_string()))?;

        let position = self
            .signer_position(&signer.pubkey())
            .ok_or_else(|| {
                MintError::Signing(format!("{} is not a required signer", signer.pubkey()))
            })?;

        let num_required = self.inner.message.header().num_required_signatures as usize;
        if self.inner.signatures.len() < num_required {
            self.inner
                .signatures
                .resize(num_required, Signature::default());
        }
        self.inner.signatures[position] = signature;
        Ok(())
    }

    /// Whether every required signer slot holds a real signature.
    #[must_use]
    pub fn is_fully_signed(&self) -> bool {
        let num_required = self.inner.message.header().num_required_signatures as usize;
        if self.inner.signatures.len() < num_required {
            return false;
        }
        let empty = Signature::default();
        !self.inner.signatures.iter().any(|signature| *signature == empty)
    }

    /// The designated fee payer (the first static account key).
    #[must_use]
    pub fn fee_payer(&self) -> Option<Pubkey> {
        self.inner.message.static_account_keys().first().copied()
    }

    /// The signature applied for `signer`, if its slot is filled.
    #[must_use]
    pub fn signature_for(&self, signer: &Pubkey) -> Option<Signature> {
        let position = self.signer_position(signer)?;
        let signature = self.inner.signatures.get(position).copied()?;
        (signature != Signature::default()).then_some(signature)
    }

    /// Verifies `signer`'s slot against the current message bytes.
    /// Fails for an empty slot or after any post-signing mutation.
    #[must_use]
    pub fn verify_signature(&self, signer: &Pubkey) -> bool {
        self.signature_for(signer).is_some_and(|signature| {
            signature.verify(signer.as_ref(), &self.inner.message.serialize())
        })
    }

    /// Number of instructions in the message.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.inner.message.instructions().len()
    }

    /// A resolved view of the instruction at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MintError::UnexpectedResponse`] if the index is out
    /// of bounds.
    pub fn instruction(&self, index: usize) -> Result<InstructionView, MintError> {
        let instruction = self
            .inner
            .message
            .instructions()
            .get(index)
            .cloned()
            .ok_or_else(|| {
                MintError::UnexpectedResponse(format!("no instruction at index {index}"))
            })?;
        Ok(InstructionView {
            instruction,
            account_keys: self.inner.message.static_account_keys().to_vec(),
        })
    }

    /// Encodes the envelope for transport.
    ///
    /// # Errors
    ///
    /// Returns [`MintError::UnexpectedResponse`] if serialization
    /// fails.
    pub fn encode_base64(&self) -> Result<String, MintError> {
        let bytes = bincode::serialize(&self.inner)
            .map_err(|e| MintError::UnexpectedResponse(format!("envelope serialization: {e}")))?;
        Ok(encoding::encode(&bytes))
    }

    /// Decodes a transport string back into an envelope,
    /// byte-identically, signatures included.
    ///
    /// # Errors
    ///
    /// Returns [`MintError::UnexpectedResponse`] if the text is not
    /// base64 or the bytes are not a serialized transaction.
    pub fn decode_base64(text: &str) -> Result<Self, MintError> {
        let bytes = encoding::decode(text)
            .map_err(|e| MintError::UnexpectedResponse(format!("envelope is not base64: {e}")))?;
        let inner = bincode::deserialize::<VersionedTransaction>(&bytes)
            .map_err(|e| MintError::UnexpectedResponse(format!("envelope decoding: {e}")))?;
        Ok(Self { inner })
    }

    fn signer_position(&self, signer: &Pubkey) -> Option<usize> {
        let num_required = self.inner.message.header().num_required_signatures as usize;
        self.inner
            .message
            .static_account_keys()
            .get(..num_required)?
            .iter()
            .position(|key| key == signer)
    }
}

/// An instruction with its account indexes resolved to public keys.
#[derive(Debug)]
pub struct InstructionView {
    instruction: CompiledInstruction,
    account_keys: Vec<Pubkey>,
}

impl InstructionView {
    /// The program this instruction targets.
    #[must_use]
    pub fn program_id(&self) -> Pubkey {
        *self.instruction.program_id(&self.account_keys)
    }

    /// The resolved account key at the instruction-local index.
    ///
    /// # Errors
    ///
    /// Returns [`MintError::UnexpectedResponse`] if the index is out
    /// of bounds.
    pub fn account(&self, index: u8) -> Result<Pubkey, MintError> {
        let account_index = self
            .instruction
            .accounts
            .get(index as usize)
            .copied()
            .ok_or_else(|| {
                MintError::UnexpectedResponse(format!("no account at index {index}"))
            })?;
        self.account_keys
            .get(account_index as usize)
            .copied()
            .ok_or_else(|| MintError::UnexpectedResponse(format!("no account at index {index}")))
    }

    /// The opaque instruction payload.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.instruction.data
    }
}
