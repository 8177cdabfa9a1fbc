//! Owner-side completion of a partially signed mint envelope.
//!
//! The wallet decodes what the server built, adds the fee-payer
//! signature, submits, and polls until the ledger settles the
//! transaction or the freshness token expires.

use std::time::Duration;

use mintgate::MintError;
use mintgate::proto::MintResult;
use solana_signature::Signature;
use solana_signer::Signer;

use crate::envelope::Envelope;
use crate::rpc::{ChainRpc, TxStatus};

/// Where a completion is in its lifecycle.
///
/// `Confirmed` and `Failed` are terminal. A failed completion stays
/// failed; it never resumes polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionState {
    /// Decoded from the server, not yet signed by the owner.
    Built,
    /// Fully signed, not yet submitted.
    Signed,
    /// Accepted by the RPC node, awaiting settlement.
    Submitted(Signature),
    /// Settled on the ledger.
    Confirmed(Signature),
    /// Rejected, expired, or otherwise terminally unsuccessful.
    Failed(String),
}

/// Polling knobs for [`Completion::confirm`].
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Delay between consecutive status checks.
    pub poll_interval: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(400),
        }
    }
}

/// A mint envelope being driven to settlement by the owner wallet.
pub struct Completion<'a, R: ?Sized> {
    rpc: &'a R,
    envelope: Envelope,
    expiry_height: u64,
    config: CompletionConfig,
    state: CompletionState,
}

impl<R: ?Sized> std::fmt::Debug for Completion<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("state", &self.state)
            .field("expiry_height", &self.expiry_height)
            .finish_non_exhaustive()
    }
}

impl<'a, R: ChainRpc + ?Sized> Completion<'a, R> {
    /// Decodes the server's build result into a completion ready for
    /// the owner's signature.
    pub fn decode(rpc: &'a R, result: &MintResult) -> Result<Self, MintError> {
        let envelope = Envelope::decode_base64(&result.tx_encoded)?;
        Ok(Self {
            rpc,
            envelope,
            expiry_height: result.freshness_expiry,
            config: CompletionConfig::default(),
            state: CompletionState::Built,
        })
    }

    /// Overrides the default polling configuration.
    pub fn with_config(mut self, config: CompletionConfig) -> Self {
        self.config = config;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &CompletionState {
        &self.state
    }

    /// Read access to the underlying envelope.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Adds the owner wallet's fee-payer signature.
    ///
    /// The envelope must be fully signed afterwards; a wallet that
    /// is not a required signer leaves it incomplete and the
    /// completion fails.
    pub fn sign<S: Signer>(&mut self, wallet: &S) -> Result<(), MintError> {
        self.envelope.sign_with(wallet)?;
        if !self.envelope.is_fully_signed() {
            let reason = "envelope still missing signatures after wallet signed".to_string();
            self.state = CompletionState::Failed(reason.clone());
            return Err(MintError::Signing(reason));
        }
        self.state = CompletionState::Signed;
        Ok(())
    }

    /// Submits the fully signed envelope to the ledger.
    ///
    /// A network failure here leaves the state unchanged so the
    /// caller can retry; a ledger rejection is terminal.
    pub async fn submit(&mut self) -> Result<Signature, MintError> {
        if !self.envelope.is_fully_signed() {
            return Err(MintError::Signing(
                "cannot submit an envelope that is not fully signed".into(),
            ));
        }
        match self.rpc.submit(self.envelope.inner()).await {
            Ok(signature) => {
                self.state = CompletionState::Submitted(signature);
                Ok(signature)
            }
            Err(err @ MintError::Network(_)) => Err(err),
            Err(err) => {
                self.state = CompletionState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Polls the submitted transaction until it settles or the
    /// freshness token expires.
    ///
    /// Network errors propagate without changing state; the caller
    /// can call `confirm` again. A rejection or expiry is terminal.
    pub async fn confirm(&mut self) -> Result<Signature, MintError> {
        let signature = match self.state {
            CompletionState::Submitted(signature) => signature,
            CompletionState::Confirmed(signature) => return Ok(signature),
            CompletionState::Failed(ref reason) => {
                return Err(MintError::AuthorizationRejected(reason.clone()));
            }
            _ => {
                return Err(MintError::Signing(
                    "nothing submitted to confirm".into(),
                ));
            }
        };

        match await_confirmation(
            self.rpc,
            &signature,
            self.expiry_height,
            self.config.poll_interval,
        )
        .await
        {
            Ok(()) => {
                self.state = CompletionState::Confirmed(signature);
                Ok(signature)
            }
            Err(err @ MintError::Network(_)) => Err(err),
            Err(err) => {
                self.state = CompletionState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Signs, submits, and confirms in one call.
    pub async fn run<S: Signer>(&mut self, wallet: &S) -> Result<Signature, MintError> {
        self.sign(wallet)?;
        self.submit().await?;
        self.confirm().await
    }
}

/// Polls a signature until the ledger settles it.
///
/// Expiry of the freshness token is checked only while the status is
/// still pending; a transaction the ledger already settled is final
/// regardless of block height.
pub(crate) async fn await_confirmation<R: ChainRpc + ?Sized>(
    rpc: &R,
    signature: &Signature,
    expiry_height: u64,
    poll_interval: Duration,
) -> Result<(), MintError> {
    loop {
        match rpc.signature_status(signature).await? {
            TxStatus::Confirmed => return Ok(()),
            TxStatus::Failed(reason) => {
                return Err(MintError::AuthorizationRejected(reason));
            }
            TxStatus::Pending => {
                if rpc.block_height().await? > expiry_height {
                    return Err(MintError::AuthorizationRejected(
                        "freshness token expired before the transaction settled".into(),
                    ));
                }
            }
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use mintgate::proto::MintRequest;
    use solana_keypair::Keypair;

    use super::*;
    use crate::build::build_mint_transaction;
    use crate::rpc::testing::MockRpc;

    fn fast_config() -> CompletionConfig {
        CompletionConfig {
            poll_interval: Duration::ZERO,
        }
    }

    async fn built_result(rpc: &MockRpc, owner: &Keypair) -> MintResult {
        let request = MintRequest {
            name: "Completion Test".into(),
            metadata_uri: "ipfs://abc".into(),
            owner: owner.pubkey().to_string(),
        };
        build_mint_transaction(rpc, &request, mintgate::uri::DEFAULT_IPFS_GATEWAY)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sign_submit_confirm_happy_path() {
        let rpc = MockRpc::default();
        rpc.push_status(TxStatus::Pending);
        rpc.push_status(TxStatus::Confirmed);

        let owner = Keypair::new();
        let result = built_result(&rpc, &owner).await;

        let mut completion = Completion::decode(&rpc, &result)
            .unwrap()
            .with_config(fast_config());
        assert_eq!(*completion.state(), CompletionState::Built);

        completion.sign(&owner).unwrap();
        assert_eq!(*completion.state(), CompletionState::Signed);
        assert!(completion.envelope().is_fully_signed());

        let signature = completion.submit().await.unwrap();
        assert_eq!(*completion.state(), CompletionState::Submitted(signature));

        let confirmed = completion.confirm().await.unwrap();
        assert_eq!(confirmed, signature);
        assert_eq!(*completion.state(), CompletionState::Confirmed(signature));
    }

    #[tokio::test]
    async fn test_run_convenience_matches_step_by_step() {
        let rpc = MockRpc::default();
        rpc.push_status(TxStatus::Confirmed);

        let owner = Keypair::new();
        let result = built_result(&rpc, &owner).await;
        let mut completion = Completion::decode(&rpc, &result)
            .unwrap()
            .with_config(fast_config());
        let signature = completion.run(&owner).await.unwrap();
        assert_eq!(*completion.state(), CompletionState::Confirmed(signature));
    }

    #[tokio::test]
    async fn test_stranger_signature_fails_the_completion() {
        let rpc = MockRpc::default();
        let owner = Keypair::new();
        let result = built_result(&rpc, &owner).await;

        let mut completion = Completion::decode(&rpc, &result).unwrap();
        let stranger = Keypair::new();
        let err = completion.sign(&stranger).unwrap_err();
        assert!(matches!(err, MintError::Signing(_)));
        assert_eq!(*completion.state(), CompletionState::Built);
    }

    #[tokio::test]
    async fn test_expiry_is_terminal_and_sticky() {
        let rpc = MockRpc::default();
        // Pending forever, with the chain already past the envelope's
        // validity window.
        rpc.push_status(TxStatus::Pending);
        rpc.set_block_height(rpc.last_valid_block_height + 1);

        let owner = Keypair::new();
        let result = built_result(&rpc, &owner).await;
        let mut completion = Completion::decode(&rpc, &result)
            .unwrap()
            .with_config(fast_config());
        completion.sign(&owner).unwrap();
        completion.submit().await.unwrap();

        let err = completion.confirm().await.unwrap_err();
        assert!(matches!(err, MintError::AuthorizationRejected(_)));
        assert!(matches!(completion.state(), CompletionState::Failed(_)));

        // A failed completion never polls again.
        let polls_before = rpc.status_poll_count();
        let err = completion.confirm().await.unwrap_err();
        assert!(matches!(err, MintError::AuthorizationRejected(_)));
        assert_eq!(rpc.status_poll_count(), polls_before);
    }

    #[tokio::test]
    async fn test_ledger_rejection_surfaces_the_raw_reason() {
        let rpc = MockRpc::default();
        rpc.push_status(TxStatus::Failed("custom program error: 0x1".into()));

        let owner = Keypair::new();
        let result = built_result(&rpc, &owner).await;
        let mut completion = Completion::decode(&rpc, &result)
            .unwrap()
            .with_config(fast_config());
        completion.sign(&owner).unwrap();
        completion.submit().await.unwrap();

        let err = completion.confirm().await.unwrap_err();
        match err {
            MintError::AuthorizationRejected(reason) => {
                assert!(reason.contains("custom program error"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_submit_refuses_a_partially_signed_envelope() {
        let rpc = MockRpc::default();
        let owner = Keypair::new();
        let result = built_result(&rpc, &owner).await;
        let mut completion = Completion::decode(&rpc, &result).unwrap();

        let err = completion.submit().await.unwrap_err();
        assert!(matches!(err, MintError::Signing(_)));
        assert_eq!(rpc.submit_count(), 0);
    }
}
