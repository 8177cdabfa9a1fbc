//! Network client seam.
//!
//! Everything the minting flows need from the ledger goes through
//! [`ChainRpc`]: the rent-exemption minimum, the freshness token,
//! submission, and confirmation polling. The trait keeps the flows
//! testable without a validator and lets tests assert that invalid
//! requests never reach the network.

use async_trait::async_trait;
use mintgate::MintError;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_message::Hash;
use solana_signature::Signature;
use solana_transaction::versioned::VersionedTransaction;

/// Outcome of a single confirmation poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    /// The network has not yet recorded the transaction at the
    /// requested commitment level.
    Pending,
    /// Recorded at `confirmed` commitment.
    Confirmed,
    /// Terminally rejected; carries the network's raw reason text.
    Failed(String),
}

/// The ledger operations consumed by the minting flows.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Minimum lamport balance keeping an account of `data_len` bytes
    /// rent-exempt. Fetched per call; the value moves with network
    /// parameters and must not be cached.
    async fn rent_exempt_minimum(&self, data_len: usize) -> Result<u64, MintError>;

    /// Current freshness token: a recent blockhash and the last block
    /// height at which a transaction stamped with it is accepted.
    async fn latest_blockhash(&self) -> Result<(Hash, u64), MintError>;

    /// Sends a fully signed transaction to the network. Returns the
    /// transaction signature immediately; acceptance into the pending
    /// pool, not success.
    async fn submit(&self, transaction: &VersionedTransaction) -> Result<Signature, MintError>;

    /// One confirmation poll at `confirmed` commitment.
    async fn signature_status(&self, signature: &Signature) -> Result<TxStatus, MintError>;

    /// Current block height, compared against the freshness expiry.
    async fn block_height(&self) -> Result<u64, MintError>;
}

fn network_error(err: ClientError) -> MintError {
    MintError::network(err.to_string())
}

#[async_trait]
impl ChainRpc for RpcClient {
    async fn rent_exempt_minimum(&self, data_len: usize) -> Result<u64, MintError> {
        self.get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(network_error)
    }

    async fn latest_blockhash(&self) -> Result<(Hash, u64), MintError> {
        self.get_latest_blockhash_with_commitment(CommitmentConfig::confirmed())
            .await
            .map_err(network_error)
    }

    async fn submit(&self, transaction: &VersionedTransaction) -> Result<Signature, MintError> {
        self.send_transaction(transaction).await.map_err(|err| {
            // Preflight rejections carry the execution error; transport
            // failures do not.
            match err.get_transaction_error() {
                Some(tx_err) => MintError::AuthorizationRejected(tx_err.to_string()),
                None => network_error(err),
            }
        })
    }

    async fn signature_status(&self, signature: &Signature) -> Result<TxStatus, MintError> {
        let status = self
            .get_signature_status_with_commitment(signature, CommitmentConfig::confirmed())
            .await
            .map_err(network_error)?;
        Ok(match status {
            None => TxStatus::Pending,
            Some(Ok(())) => TxStatus::Confirmed,
            Some(Err(tx_err)) => TxStatus::Failed(tx_err.to_string()),
        })
    }

    async fn block_height(&self) -> Result<u64, MintError> {
        self.get_block_height().await.map_err(network_error)
    }
}
