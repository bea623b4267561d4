//! Confirmation polling
//!
//! Polls a chain client until a broadcast transaction is included or the
//! timeout passes. Deployment and relaying both wait through here.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::chain::{ChainClient, ChainError, PendingTx, Receipt};

/// Configuration for inclusion polling
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationConfig {
    /// How long to wait for inclusion before giving up
    pub timeout: Duration,
    /// Delay between receipt lookups
    pub poll_interval: Duration,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfirmationError {
    #[error("Transaction {tx_hash} not included after {waited:?}")]
    Timeout { tx_hash: String, waited: Duration },

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Wait until `pending` is included and return its receipt.
///
/// Transient lookup errors are logged and polled through; anything else ends
/// the wait. A receipt is returned whatever its status.
pub async fn wait_for_inclusion<C: ChainClient + ?Sized>(
    client: &C,
    pending: &PendingTx,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Receipt, ConfirmationError> {
    let started = Instant::now();

    loop {
        match client.receipt(pending).await {
            Ok(Some(receipt)) => {
                debug!(
                    chain_id = %pending.chain_id,
                    tx_hash = %pending.tx_hash,
                    height = receipt.height,
                    "Transaction included"
                );
                return Ok(receipt);
            }
            Ok(None) => {}
            Err(err) if err.is_transient() => {
                warn!(
                    chain_id = %pending.chain_id,
                    tx_hash = %pending.tx_hash,
                    error = %err,
                    "Receipt lookup failed, polling again"
                );
            }
            Err(err) => return Err(err.into()),
        }

        let waited = started.elapsed();
        if waited >= timeout {
            return Err(ConfirmationError::Timeout {
                tx_hash: pending.tx_hash.clone(),
                waited,
            });
        }
        tokio::time::sleep(poll_interval.min(timeout - waited)).await;
    }
}

/// [`wait_for_inclusion`] with the timing of `config`.
pub async fn wait_with_config<C: ChainClient + ?Sized>(
    client: &C,
    pending: &PendingTx,
    config: &ConfirmationConfig,
) -> Result<Receipt, ConfirmationError> {
    wait_for_inclusion(client, pending, config.timeout, config.poll_interval).await
}
