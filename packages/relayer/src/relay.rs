//! Message relaying
//!
//! Picks the Teleporter send events out of a source transaction, fetches the
//! stored message, proves it and delivers it to the destination teleporter.
//! Delivery is idempotent on chain, so relaying the same message twice is
//! safe whether or not `skip_delivered` is set.

use cosmwasm_std::Binary;
use thiserror::Error;
use tracing::{debug, info, warn};

use common::{bytes32_to_hex, compute_message_hash, TeleporterMessage};
use teleporter::msg::{
    ExecuteMsg as TeleporterExecuteMsg, MessageReceivedResponse, QueryMsg as TeleporterQueryMsg,
    SentMessageResponse,
};

use crate::chain::{query, ChainClient, ChainError, PendingTx, Receipt, SignedTx, TxStatus};
use crate::config::RelayerConfig;
use crate::confirmation::{wait_with_config, ConfirmationError};
use crate::events::{DecodeError, TeleporterEvent};
use crate::retry::with_retry;

/// A chain and the teleporter deployed on it.
#[derive(Clone, Copy)]
pub struct ChainEndpoint<'a> {
    pub client: &'a dyn ChainClient,
    pub teleporter: &'a str,
}

impl<'a> ChainEndpoint<'a> {
    pub fn new(client: &'a dyn ChainClient, teleporter: &'a str) -> Self {
        Self { client, teleporter }
    }

    pub fn chain_id(&self) -> &str {
        self.client.chain_id()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryStatus {
    /// Broadcast; inclusion not awaited
    Submitted(PendingTx),
    /// Included and accepted by the destination teleporter
    Included(Receipt),
    /// Already delivered by someone; nothing submitted
    AlreadyDelivered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub source_chain_id: String,
    pub message_id: u64,
    pub status: DeliveryStatus,
}

impl Delivery {
    pub fn receipt(&self) -> Option<&Receipt> {
        match &self.status {
            DeliveryStatus::Included(receipt) => Some(receipt),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Transaction {tx_hash} sent no message from {source_chain_id} to {destination_chain_id}")]
    NoMessage {
        tx_hash: String,
        source_chain_id: String,
        destination_chain_id: String,
    },

    #[error("Source transaction {tx_hash} failed: {reason}")]
    SourceFailed { tx_hash: String, reason: String },

    #[error("Message {message_id} hash mismatch: event {event_hash}, computed {computed_hash}")]
    HashMismatch {
        message_id: u64,
        event_hash: String,
        computed_hash: String,
    },

    #[error("Relayer {relayer} is not allowed to deliver message {message_id}")]
    NotAllowed { message_id: u64, relayer: String },

    #[error("Delivery of message {message_id} failed: {reason}")]
    DeliveryFailed { message_id: u64, reason: String },

    #[error("Invalid event: {0}")]
    Decode(#[from] DecodeError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Confirmation error: {0}")]
    Confirmation(#[from] ConfirmationError),
}

/// A send event selected for delivery.
struct Outbound {
    message_id: u64,
    message_hash: [u8; 32],
}

pub struct Relayer {
    config: RelayerConfig,
}

impl Relayer {
    pub fn new(config: RelayerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RelayerConfig {
        &self.config
    }

    /// Relay the first message `send_receipt` sent from `source` to `destination`.
    ///
    /// With `wait_for_execution` the delivery is confirmed before returning
    /// and a reverted delivery is an error; otherwise the pending handle is
    /// returned as soon as the chain accepts the broadcast.
    pub async fn relay(
        &self,
        send_receipt: &Receipt,
        source: ChainEndpoint<'_>,
        destination: ChainEndpoint<'_>,
        wait_for_execution: bool,
    ) -> Result<Delivery, RelayError> {
        let outbound = self.outbound(send_receipt, source, destination)?;
        let first = outbound.into_iter().next().ok_or_else(|| RelayError::NoMessage {
            tx_hash: send_receipt.tx_hash.clone(),
            source_chain_id: source.chain_id().to_string(),
            destination_chain_id: destination.chain_id().to_string(),
        })?;
        self.deliver(&first, source, destination, wait_for_execution)
            .await
    }

    /// Relay every message `send_receipt` sent from `source` to `destination`, in order.
    pub async fn relay_all(
        &self,
        send_receipt: &Receipt,
        source: ChainEndpoint<'_>,
        destination: ChainEndpoint<'_>,
        wait_for_execution: bool,
    ) -> Result<Vec<Delivery>, RelayError> {
        let mut deliveries = vec![];
        for outbound in self.outbound(send_receipt, source, destination)? {
            deliveries.push(
                self.deliver(&outbound, source, destination, wait_for_execution)
                    .await?,
            );
        }
        Ok(deliveries)
    }

    fn outbound(
        &self,
        send_receipt: &Receipt,
        source: ChainEndpoint<'_>,
        destination: ChainEndpoint<'_>,
    ) -> Result<Vec<Outbound>, RelayError> {
        if let TxStatus::Failed { reason } = &send_receipt.status {
            return Err(RelayError::SourceFailed {
                tx_hash: send_receipt.tx_hash.clone(),
                reason: reason.clone(),
            });
        }

        let events = TeleporterEvent::decode_all(&send_receipt.events, source.teleporter)?;
        Ok(events
            .into_iter()
            .filter_map(|event| match event {
                TeleporterEvent::SendCrossChainMessage {
                    message_id,
                    destination_chain_id,
                    message_hash,
                    ..
                } if destination_chain_id == destination.chain_id() => Some(Outbound {
                    message_id,
                    message_hash,
                }),
                _ => None,
            })
            .collect())
    }

    async fn deliver(
        &self,
        outbound: &Outbound,
        source: ChainEndpoint<'_>,
        destination: ChainEndpoint<'_>,
        wait_for_execution: bool,
    ) -> Result<Delivery, RelayError> {
        let source_chain_id = source.chain_id().to_string();
        let message_id = outbound.message_id;

        let sent_query = TeleporterQueryMsg::SentMessage { message_id };
        let sent: SentMessageResponse = with_retry(&self.config.retry, |_| {
            query(source.client, source.teleporter, &sent_query)
        })
        .await?;
        let message = sent.message;
        let proof = self.prove(&source_chain_id, &message, &outbound.message_hash)?;

        if !message.allows_relayer(&self.config.relayer_address) {
            return Err(RelayError::NotAllowed {
                message_id,
                relayer: self.config.relayer_address.clone(),
            });
        }

        if self.config.skip_delivered
            && self
                .is_delivered(&source_chain_id, message_id, destination)
                .await?
        {
            info!(
                source_chain_id = %source_chain_id,
                message_id,
                "Message already delivered, skipping"
            );
            return Ok(Delivery {
                source_chain_id,
                message_id,
                status: DeliveryStatus::AlreadyDelivered,
            });
        }

        let tx = SignedTx::execute(
            &self.config.relayer_address,
            destination.teleporter,
            &TeleporterExecuteMsg::ReceiveCrossChainMessage {
                source_chain_id: source_chain_id.clone(),
                message,
                proof,
                relayer_reward_address: self.config.reward_address.clone(),
            },
        )?;
        let pending =
            with_retry(&self.config.retry, |_| destination.client.submit(tx.clone())).await?;
        debug!(
            source_chain_id = %source_chain_id,
            destination_chain_id = %destination.chain_id(),
            message_id,
            tx_hash = %pending.tx_hash,
            "Delivery submitted"
        );

        if !wait_for_execution {
            return Ok(Delivery {
                source_chain_id,
                message_id,
                status: DeliveryStatus::Submitted(pending),
            });
        }

        let receipt =
            wait_with_config(destination.client, &pending, &self.config.confirmation).await?;
        if let TxStatus::Failed { reason } = &receipt.status {
            warn!(message_id, reason = %reason, "Delivery reverted");
            return Err(RelayError::DeliveryFailed {
                message_id,
                reason: reason.clone(),
            });
        }

        for event in TeleporterEvent::decode_all(&receipt.events, destination.teleporter)? {
            match event {
                TeleporterEvent::MessageExecutionFailed { reason, .. } => {
                    warn!(message_id, reason = %reason, "Message delivered, execution failed")
                }
                TeleporterEvent::MessageExecuted { .. } => {
                    info!(message_id, tx_hash = %receipt.tx_hash, "Message delivered and executed")
                }
                _ => {}
            }
        }

        Ok(Delivery {
            source_chain_id,
            message_id,
            status: DeliveryStatus::Included(receipt),
        })
    }

    /// Recompute the commitment and check it against the send event.
    fn prove(
        &self,
        source_chain_id: &str,
        message: &TeleporterMessage,
        event_hash: &[u8; 32],
    ) -> Result<Binary, RelayError> {
        let computed = compute_message_hash(source_chain_id, message);
        if &computed != event_hash {
            return Err(RelayError::HashMismatch {
                message_id: message.message_id,
                event_hash: bytes32_to_hex(event_hash),
                computed_hash: bytes32_to_hex(&computed),
            });
        }
        Ok(Binary::from(computed.to_vec()))
    }

    async fn is_delivered(
        &self,
        source_chain_id: &str,
        message_id: u64,
        destination: ChainEndpoint<'_>,
    ) -> Result<bool, RelayError> {
        let received_query = TeleporterQueryMsg::MessageReceived {
            source_chain_id: source_chain_id.to_string(),
            message_id,
        };
        let res: MessageReceivedResponse = with_retry(&self.config.retry, |_| {
            query(destination.client, destination.teleporter, &received_query)
        })
        .await?;
        Ok(res.delivered)
    }
}
