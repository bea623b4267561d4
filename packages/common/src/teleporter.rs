//! Teleporter wire types
//!
//! These types cross chain boundaries: a `TeleporterMessage` is stored by the
//! source teleporter, emitted in its send event, and handed back verbatim by
//! the relayer to the destination teleporter.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, Uint128};

/// Fee attached to a message, escrowed by the source teleporter until a
/// receipt for the message comes back.
#[cw_serde]
pub struct TeleporterFeeInfo {
    /// CW20 token the fee is paid in (empty when no fee is paid)
    pub fee_token_address: String,
    /// Fee amount in the token's smallest unit
    pub amount: Uint128,
}

impl TeleporterFeeInfo {
    pub fn none() -> Self {
        Self {
            fee_token_address: String::new(),
            amount: Uint128::zero(),
        }
    }

    pub fn new(fee_token_address: impl Into<String>, amount: Uint128) -> Self {
        Self {
            fee_token_address: fee_token_address.into(),
            amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

/// Acknowledgement that a message was delivered, travelling back to the
/// chain that sent it.
#[cw_serde]
pub struct TeleporterMessageReceipt {
    pub received_message_id: u64,
    /// Address on the message's source chain that may redeem the fee
    pub relayer_reward_address: String,
}

/// Caller-supplied part of a message.
#[cw_serde]
pub struct TeleporterMessageInput {
    pub destination_chain_id: String,
    /// Application contract on the destination chain; empty for receipt carriers
    pub destination_address: String,
    pub fee_info: TeleporterFeeInfo,
    pub required_gas_limit: u64,
    /// Relayers allowed to deliver the message; empty means any relayer
    pub allowed_relayer_addresses: Vec<String>,
    pub message: Binary,
}

/// A message as stored by the source teleporter and delivered to the
/// destination teleporter.
#[cw_serde]
pub struct TeleporterMessage {
    /// Sequence number assigned by the source teleporter, starting at 1
    pub message_id: u64,
    pub origin_sender: String,
    pub destination_chain_id: String,
    pub destination_address: String,
    pub fee_info: TeleporterFeeInfo,
    pub required_gas_limit: u64,
    pub allowed_relayer_addresses: Vec<String>,
    /// Receipts for messages the source chain received from the destination chain
    pub receipts: Vec<TeleporterMessageReceipt>,
    pub message: Binary,
}

impl TeleporterMessage {
    /// An empty allowed-relayer set permits every relayer.
    pub fn allows_relayer(&self, relayer: &str) -> bool {
        self.allowed_relayer_addresses.is_empty()
            || self
                .allowed_relayer_addresses
                .iter()
                .any(|allowed| allowed == relayer)
    }
}

/// Execute interface every Teleporter application implements.
#[cw_serde]
pub enum TeleporterReceiverMsg {
    ReceiveTeleporterMessage {
        source_chain_id: String,
        origin_sender: String,
        message: Binary,
    },
}
