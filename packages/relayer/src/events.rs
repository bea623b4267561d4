//! Typed decoding of Teleporter events
//!
//! The event type selects the variant; attributes are parsed into fields.
//! Chains report contract events with a `wasm-` prefix, which is accepted with
//! or without.

use base64::Engine;
use cosmwasm_std::{Binary, Uint128};
use thiserror::Error;

use common::events::*;

use crate::chain::TxEvent;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown event type: {ty}")]
    UnknownEvent { ty: String },

    #[error("Event {ty} is missing attribute {key}")]
    MissingAttribute { ty: String, key: String },

    #[error("Event {ty} has invalid {key}: {value}")]
    InvalidAttribute {
        ty: String,
        key: String,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TeleporterEvent {
    SendCrossChainMessage {
        source_chain_id: String,
        message_id: u64,
        origin_sender: String,
        destination_chain_id: String,
        destination_address: String,
        fee_token_address: String,
        fee_amount: Uint128,
        required_gas_limit: u64,
        allowed_relayer_addresses: Vec<String>,
        receipt_count: u32,
        message: Binary,
        message_hash: [u8; 32],
    },
    ReceiveCrossChainMessage {
        source_chain_id: String,
        message_id: u64,
        origin_sender: String,
        reward_redeemer: String,
        deliverer: String,
    },
    MessageExecuted {
        source_chain_id: String,
        message_id: u64,
    },
    MessageExecutionFailed {
        source_chain_id: String,
        message_id: u64,
        reason: String,
    },
    ReceiptReceived {
        destination_chain_id: String,
        message_id: u64,
        relayer_reward_address: String,
        fee_token_address: String,
        amount: Uint128,
    },
    AddFeeAmount {
        message_id: u64,
        fee_token_address: String,
        fee_amount: Uint128,
    },
    RelayerRewardsRedeemed {
        redeemer: String,
        fee_asset: String,
        amount: Uint128,
    },
}

impl TeleporterEvent {
    pub fn decode(event: &TxEvent) -> Result<Self, DecodeError> {
        let ty = event
            .ty
            .strip_prefix(WASM_EVENT_PREFIX)
            .unwrap_or(event.ty.as_str());
        let fields = Fields { ty, event };

        let decoded = match ty {
            SEND_CROSS_CHAIN_MESSAGE => TeleporterEvent::SendCrossChainMessage {
                source_chain_id: fields.string(ATTR_SOURCE_CHAIN_ID)?,
                message_id: fields.parse(ATTR_MESSAGE_ID)?,
                origin_sender: fields.string(ATTR_ORIGIN_SENDER)?,
                destination_chain_id: fields.string(ATTR_DESTINATION_CHAIN_ID)?,
                destination_address: fields.optional(ATTR_DESTINATION_ADDRESS),
                fee_token_address: fields.optional(ATTR_FEE_TOKEN),
                fee_amount: fields.parse(ATTR_FEE_AMOUNT)?,
                required_gas_limit: fields.parse(ATTR_REQUIRED_GAS_LIMIT)?,
                allowed_relayer_addresses: fields.list(ATTR_ALLOWED_RELAYERS)?,
                receipt_count: fields.parse(ATTR_RECEIPT_COUNT)?,
                message: fields.base64(ATTR_MESSAGE)?,
                message_hash: fields.hash(ATTR_MESSAGE_HASH)?,
            },
            RECEIVE_CROSS_CHAIN_MESSAGE => TeleporterEvent::ReceiveCrossChainMessage {
                source_chain_id: fields.string(ATTR_SOURCE_CHAIN_ID)?,
                message_id: fields.parse(ATTR_MESSAGE_ID)?,
                origin_sender: fields.string(ATTR_ORIGIN_SENDER)?,
                reward_redeemer: fields.string(ATTR_REWARD_REDEEMER)?,
                deliverer: fields.string(ATTR_DELIVERER)?,
            },
            MESSAGE_EXECUTED => TeleporterEvent::MessageExecuted {
                source_chain_id: fields.string(ATTR_SOURCE_CHAIN_ID)?,
                message_id: fields.parse(ATTR_MESSAGE_ID)?,
            },
            MESSAGE_EXECUTION_FAILED => TeleporterEvent::MessageExecutionFailed {
                source_chain_id: fields.string(ATTR_SOURCE_CHAIN_ID)?,
                message_id: fields.parse(ATTR_MESSAGE_ID)?,
                reason: fields.string(ATTR_REASON)?,
            },
            RECEIPT_RECEIVED => TeleporterEvent::ReceiptReceived {
                destination_chain_id: fields.string(ATTR_DESTINATION_CHAIN_ID)?,
                message_id: fields.parse(ATTR_MESSAGE_ID)?,
                relayer_reward_address: fields.string(ATTR_RELAYER_REWARD_ADDRESS)?,
                fee_token_address: fields.optional(ATTR_FEE_TOKEN),
                amount: fields.parse(ATTR_AMOUNT)?,
            },
            ADD_FEE_AMOUNT => TeleporterEvent::AddFeeAmount {
                message_id: fields.parse(ATTR_MESSAGE_ID)?,
                fee_token_address: fields.string(ATTR_FEE_TOKEN)?,
                fee_amount: fields.parse(ATTR_FEE_AMOUNT)?,
            },
            RELAYER_REWARDS_REDEEMED => TeleporterEvent::RelayerRewardsRedeemed {
                redeemer: fields.string(ATTR_REDEEMER)?,
                fee_asset: fields.string(ATTR_FEE_ASSET)?,
                amount: fields.parse(ATTR_AMOUNT)?,
            },
            _ => {
                return Err(DecodeError::UnknownEvent {
                    ty: event.ty.clone(),
                })
            }
        };
        Ok(decoded)
    }

    /// Decode every Teleporter event emitted by `contract`, in order.
    ///
    /// Events of other contracts and of unknown types are skipped; a known
    /// event that fails to decode is an error.
    pub fn decode_all(events: &[TxEvent], contract: &str) -> Result<Vec<Self>, DecodeError> {
        let mut decoded = vec![];
        for event in events {
            if event.contract_address() != Some(contract) {
                continue;
            }
            match Self::decode(event) {
                Ok(e) => decoded.push(e),
                Err(DecodeError::UnknownEvent { .. }) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(decoded)
    }
}

struct Fields<'a> {
    ty: &'a str,
    event: &'a TxEvent,
}

impl Fields<'_> {
    fn raw(&self, key: &str) -> Result<&str, DecodeError> {
        self.event
            .attribute(key)
            .ok_or_else(|| DecodeError::MissingAttribute {
                ty: self.ty.to_string(),
                key: key.to_string(),
            })
    }

    fn invalid(&self, key: &str, value: &str) -> DecodeError {
        DecodeError::InvalidAttribute {
            ty: self.ty.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn string(&self, key: &str) -> Result<String, DecodeError> {
        self.raw(key).map(str::to_string)
    }

    /// Attributes omitted when empty.
    fn optional(&self, key: &str) -> String {
        self.event.attribute(key).unwrap_or_default().to_string()
    }

    fn parse<T: std::str::FromStr>(&self, key: &str) -> Result<T, DecodeError> {
        let value = self.raw(key)?;
        value.parse().map_err(|_| self.invalid(key, value))
    }

    fn list(&self, key: &str) -> Result<Vec<String>, DecodeError> {
        let value = self.optional(key);
        Ok(value
            .split(LIST_SEPARATOR)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn base64(&self, key: &str) -> Result<Binary, DecodeError> {
        let value = self.optional(key);
        base64::engine::general_purpose::STANDARD
            .decode(&value)
            .map(Binary::from)
            .map_err(|_| self.invalid(key, &value))
    }

    fn hash(&self, key: &str) -> Result<[u8; 32], DecodeError> {
        let value = self.raw(key)?;
        hex::decode(value.trim_start_matches("0x"))
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| self.invalid(key, value))
    }
}
