//! Teleporter - Cross-Chain Messaging for CosmWasm Chains
//!
//! The teleporter is the message router every cross-chain application on a
//! chain talks to.
//!
//! # Sending
//! 1. An application calls `SendCrossChainMessage` with an optional CW20 fee
//! 2. The fee is pulled into escrow and the message gets the next message ID
//! 3. A send event carries the full message and its hash for relayers
//!
//! # Receiving
//! 1. A relayer calls `ReceiveCrossChainMessage` with the message and its hash
//! 2. The message is marked delivered (a repeat delivery is a no-op) and a
//!    receipt naming the relayer's reward address is queued for the source
//! 3. The destination application runs in an isolated sub-message; its
//!    failure is recorded but never reverts the delivery
//!
//! # Relayer Rewards
//! Receipts travel back on the next message to the source chain. There each
//! receipt moves the escrowed fee into the reward ledger of the relayer, which
//! it can redeem with `RedeemRelayerRewards`.

pub mod contract;
pub mod error;
mod execute;
pub mod msg;
mod query;
pub mod state;

pub use crate::error::ContractError;
pub use common::{
    TeleporterFeeInfo, TeleporterMessage, TeleporterMessageInput, TeleporterMessageReceipt,
    TeleporterReceiverMsg,
};
