//! Common - Shared Types and Utilities for the Teleporter Contracts
//!
//! This package provides the wire types exchanged between teleporters and
//! their applications, the versioned bridge payload codec, the message
//! commitment hash and the event names the off-chain relayer decodes.

pub mod allowance;
pub mod events;
pub mod hash;
pub mod payload;
pub mod teleporter;

pub use allowance::spendable_allowance;
pub use hash::{bytes32_to_hex, compute_message_hash, keccak256};
pub use payload::{
    BridgeAction, BridgeTransfer, CreateBridgeToken, HopDestination, PayloadError,
    PAYLOAD_VERSION,
};
pub use teleporter::{
    TeleporterFeeInfo, TeleporterMessage, TeleporterMessageInput, TeleporterMessageReceipt,
    TeleporterReceiverMsg,
};
