//! State definitions for the Teleporter contract
//!
//! Sent-side state (message log, fee escrow, reward ledger) and
//! received-side state (delivery records, execution outcomes, outstanding
//! receipts) live side by side: every teleporter is both.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, HexBinary, Uint128};
use cw_storage_plus::{Item, Map};

use common::TeleporterMessage;

// ============================================================================
// Constants
// ============================================================================

pub const CONTRACT_NAME: &str = "crates.io:teleporter";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum receipts attached to one outbound message
pub const MAX_RECEIPTS_BATCH_SIZE: usize = 5;

/// Reply id of the application sub-message
pub const EXECUTE_MESSAGE_REPLY_ID: u64 = 1;

// ============================================================================
// Core Configuration
// ============================================================================

#[cw_serde]
pub struct Config {
    /// Chain ID of the hosting chain, captured at instantiation
    pub blockchain_id: String,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Last assigned message ID (0 before the first send)
pub const LATEST_MESSAGE_ID: Item<u64> = Item::new("latest_message_id");

// ============================================================================
// Sent Messages
// ============================================================================

/// Message as sent; never modified afterwards.
#[cw_serde]
pub struct SentMessage {
    pub message: TeleporterMessage,
    pub message_hash: HexBinary,
}

/// Fee held in escrow for a sent message until its receipt arrives.
#[cw_serde]
pub struct EscrowedFee {
    pub fee_token: Addr,
    pub amount: Uint128,
}

/// Per fee-asset accounting totals.
///
/// `escrowed == credited + pending` and `credited == redeemed + ledger balance`.
#[cw_serde]
#[derive(Default)]
pub struct FeeTotals {
    pub escrowed: Uint128,
    pub credited: Uint128,
    pub redeemed: Uint128,
}

/// Message ID -> sent message
pub const SENT_MESSAGES: Map<u64, SentMessage> = Map::new("sent_messages");

/// Message ID -> escrowed fee (removed once credited)
pub const PENDING_FEES: Map<u64, EscrowedFee> = Map::new("pending_fees");

/// Message ID -> reward address from the receipt that settled it
pub const RECEIPTS_RECEIVED: Map<u64, String> = Map::new("receipts_received");

/// (Redeemer, fee asset) -> redeemable amount
pub const RELAYER_REWARDS: Map<(&Addr, &Addr), Uint128> = Map::new("relayer_rewards");

/// Fee asset -> totals
pub const FEE_TOTALS: Map<&Addr, FeeTotals> = Map::new("fee_totals");

// ============================================================================
// Received Messages
// ============================================================================

/// Delivery of one inbound message.
#[cw_serde]
pub struct DeliveryRecord {
    /// Address on the source chain that earns the message's fee
    pub relayer_reward_address: String,
    /// Relayer that submitted the delivery
    pub delivered_by: Addr,
    pub delivered_at_height: u64,
}

#[cw_serde]
pub enum ExecutionOutcome {
    Executed,
    ExecutionFailed { reason: String },
}

/// Inbound message awaiting the reply of its application sub-message.
#[cw_serde]
pub struct PendingExecution {
    pub source_chain_id: String,
    pub message_id: u64,
}

/// (Source chain, message ID) -> delivery
pub const RECEIVED_MESSAGES: Map<(&str, u64), DeliveryRecord> = Map::new("received_messages");

/// (Source chain, message ID) -> application outcome
pub const EXECUTION_OUTCOMES: Map<(&str, u64), ExecutionOutcome> =
    Map::new("execution_outcomes");

/// (Source chain, message ID) -> reward address, queued until sent back
pub const OUTSTANDING_RECEIPTS: Map<(&str, u64), String> = Map::new("outstanding_receipts");

/// Inbound messages awaiting their reply, innermost delivery last
pub const PENDING_EXECUTIONS: Item<Vec<PendingExecution>> = Item::new("pending_executions");
