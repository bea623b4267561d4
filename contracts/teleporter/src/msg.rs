//! Message types for the Teleporter contract

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, HexBinary, Uint128};

use common::{TeleporterFeeInfo, TeleporterMessage, TeleporterMessageInput};

use crate::state::{DeliveryRecord, ExecutionOutcome};

/// The chain ID is taken from the block environment.
#[cw_serde]
pub struct InstantiateMsg {}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Sending
    // ========================================================================
    /// Send a message; the fee is pulled from the caller with `TransferFrom`.
    SendCrossChainMessage(TeleporterMessageInput),

    /// Add to the escrowed fee of a message whose receipt has not arrived.
    AddFeeAmount {
        message_id: u64,
        fee_token_address: String,
        additional_fee_amount: Uint128,
    },

    /// Send an empty message to `source_chain_id` carrying the receipts of the
    /// listed messages delivered from it.
    SendSpecifiedReceipts {
        source_chain_id: String,
        message_ids: Vec<u64>,
        fee_info: TeleporterFeeInfo,
        allowed_relayer_addresses: Vec<String>,
    },

    // ========================================================================
    // Receiving
    // ========================================================================
    /// Deliver a message sent on `source_chain_id`. `proof` is the message
    /// hash from the send event.
    ReceiveCrossChainMessage {
        source_chain_id: String,
        message: TeleporterMessage,
        proof: Binary,
        /// Address on the source chain credited with the fee; defaults to the caller
        relayer_reward_address: Option<String>,
    },

    // ========================================================================
    // Rewards
    // ========================================================================
    RedeemRelayerRewards { fee_asset: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(BlockchainIdResponse)]
    BlockchainId {},

    #[returns(LatestMessageIdResponse)]
    LatestMessageId {},

    #[returns(SentMessageResponse)]
    SentMessage { message_id: u64 },

    #[returns(MessageHashResponse)]
    MessageHash { message_id: u64 },

    /// Fee still escrowed for a sent message
    #[returns(MessageFeeInfoResponse)]
    MessageFeeInfo { message_id: u64 },

    #[returns(MessageReceivedResponse)]
    MessageReceived {
        source_chain_id: String,
        message_id: u64,
    },

    #[returns(DeliveryRecordResponse)]
    DeliveryRecord {
        source_chain_id: String,
        message_id: u64,
    },

    #[returns(RelayerRewardAmountResponse)]
    RelayerRewardAmount { relayer: String, fee_asset: String },

    #[returns(RelayerRewardsResponse)]
    RelayerRewards { relayer: String },

    #[returns(OutstandingReceiptsResponse)]
    OutstandingReceipts {
        destination_chain_id: String,
        limit: Option<u32>,
    },

    #[returns(FeeTotalsResponse)]
    FeeTotals { fee_asset: String },
}

// ============================================================================
// Execute Responses (set as response data)
// ============================================================================

#[cw_serde]
pub struct SendCrossChainMessageResponse {
    pub message_id: u64,
}

#[cw_serde]
pub struct ReceiveCrossChainMessageResponse {
    /// Always true once the call succeeds
    pub delivered: bool,
    /// False when the message had been delivered before
    pub newly_delivered: bool,
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct BlockchainIdResponse {
    pub blockchain_id: String,
}

#[cw_serde]
pub struct LatestMessageIdResponse {
    pub message_id: u64,
}

#[cw_serde]
pub struct SentMessageResponse {
    pub message: TeleporterMessage,
    pub message_hash: HexBinary,
}

#[cw_serde]
pub struct MessageHashResponse {
    pub message_hash: HexBinary,
}

#[cw_serde]
pub struct MessageFeeInfoResponse {
    /// Zero amount once the fee has been credited or when none was paid
    pub fee_info: TeleporterFeeInfo,
    /// Reward address of the receipt that settled the message, if any
    pub receipt_relayer_reward_address: Option<String>,
}

#[cw_serde]
pub struct MessageReceivedResponse {
    pub delivered: bool,
}

#[cw_serde]
pub struct DeliveryRecordResponse {
    pub record: Option<DeliveryRecord>,
    pub outcome: Option<ExecutionOutcome>,
}

#[cw_serde]
pub struct RelayerRewardAmountResponse {
    pub amount: Uint128,
}

#[cw_serde]
pub struct RelayerReward {
    pub fee_asset: Addr,
    pub amount: Uint128,
}

#[cw_serde]
pub struct RelayerRewardsResponse {
    pub rewards: Vec<RelayerReward>,
}

#[cw_serde]
pub struct OutstandingReceipt {
    pub received_message_id: u64,
    pub relayer_reward_address: String,
}

#[cw_serde]
pub struct OutstandingReceiptsResponse {
    pub receipts: Vec<OutstandingReceipt>,
}

#[cw_serde]
pub struct FeeTotalsResponse {
    pub escrowed: Uint128,
    pub credited: Uint128,
    pub redeemed: Uint128,
}
