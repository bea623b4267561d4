//! Query handlers for the Teleporter contract.

use cosmwasm_std::{Deps, Order, StdError, StdResult, Uint128};

use common::TeleporterFeeInfo;

use crate::msg::{
    BlockchainIdResponse, DeliveryRecordResponse, FeeTotalsResponse, LatestMessageIdResponse,
    MessageFeeInfoResponse, MessageHashResponse, MessageReceivedResponse, OutstandingReceipt,
    OutstandingReceiptsResponse, RelayerReward, RelayerRewardAmountResponse,
    RelayerRewardsResponse, SentMessageResponse,
};
use crate::state::{
    SentMessage, CONFIG, EXECUTION_OUTCOMES, FEE_TOTALS, LATEST_MESSAGE_ID,
    MAX_RECEIPTS_BATCH_SIZE, OUTSTANDING_RECEIPTS, PENDING_FEES, RECEIPTS_RECEIVED,
    RECEIVED_MESSAGES, RELAYER_REWARDS, SENT_MESSAGES,
};

const MAX_LIMIT: u32 = 100;

// ============================================================================
// Sent Messages
// ============================================================================

pub fn query_blockchain_id(deps: Deps) -> StdResult<BlockchainIdResponse> {
    Ok(BlockchainIdResponse {
        blockchain_id: CONFIG.load(deps.storage)?.blockchain_id,
    })
}

pub fn query_latest_message_id(deps: Deps) -> StdResult<LatestMessageIdResponse> {
    Ok(LatestMessageIdResponse {
        message_id: LATEST_MESSAGE_ID.load(deps.storage)?,
    })
}

fn load_sent(deps: Deps, message_id: u64) -> StdResult<SentMessage> {
    SENT_MESSAGES
        .may_load(deps.storage, message_id)?
        .ok_or_else(|| StdError::not_found(format!("message {}", message_id)))
}

pub fn query_sent_message(deps: Deps, message_id: u64) -> StdResult<SentMessageResponse> {
    let sent = load_sent(deps, message_id)?;
    Ok(SentMessageResponse {
        message: sent.message,
        message_hash: sent.message_hash,
    })
}

pub fn query_message_hash(deps: Deps, message_id: u64) -> StdResult<MessageHashResponse> {
    Ok(MessageHashResponse {
        message_hash: load_sent(deps, message_id)?.message_hash,
    })
}

/// Fee still in escrow for `message_id`.
pub fn query_message_fee_info(deps: Deps, message_id: u64) -> StdResult<MessageFeeInfoResponse> {
    load_sent(deps, message_id)?;

    let fee_info = match PENDING_FEES.may_load(deps.storage, message_id)? {
        Some(escrow) => TeleporterFeeInfo::new(escrow.fee_token.as_str(), escrow.amount),
        None => TeleporterFeeInfo::none(),
    };
    Ok(MessageFeeInfoResponse {
        fee_info,
        receipt_relayer_reward_address: RECEIPTS_RECEIVED.may_load(deps.storage, message_id)?,
    })
}

// ============================================================================
// Received Messages
// ============================================================================

pub fn query_message_received(
    deps: Deps,
    source_chain_id: String,
    message_id: u64,
) -> StdResult<MessageReceivedResponse> {
    Ok(MessageReceivedResponse {
        delivered: RECEIVED_MESSAGES.has(deps.storage, (source_chain_id.as_str(), message_id)),
    })
}

pub fn query_delivery_record(
    deps: Deps,
    source_chain_id: String,
    message_id: u64,
) -> StdResult<DeliveryRecordResponse> {
    let key = (source_chain_id.as_str(), message_id);
    Ok(DeliveryRecordResponse {
        record: RECEIVED_MESSAGES.may_load(deps.storage, key)?,
        outcome: EXECUTION_OUTCOMES.may_load(deps.storage, key)?,
    })
}

pub fn query_outstanding_receipts(
    deps: Deps,
    destination_chain_id: String,
    limit: Option<u32>,
) -> StdResult<OutstandingReceiptsResponse> {
    let limit = limit
        .unwrap_or(MAX_RECEIPTS_BATCH_SIZE as u32)
        .min(MAX_LIMIT) as usize;

    let receipts = OUTSTANDING_RECEIPTS
        .prefix(destination_chain_id.as_str())
        .range(deps.storage, None, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            item.map(
                |(received_message_id, relayer_reward_address)| OutstandingReceipt {
                    received_message_id,
                    relayer_reward_address,
                },
            )
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(OutstandingReceiptsResponse { receipts })
}

// ============================================================================
// Rewards
// ============================================================================

pub fn query_relayer_reward_amount(
    deps: Deps,
    relayer: String,
    fee_asset: String,
) -> StdResult<RelayerRewardAmountResponse> {
    let relayer = deps.api.addr_validate(&relayer)?;
    let fee_asset = deps.api.addr_validate(&fee_asset)?;
    let amount = RELAYER_REWARDS
        .may_load(deps.storage, (&relayer, &fee_asset))?
        .unwrap_or_else(Uint128::zero);
    Ok(RelayerRewardAmountResponse { amount })
}

pub fn query_relayer_rewards(deps: Deps, relayer: String) -> StdResult<RelayerRewardsResponse> {
    let relayer = deps.api.addr_validate(&relayer)?;
    let rewards = RELAYER_REWARDS
        .prefix(&relayer)
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(fee_asset, amount)| RelayerReward { fee_asset, amount }))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(RelayerRewardsResponse { rewards })
}

pub fn query_fee_totals(deps: Deps, fee_asset: String) -> StdResult<FeeTotalsResponse> {
    let fee_asset = deps.api.addr_validate(&fee_asset)?;
    let totals = FEE_TOTALS
        .may_load(deps.storage, &fee_asset)?
        .unwrap_or_default();
    Ok(FeeTotalsResponse {
        escrowed: totals.escrowed,
        credited: totals.credited,
        redeemed: totals.redeemed,
    })
}
