//! Teleporter Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_add_fee_amount, execute_receive_cross_chain_message, execute_redeem_relayer_rewards,
    execute_send_cross_chain_message, execute_send_specified_receipts, handle_execution_reply,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_blockchain_id, query_delivery_record, query_fee_totals, query_latest_message_id,
    query_message_fee_info, query_message_hash, query_message_received,
    query_outstanding_receipts, query_relayer_reward_amount, query_relayer_rewards,
    query_sent_message,
};
use crate::state::{
    Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, EXECUTE_MESSAGE_REPLY_ID, LATEST_MESSAGE_ID,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    _msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        blockchain_id: env.block.chain_id,
    };
    CONFIG.save(deps.storage, &config)?;
    LATEST_MESSAGE_ID.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("blockchain_id", config.blockchain_id))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SendCrossChainMessage(input) => {
            execute_send_cross_chain_message(deps, env, info, input)
        }
        ExecuteMsg::AddFeeAmount {
            message_id,
            fee_token_address,
            additional_fee_amount,
        } => execute_add_fee_amount(
            deps,
            env,
            info,
            message_id,
            fee_token_address,
            additional_fee_amount,
        ),
        ExecuteMsg::SendSpecifiedReceipts {
            source_chain_id,
            message_ids,
            fee_info,
            allowed_relayer_addresses,
        } => execute_send_specified_receipts(
            deps,
            env,
            info,
            source_chain_id,
            message_ids,
            fee_info,
            allowed_relayer_addresses,
        ),
        ExecuteMsg::ReceiveCrossChainMessage {
            source_chain_id,
            message,
            proof,
            relayer_reward_address,
        } => execute_receive_cross_chain_message(
            deps,
            env,
            info,
            source_chain_id,
            message,
            proof,
            relayer_reward_address,
        ),
        ExecuteMsg::RedeemRelayerRewards { fee_asset } => {
            execute_redeem_relayer_rewards(deps, info, fee_asset)
        }
    }
}

// ============================================================================
// Reply
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        EXECUTE_MESSAGE_REPLY_ID => handle_execution_reply(deps, msg),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::BlockchainId {} => to_json_binary(&query_blockchain_id(deps)?),
        QueryMsg::LatestMessageId {} => to_json_binary(&query_latest_message_id(deps)?),
        QueryMsg::SentMessage { message_id } => {
            to_json_binary(&query_sent_message(deps, message_id)?)
        }
        QueryMsg::MessageHash { message_id } => {
            to_json_binary(&query_message_hash(deps, message_id)?)
        }
        QueryMsg::MessageFeeInfo { message_id } => {
            to_json_binary(&query_message_fee_info(deps, message_id)?)
        }
        QueryMsg::MessageReceived {
            source_chain_id,
            message_id,
        } => to_json_binary(&query_message_received(deps, source_chain_id, message_id)?),
        QueryMsg::DeliveryRecord {
            source_chain_id,
            message_id,
        } => to_json_binary(&query_delivery_record(deps, source_chain_id, message_id)?),
        QueryMsg::RelayerRewardAmount { relayer, fee_asset } => {
            to_json_binary(&query_relayer_reward_amount(deps, relayer, fee_asset)?)
        }
        QueryMsg::RelayerRewards { relayer } => {
            to_json_binary(&query_relayer_rewards(deps, relayer)?)
        }
        QueryMsg::OutstandingReceipts {
            destination_chain_id,
            limit,
        } => to_json_binary(&query_outstanding_receipts(
            deps,
            destination_chain_id,
            limit,
        )?),
        QueryMsg::FeeTotals { fee_asset } => to_json_binary(&query_fee_totals(deps, fee_asset)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
