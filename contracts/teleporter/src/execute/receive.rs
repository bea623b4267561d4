//! Inbound message handlers.
//!
//! Delivery, receipt settlement and fee crediting commit in the handler; the
//! destination application runs afterwards in a `reply_always` sub-message so
//! its failure cannot revert them.

use cosmwasm_std::{
    to_json_binary, Api, Binary, DepsMut, Env, Event, MessageInfo, Reply, Response, StdError,
    Storage, SubMsg, SubMsgResult, WasmMsg,
};

use common::events::{
    ATTR_AMOUNT, ATTR_DELIVERER, ATTR_DESTINATION_CHAIN_ID, ATTR_FEE_TOKEN, ATTR_MESSAGE_ID,
    ATTR_ORIGIN_SENDER, ATTR_REASON, ATTR_RELAYER_REWARD_ADDRESS, ATTR_REWARD_REDEEMER,
    ATTR_SOURCE_CHAIN_ID, MESSAGE_EXECUTED, MESSAGE_EXECUTION_FAILED, RECEIPT_RECEIVED,
    RECEIVE_CROSS_CHAIN_MESSAGE,
};
use common::{compute_message_hash, TeleporterMessage, TeleporterMessageReceipt, TeleporterReceiverMsg};

use crate::error::ContractError;
use crate::msg::ReceiveCrossChainMessageResponse;
use crate::state::{
    DeliveryRecord, ExecutionOutcome, PendingExecution, CONFIG, EXECUTE_MESSAGE_REPLY_ID,
    EXECUTION_OUTCOMES, FEE_TOTALS, OUTSTANDING_RECEIPTS, PENDING_EXECUTIONS, PENDING_FEES,
    RECEIPTS_RECEIVED, RECEIVED_MESSAGES, RELAYER_REWARDS, SENT_MESSAGES,
};

/// Execute handler for `ReceiveCrossChainMessage`.
pub fn execute_receive_cross_chain_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    source_chain_id: String,
    message: TeleporterMessage,
    proof: Binary,
    relayer_reward_address: Option<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if message.destination_chain_id != config.blockchain_id {
        return Err(ContractError::InvalidDestinationChain {
            chain_id: message.destination_chain_id,
        });
    }
    if source_chain_id.is_empty() || source_chain_id == config.blockchain_id {
        return Err(ContractError::InvalidSourceChain {
            chain_id: source_chain_id,
        });
    }
    if proof.as_slice() != compute_message_hash(&source_chain_id, &message).as_slice() {
        return Err(ContractError::InvalidMessageProof {
            source_chain_id,
            message_id: message.message_id,
        });
    }
    if !message.allows_relayer(info.sender.as_str()) {
        return Err(ContractError::UnauthorizedRelayer {
            relayer: info.sender.to_string(),
        });
    }

    let key = (source_chain_id.as_str(), message.message_id);
    if RECEIVED_MESSAGES.has(deps.storage, key) {
        return Ok(Response::new()
            .set_data(to_json_binary(&ReceiveCrossChainMessageResponse {
                delivered: true,
                newly_delivered: false,
            })?)
            .add_attribute("method", "receive_cross_chain_message")
            .add_attribute("message_id", message.message_id.to_string())
            .add_attribute("already_delivered", "true"));
    }

    let reward_redeemer = match relayer_reward_address {
        Some(address) if address.is_empty() => return Err(ContractError::InvalidRewardAddress),
        Some(address) => address,
        None => info.sender.to_string(),
    };

    RECEIVED_MESSAGES.save(
        deps.storage,
        key,
        &DeliveryRecord {
            relayer_reward_address: reward_redeemer.clone(),
            delivered_by: info.sender.clone(),
            delivered_at_height: env.block.height,
        },
    )?;
    OUTSTANDING_RECEIPTS.save(deps.storage, key, &reward_redeemer)?;

    let receipt_events =
        process_receipts(deps.storage, deps.api, &source_chain_id, &message.receipts)?;

    let receive_event = Event::new(RECEIVE_CROSS_CHAIN_MESSAGE)
        .add_attribute(ATTR_SOURCE_CHAIN_ID, &source_chain_id)
        .add_attribute(ATTR_MESSAGE_ID, message.message_id.to_string())
        .add_attribute(ATTR_ORIGIN_SENDER, &message.origin_sender)
        .add_attribute(ATTR_REWARD_REDEEMER, &reward_redeemer)
        .add_attribute(ATTR_DELIVERER, info.sender.as_str());

    let mut response = Response::new()
        .add_event(receive_event)
        .add_events(receipt_events)
        .set_data(to_json_binary(&ReceiveCrossChainMessageResponse {
            delivered: true,
            newly_delivered: true,
        })?)
        .add_attribute("method", "receive_cross_chain_message")
        .add_attribute("source_chain_id", &source_chain_id)
        .add_attribute("message_id", message.message_id.to_string());

    if message.destination_address.is_empty() {
        // Receipt carrier: nothing to execute
        EXECUTION_OUTCOMES.save(deps.storage, key, &ExecutionOutcome::Executed)?;
        response = response.add_event(executed_event(&source_chain_id, message.message_id));
    } else {
        // Replies resolve innermost first
        let mut pending = PENDING_EXECUTIONS
            .may_load(deps.storage)?
            .unwrap_or_default();
        pending.push(PendingExecution {
            source_chain_id: source_chain_id.clone(),
            message_id: message.message_id,
        });
        PENDING_EXECUTIONS.save(deps.storage, &pending)?;
        let execute = WasmMsg::Execute {
            contract_addr: message.destination_address,
            msg: to_json_binary(&TeleporterReceiverMsg::ReceiveTeleporterMessage {
                source_chain_id,
                origin_sender: message.origin_sender,
                message: message.message,
            })?,
            funds: vec![],
        };
        response = response.add_submessage(SubMsg::reply_always(execute, EXECUTE_MESSAGE_REPLY_ID));
    }

    Ok(response)
}

/// Reply handler for the application sub-message.
pub fn handle_execution_reply(deps: DepsMut, msg: Reply) -> Result<Response, ContractError> {
    let mut stack = PENDING_EXECUTIONS
        .may_load(deps.storage)?
        .unwrap_or_default();
    let pending = stack
        .pop()
        .ok_or_else(|| StdError::not_found("PendingExecution"))?;
    if stack.is_empty() {
        PENDING_EXECUTIONS.remove(deps.storage);
    } else {
        PENDING_EXECUTIONS.save(deps.storage, &stack)?;
    }

    let key = (pending.source_chain_id.as_str(), pending.message_id);
    let (outcome, event) = match msg.result {
        SubMsgResult::Ok(_) => (
            ExecutionOutcome::Executed,
            executed_event(&pending.source_chain_id, pending.message_id),
        ),
        SubMsgResult::Err(reason) => (
            ExecutionOutcome::ExecutionFailed {
                reason: reason.clone(),
            },
            Event::new(MESSAGE_EXECUTION_FAILED)
                .add_attribute(ATTR_SOURCE_CHAIN_ID, &pending.source_chain_id)
                .add_attribute(ATTR_MESSAGE_ID, pending.message_id.to_string())
                .add_attribute(ATTR_REASON, reason),
        ),
    };
    EXECUTION_OUTCOMES.save(deps.storage, key, &outcome)?;

    Ok(Response::new()
        .add_event(event)
        .add_attribute("method", "execution_reply")
        .add_attribute("message_id", pending.message_id.to_string()))
}

fn executed_event(source_chain_id: &str, message_id: u64) -> Event {
    Event::new(MESSAGE_EXECUTED)
        .add_attribute(ATTR_SOURCE_CHAIN_ID, source_chain_id)
        .add_attribute(ATTR_MESSAGE_ID, message_id.to_string())
}

/// Settle receipts carried by a message from `source_chain_id`.
///
/// A receipt credits the reward ledger only for a message this teleporter
/// sent to that chain whose fee is still escrowed; anything else is skipped.
fn process_receipts(
    storage: &mut dyn Storage,
    api: &dyn Api,
    source_chain_id: &str,
    receipts: &[TeleporterMessageReceipt],
) -> Result<Vec<Event>, ContractError> {
    let mut events = vec![];

    for receipt in receipts {
        let message_id = receipt.received_message_id;
        let Some(sent) = SENT_MESSAGES.may_load(storage, message_id)? else {
            continue;
        };
        if sent.message.destination_chain_id != source_chain_id
            || RECEIPTS_RECEIVED.has(storage, message_id)
        {
            continue;
        }

        let escrow = PENDING_FEES.may_load(storage, message_id)?;
        if let Some(escrow) = &escrow {
            // An unusable reward address leaves the fee escrowed
            let Ok(redeemer) = api.addr_validate(&receipt.relayer_reward_address) else {
                continue;
            };
            let balance = RELAYER_REWARDS
                .may_load(storage, (&redeemer, &escrow.fee_token))?
                .unwrap_or_default();
            RELAYER_REWARDS.save(
                storage,
                (&redeemer, &escrow.fee_token),
                &(balance + escrow.amount),
            )?;

            let mut totals = FEE_TOTALS
                .may_load(storage, &escrow.fee_token)?
                .unwrap_or_default();
            totals.credited += escrow.amount;
            FEE_TOTALS.save(storage, &escrow.fee_token, &totals)?;

            PENDING_FEES.remove(storage, message_id);
        }
        RECEIPTS_RECEIVED.save(storage, message_id, &receipt.relayer_reward_address)?;

        let mut event = Event::new(RECEIPT_RECEIVED)
            .add_attribute(ATTR_DESTINATION_CHAIN_ID, source_chain_id)
            .add_attribute(ATTR_MESSAGE_ID, message_id.to_string())
            .add_attribute(ATTR_RELAYER_REWARD_ADDRESS, &receipt.relayer_reward_address);
        event = match escrow {
            Some(escrow) => event
                .add_attribute(ATTR_FEE_TOKEN, escrow.fee_token.as_str())
                .add_attribute(ATTR_AMOUNT, escrow.amount.to_string()),
            // Fee-less message: no fee token to report
            None => event.add_attribute(ATTR_AMOUNT, "0"),
        };
        events.push(event);
    }

    Ok(events)
}
