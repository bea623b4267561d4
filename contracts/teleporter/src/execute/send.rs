//! Outbound message handlers.
//!
//! Sending assigns the next message ID, escrows the fee, attaches queued
//! receipts for the destination chain and emits the send event relayers watch.

use cosmwasm_std::{
    to_json_binary, Addr, Binary, CosmosMsg, Deps, DepsMut, Env, Event, HexBinary, MessageInfo,
    Order, Response, StdResult, Storage, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;

use common::events::{
    ADD_FEE_AMOUNT, ATTR_ALLOWED_RELAYERS, ATTR_DESTINATION_ADDRESS, ATTR_DESTINATION_CHAIN_ID,
    ATTR_FEE_AMOUNT, ATTR_FEE_TOKEN, ATTR_MESSAGE, ATTR_MESSAGE_HASH, ATTR_MESSAGE_ID,
    ATTR_ORIGIN_SENDER, ATTR_RECEIPT_COUNT, ATTR_REQUIRED_GAS_LIMIT, ATTR_SOURCE_CHAIN_ID,
    LIST_SEPARATOR, SEND_CROSS_CHAIN_MESSAGE,
};
use common::{
    compute_message_hash, spendable_allowance, TeleporterFeeInfo, TeleporterMessage,
    TeleporterMessageInput, TeleporterMessageReceipt,
};

use crate::error::ContractError;
use crate::msg::SendCrossChainMessageResponse;
use crate::state::{
    Config, EscrowedFee, SentMessage, CONFIG, FEE_TOTALS, LATEST_MESSAGE_ID,
    MAX_RECEIPTS_BATCH_SIZE, OUTSTANDING_RECEIPTS, PENDING_FEES, RECEIPTS_RECEIVED,
    RECEIVED_MESSAGES, SENT_MESSAGES,
};

/// Execute handler for `SendCrossChainMessage`.
pub fn execute_send_cross_chain_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    input: TeleporterMessageInput,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let receipts = take_outstanding_receipts(deps.storage, &input.destination_chain_id)?;

    let (message_id, messages, event) =
        send_message(deps, &env, &config, &info.sender, input, receipts)?;

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .set_data(to_json_binary(&SendCrossChainMessageResponse { message_id })?)
        .add_attribute("method", "send_cross_chain_message")
        .add_attribute("message_id", message_id.to_string()))
}

/// Execute handler for `SendSpecifiedReceipts`.
pub fn execute_send_specified_receipts(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    source_chain_id: String,
    message_ids: Vec<u64>,
    fee_info: TeleporterFeeInfo,
    allowed_relayer_addresses: Vec<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut receipts = Vec::with_capacity(message_ids.len());
    for message_id in message_ids {
        let key = (source_chain_id.as_str(), message_id);
        let record = RECEIVED_MESSAGES.may_load(deps.storage, key)?.ok_or_else(|| {
            ContractError::MessageNotDelivered {
                source_chain_id: source_chain_id.clone(),
                message_id,
            }
        })?;
        OUTSTANDING_RECEIPTS.remove(deps.storage, key);
        receipts.push(TeleporterMessageReceipt {
            received_message_id: message_id,
            relayer_reward_address: record.relayer_reward_address,
        });
    }
    let receipt_count = receipts.len();

    let input = TeleporterMessageInput {
        destination_chain_id: source_chain_id,
        destination_address: String::new(),
        fee_info,
        required_gas_limit: 0,
        allowed_relayer_addresses,
        message: Binary::default(),
    };
    let (message_id, messages, event) =
        send_message(deps, &env, &config, &info.sender, input, receipts)?;

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .set_data(to_json_binary(&SendCrossChainMessageResponse { message_id })?)
        .add_attribute("method", "send_specified_receipts")
        .add_attribute("message_id", message_id.to_string())
        .add_attribute("receipt_count", receipt_count.to_string()))
}

/// Execute handler for `AddFeeAmount`.
pub fn execute_add_fee_amount(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    message_id: u64,
    fee_token_address: String,
    additional_fee_amount: Uint128,
) -> Result<Response, ContractError> {
    if additional_fee_amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }
    if !SENT_MESSAGES.has(deps.storage, message_id) {
        return Err(ContractError::MessageNotFound { message_id });
    }
    if RECEIPTS_RECEIVED.has(deps.storage, message_id) {
        return Err(ContractError::FeeAlreadyCredited { message_id });
    }

    let top_up = TeleporterFeeInfo::new(fee_token_address, additional_fee_amount);
    let (fee_token, transfer) = escrow_fee(deps.as_ref(), &env, &info.sender, &top_up)?;

    let mut escrow = PENDING_FEES
        .may_load(deps.storage, message_id)?
        .unwrap_or_else(|| EscrowedFee {
            fee_token: fee_token.clone(),
            amount: Uint128::zero(),
        });
    if escrow.fee_token != fee_token {
        return Err(ContractError::FeeTokenMismatch {
            expected: escrow.fee_token.to_string(),
            got: fee_token.to_string(),
        });
    }
    escrow.amount += additional_fee_amount;
    PENDING_FEES.save(deps.storage, message_id, &escrow)?;
    record_escrowed(deps.storage, &fee_token, additional_fee_amount)?;

    let event = Event::new(ADD_FEE_AMOUNT)
        .add_attribute(ATTR_MESSAGE_ID, message_id.to_string())
        .add_attribute(ATTR_FEE_TOKEN, fee_token.to_string())
        .add_attribute(ATTR_FEE_AMOUNT, escrow.amount.to_string());

    Ok(Response::new()
        .add_message(transfer)
        .add_event(event)
        .add_attribute("method", "add_fee_amount")
        .add_attribute("message_id", message_id.to_string())
        .add_attribute("additional_fee_amount", additional_fee_amount))
}

// ============================================================================
// Helpers
// ============================================================================

/// Store and announce a new message. Returns its ID, the fee transfer (if any)
/// and the send event.
fn send_message(
    deps: DepsMut,
    env: &Env,
    config: &Config,
    sender: &Addr,
    input: TeleporterMessageInput,
    receipts: Vec<TeleporterMessageReceipt>,
) -> Result<(u64, Vec<CosmosMsg>, Event), ContractError> {
    if input.destination_chain_id.is_empty() || input.destination_chain_id == config.blockchain_id
    {
        return Err(ContractError::InvalidDestinationChain {
            chain_id: input.destination_chain_id,
        });
    }

    let mut messages = vec![];
    let mut escrow = None;
    if !input.fee_info.is_zero() {
        let (fee_token, transfer) = escrow_fee(deps.as_ref(), env, sender, &input.fee_info)?;
        messages.push(transfer);
        escrow = Some(EscrowedFee {
            fee_token,
            amount: input.fee_info.amount,
        });
    }

    let message_id = LATEST_MESSAGE_ID.load(deps.storage)? + 1;
    LATEST_MESSAGE_ID.save(deps.storage, &message_id)?;

    let message = TeleporterMessage {
        message_id,
        origin_sender: sender.to_string(),
        destination_chain_id: input.destination_chain_id,
        destination_address: input.destination_address,
        fee_info: match &escrow {
            Some(escrow) => TeleporterFeeInfo::new(escrow.fee_token.as_str(), escrow.amount),
            None => TeleporterFeeInfo::none(),
        },
        required_gas_limit: input.required_gas_limit,
        allowed_relayer_addresses: input.allowed_relayer_addresses,
        receipts,
        message: input.message,
    };
    let message_hash =
        HexBinary::from(compute_message_hash(&config.blockchain_id, &message).to_vec());

    if let Some(escrow) = &escrow {
        PENDING_FEES.save(deps.storage, message_id, escrow)?;
        record_escrowed(deps.storage, &escrow.fee_token, escrow.amount)?;
    }

    let event = send_event(&config.blockchain_id, &message, &message_hash);
    SENT_MESSAGES.save(
        deps.storage,
        message_id,
        &SentMessage {
            message,
            message_hash,
        },
    )?;

    Ok((message_id, messages, event))
}

/// Check the payer's allowance and build the `TransferFrom` into escrow.
fn escrow_fee(
    deps: Deps,
    env: &Env,
    payer: &Addr,
    fee_info: &TeleporterFeeInfo,
) -> Result<(Addr, CosmosMsg), ContractError> {
    let invalid_fee_asset = || ContractError::InvalidFeeAsset {
        token: fee_info.fee_token_address.clone(),
    };

    let fee_token = deps
        .api
        .addr_validate(&fee_info.fee_token_address)
        .map_err(|_| invalid_fee_asset())?;
    let available = spendable_allowance(
        &deps.querier,
        &fee_token,
        payer,
        &env.contract.address,
        &env.block,
    )
    .map_err(|_| invalid_fee_asset())?;

    if available < fee_info.amount {
        return Err(ContractError::InsufficientAllowance {
            required: fee_info.amount,
            available,
        });
    }

    let transfer = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: fee_token.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
            owner: payer.to_string(),
            recipient: env.contract.address.to_string(),
            amount: fee_info.amount,
        })?,
        funds: vec![],
    });

    Ok((fee_token, transfer))
}

fn record_escrowed(storage: &mut dyn Storage, fee_token: &Addr, amount: Uint128) -> StdResult<()> {
    let mut totals = FEE_TOTALS.may_load(storage, fee_token)?.unwrap_or_default();
    totals.escrowed += amount;
    FEE_TOTALS.save(storage, fee_token, &totals)
}

/// Remove and return up to `MAX_RECEIPTS_BATCH_SIZE` queued receipts for
/// `destination_chain_id`, oldest message first.
fn take_outstanding_receipts(
    storage: &mut dyn Storage,
    destination_chain_id: &str,
) -> StdResult<Vec<TeleporterMessageReceipt>> {
    let queued = OUTSTANDING_RECEIPTS
        .prefix(destination_chain_id)
        .range(storage, None, None, Order::Ascending)
        .take(MAX_RECEIPTS_BATCH_SIZE)
        .collect::<StdResult<Vec<_>>>()?;

    let mut receipts = Vec::with_capacity(queued.len());
    for (received_message_id, relayer_reward_address) in queued {
        OUTSTANDING_RECEIPTS.remove(storage, (destination_chain_id, received_message_id));
        receipts.push(TeleporterMessageReceipt {
            received_message_id,
            relayer_reward_address,
        });
    }
    Ok(receipts)
}

/// Attributes whose value would be empty are left out.
fn send_event(source_chain_id: &str, message: &TeleporterMessage, hash: &HexBinary) -> Event {
    let allowed = message
        .allowed_relayer_addresses
        .join(&LIST_SEPARATOR.to_string());

    let optional = [
        (ATTR_DESTINATION_ADDRESS, message.destination_address.clone()),
        (ATTR_FEE_TOKEN, message.fee_info.fee_token_address.clone()),
        (ATTR_ALLOWED_RELAYERS, allowed),
        (ATTR_MESSAGE, message.message.to_base64()),
    ];

    Event::new(SEND_CROSS_CHAIN_MESSAGE)
        .add_attribute(ATTR_SOURCE_CHAIN_ID, source_chain_id)
        .add_attribute(ATTR_MESSAGE_ID, message.message_id.to_string())
        .add_attribute(ATTR_ORIGIN_SENDER, &message.origin_sender)
        .add_attribute(ATTR_DESTINATION_CHAIN_ID, &message.destination_chain_id)
        .add_attribute(ATTR_FEE_AMOUNT, message.fee_info.amount.to_string())
        .add_attribute(
            ATTR_REQUIRED_GAS_LIMIT,
            message.required_gas_limit.to_string(),
        )
        .add_attribute(ATTR_RECEIPT_COUNT, message.receipts.len().to_string())
        .add_attribute(ATTR_MESSAGE_HASH, hash.to_hex())
        .add_attributes(
            optional
                .into_iter()
                .filter(|(_, value)| !value.is_empty()),
        )
}
