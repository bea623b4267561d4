//! Incoming handlers: Teleporter deliveries and the wrapped token reply.
//!
//! Only teleporters registered at or above the configured minimum version
//! may deliver. A failure here is reported by the teleporter as an execution
//! failure; the delivery itself stands.

use cosmwasm_std::{
    to_json_binary, Binary, DepsMut, Env, Event, MessageInfo, Reply, Response, StdError, SubMsg,
    Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;

use common::events::{
    ATTR_CONTRACT_ADDRESS, CREATE_BRIDGE_TOKEN, FUNGIBLE_TOKEN_PACKET, MINT_BRIDGE_TOKENS,
    WITHDRAW_TOKENS,
};
use common::{BridgeAction, BridgeTransfer, CreateBridgeToken};

use super::cw20_msg;
use super::outgoing::{send_transfer, Funding, OutboundTransfer};
use crate::error::ContractError;
use crate::registry::teleporter_version;
use crate::state::{
    BridgeVariant, Config, WrappedTokenInfo, BRIDGED_BALANCES, CONFIG,
    CREATE_BRIDGE_TOKEN_REPLY_ID, NATIVE_TO_WRAPPED, PENDING_WRAPPED_TOKEN, WRAPPED_TOKENS,
};

/// Execute handler for `ReceiveTeleporterMessage`.
pub fn execute_receive_teleporter_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    source_chain_id: String,
    origin_sender: String,
    message: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let version = teleporter_version(&deps.querier, &config.registry, &info.sender)?;
    if !matches!(version, Some(v) if v >= config.min_teleporter_version) {
        return Err(ContractError::UnauthorizedTeleporter {
            teleporter: info.sender.to_string(),
        });
    }

    let response = match BridgeAction::decode(message.as_slice())? {
        BridgeAction::CreateBridgeToken(create) => {
            create_bridge_token(deps, &env, &config, &source_chain_id, &origin_sender, create)?
        }
        BridgeAction::BridgeTransfer(transfer)
            if transfer.native_chain_id == config.blockchain_id
                && transfer.native_bridge == env.contract.address.as_str() =>
        {
            withdraw_native(deps, &env, &config, &source_chain_id, &origin_sender, transfer)?
        }
        BridgeAction::BridgeTransfer(transfer) => {
            mint_wrapped(deps, &env, &config, &source_chain_id, &origin_sender, transfer)?
        }
    };

    Ok(response
        .add_attribute("method", "receive_teleporter_message")
        .add_attribute("source_chain_id", source_chain_id)
        .add_attribute("origin_sender", origin_sender))
}

/// Reply handler for the wrapped token instantiation.
pub fn handle_create_bridge_token_reply(
    deps: DepsMut,
    msg: Reply,
) -> Result<Response, ContractError> {
    let result = msg.result.into_result().map_err(StdError::generic_err)?;
    let address = result
        .events
        .iter()
        .filter(|event| event.ty == "instantiate")
        .flat_map(|event| &event.attributes)
        .find(|attr| attr.key == ATTR_CONTRACT_ADDRESS)
        .ok_or(ContractError::MissingContractAddress)?;
    let token = deps.api.addr_validate(&address.value)?;

    let info = PENDING_WRAPPED_TOKEN.load(deps.storage)?;
    PENDING_WRAPPED_TOKEN.remove(deps.storage);

    NATIVE_TO_WRAPPED.save(
        deps.storage,
        (
            info.native_chain_id.as_str(),
            info.native_bridge.as_str(),
            info.native_asset.as_str(),
        ),
        &token,
    )?;
    WRAPPED_TOKENS.save(deps.storage, &token, &info)?;

    let mut event = Event::new(CREATE_BRIDGE_TOKEN)
        .add_attribute("native_chain_id", &info.native_chain_id)
        .add_attribute("native_bridge", &info.native_bridge)
        .add_attribute("native_asset", &info.native_asset)
        .add_attribute("bridge_token", token.as_str());
    if let Some(trace) = &info.denom_trace {
        event = event.add_attribute("denom_trace", trace);
    }

    Ok(Response::new()
        .add_event(event)
        .add_attribute("method", "create_bridge_token_reply")
        .add_attribute("bridge_token", token.as_str()))
}

// ============================================================================
// Payload Handlers
// ============================================================================

fn create_bridge_token(
    deps: DepsMut,
    env: &Env,
    config: &Config,
    source_chain_id: &str,
    origin_sender: &str,
    create: CreateBridgeToken,
) -> Result<Response, ContractError> {
    if create.native_chain_id != source_chain_id || create.native_bridge != origin_sender {
        return Err(ContractError::InvalidTransferOrigin {
            source_chain_id: source_chain_id.to_string(),
            origin_sender: origin_sender.to_string(),
        });
    }
    if create.destination_bridge != env.contract.address.as_str() {
        return Err(ContractError::InvalidDestinationBridge {
            address: create.destination_bridge,
        });
    }

    let key = (
        create.native_chain_id.as_str(),
        create.native_bridge.as_str(),
        create.native_asset.as_str(),
    );
    if let Some(existing) = NATIVE_TO_WRAPPED.may_load(deps.storage, key)? {
        return Ok(Response::new()
            .add_attribute("bridge_token", existing.as_str())
            .add_attribute("already_exists", "true"));
    }

    let denom_trace = match &config.variant {
        BridgeVariant::Native => None,
        BridgeVariant::Ics20 { channel } => {
            Some(format!("transfer/{}/{}", channel, create.native_asset))
        }
    };
    PENDING_WRAPPED_TOKEN.save(
        deps.storage,
        &WrappedTokenInfo {
            native_chain_id: create.native_chain_id.clone(),
            native_bridge: create.native_bridge.clone(),
            native_asset: create.native_asset.clone(),
            denom_trace,
        },
    )?;

    let label = format!("bridge-token {} from {}", create.symbol, create.native_chain_id);
    let instantiate = WasmMsg::Instantiate {
        admin: Some(env.contract.address.to_string()),
        code_id: config.bridge_token_code_id,
        msg: to_json_binary(&bridge_token::msg::InstantiateMsg {
            name: create.name,
            symbol: create.symbol,
            decimals: create.decimals,
            native_chain_id: create.native_chain_id,
            native_bridge: create.native_bridge,
            native_asset: create.native_asset,
        })?,
        funds: vec![],
        label,
    };

    Ok(Response::new().add_submessage(SubMsg::reply_on_success(
        instantiate,
        CREATE_BRIDGE_TOKEN_REPLY_ID,
    )))
}

/// A transfer of a token native to this chain coming back from `source_chain_id`.
fn withdraw_native(
    deps: DepsMut,
    env: &Env,
    config: &Config,
    source_chain_id: &str,
    origin_sender: &str,
    transfer: BridgeTransfer,
) -> Result<Response, ContractError> {
    let token = deps.api.addr_validate(&transfer.native_asset)?;

    let route = (source_chain_id, origin_sender, &token);
    let bridged = BRIDGED_BALANCES
        .may_load(deps.storage, route)?
        .unwrap_or_default();
    if bridged < transfer.amount {
        return Err(ContractError::InsufficientBridgedBalance {
            available: bridged,
            required: transfer.amount,
        });
    }
    BRIDGED_BALANCES.save(deps.storage, route, &(bridged - transfer.amount))?;

    match transfer.secondary_destination {
        None => {
            let release = cw20_msg(
                &token,
                &Cw20ExecuteMsg::Transfer {
                    recipient: transfer.recipient.clone(),
                    amount: transfer.amount,
                },
            )?;
            let event = Event::new(WITHDRAW_TOKENS)
                .add_attribute("token", token.as_str())
                .add_attribute("recipient", &transfer.recipient)
                .add_attribute("amount", transfer.amount);
            Ok(Response::new().add_message(release).add_event(event))
        }
        Some(hop) => {
            let (messages, event) = send_transfer(
                deps,
                env,
                config,
                Funding::Custody,
                OutboundTransfer {
                    destination_chain_id: hop.chain_id,
                    destination_bridge_address: hop.bridge_address,
                    token: token.to_string(),
                    recipient: transfer.recipient,
                    total_amount: transfer.amount,
                    primary_fee_amount: transfer.secondary_fee,
                    secondary_fee_amount: Uint128::zero(),
                    secondary_destination: None,
                },
            )?;
            Ok(Response::new()
                .add_messages(messages)
                .add_event(event)
                .add_attribute("forwarded", "true"))
        }
    }
}

/// A transfer of a token native to `source_chain_id`, minted here.
fn mint_wrapped(
    deps: DepsMut,
    env: &Env,
    config: &Config,
    source_chain_id: &str,
    origin_sender: &str,
    transfer: BridgeTransfer,
) -> Result<Response, ContractError> {
    let key = (
        transfer.native_chain_id.as_str(),
        transfer.native_bridge.as_str(),
        transfer.native_asset.as_str(),
    );
    let token = NATIVE_TO_WRAPPED
        .may_load(deps.storage, key)?
        .ok_or_else(|| ContractError::UnregisteredAsset {
            native_chain_id: transfer.native_chain_id.clone(),
            native_bridge: transfer.native_bridge.clone(),
            native_asset: transfer.native_asset.clone(),
        })?;
    if transfer.native_chain_id != source_chain_id || transfer.native_bridge != origin_sender {
        return Err(ContractError::InvalidTransferOrigin {
            source_chain_id: source_chain_id.to_string(),
            origin_sender: origin_sender.to_string(),
        });
    }
    let wrapped = WRAPPED_TOKENS.load(deps.storage, &token)?;

    let mut response = Response::new();
    if let Some(trace) = &wrapped.denom_trace {
        response = response.add_event(
            Event::new(FUNGIBLE_TOKEN_PACKET)
                .add_attribute("module", "transfer")
                .add_attribute("sender", origin_sender)
                .add_attribute("receiver", &transfer.recipient)
                .add_attribute("denom", trace)
                .add_attribute("amount", transfer.amount),
        );
    }

    match transfer.secondary_destination {
        None => {
            let mint = cw20_msg(
                &token,
                &Cw20ExecuteMsg::Mint {
                    recipient: transfer.recipient.clone(),
                    amount: transfer.amount,
                },
            )?;
            let event = Event::new(MINT_BRIDGE_TOKENS)
                .add_attribute("bridge_token", token.as_str())
                .add_attribute("recipient", &transfer.recipient)
                .add_attribute("amount", transfer.amount);
            Ok(response.add_message(mint).add_event(event))
        }
        Some(hop) => {
            let mint = cw20_msg(
                &token,
                &Cw20ExecuteMsg::Mint {
                    recipient: env.contract.address.to_string(),
                    amount: transfer.amount,
                },
            )?;
            let (messages, event) = send_transfer(
                deps,
                env,
                config,
                Funding::Custody,
                OutboundTransfer {
                    destination_chain_id: hop.chain_id,
                    destination_bridge_address: hop.bridge_address,
                    token: token.to_string(),
                    recipient: transfer.recipient,
                    total_amount: transfer.amount,
                    primary_fee_amount: transfer.secondary_fee,
                    secondary_fee_amount: Uint128::zero(),
                    secondary_destination: None,
                },
            )?;
            Ok(response
                .add_message(mint)
                .add_messages(messages)
                .add_event(event)
                .add_attribute("forwarded", "true"))
        }
    }
}
