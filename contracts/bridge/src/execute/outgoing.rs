//! Outgoing handlers: token registration and transfers leaving this chain.
//!
//! Every transfer is one Teleporter message to the destination bridge. The
//! primary fee is approved to the latest teleporter in the bridged token and
//! escrowed there for the relayer of the hop.

use cosmwasm_std::{
    to_json_binary, Addr, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response, StdError,
    Uint128, WasmMsg,
};
use cw20::{Cw20ExecuteMsg, Cw20QueryMsg, TokenInfoResponse};

use common::events::{BRIDGE_TOKENS, SUBMIT_CREATE_BRIDGE_TOKEN};
use common::{
    spendable_allowance, BridgeAction, BridgeTransfer, CreateBridgeToken, HopDestination,
    TeleporterFeeInfo, TeleporterMessageInput,
};

use super::cw20_msg;
use crate::error::ContractError;
use crate::registry::latest_teleporter;
use crate::state::{
    Config, BRIDGED_BALANCES, CONFIG, CREATE_BRIDGE_TOKEN_REQUIRED_GAS,
    SUBMITTED_BRIDGE_TOKEN_CREATIONS, TRANSFER_BRIDGE_TOKENS_REQUIRED_GAS, WRAPPED_TOKENS,
};

/// A transfer leaving this chain.
pub struct OutboundTransfer {
    pub destination_chain_id: String,
    pub destination_bridge_address: String,
    pub token: String,
    pub recipient: String,
    pub total_amount: Uint128,
    pub primary_fee_amount: Uint128,
    pub secondary_fee_amount: Uint128,
    pub secondary_destination: Option<HopDestination>,
}

/// Where the bridged tokens come from.
pub(crate) enum Funding<'a> {
    /// Pulled from the caller with `TransferFrom`
    Caller(&'a Addr),
    /// Already held by the bridge (forwarded hop)
    Custody,
}

// ============================================================================
// Token Registration
// ============================================================================

/// Execute handler for `SubmitCreateBridgeToken`.
#[allow(clippy::too_many_arguments)]
pub fn execute_submit_create_bridge_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    destination_chain_id: String,
    destination_bridge_address: String,
    native_token: String,
    fee_token: String,
    fee_amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }
    check_route(&config, &destination_chain_id, &destination_bridge_address)?;

    let token = deps.api.addr_validate(&native_token)?;
    if WRAPPED_TOKENS.has(deps.storage, &token) {
        return Err(ContractError::CannotExportWrappedToken {
            token: token.to_string(),
        });
    }
    let token_info: TokenInfoResponse = deps
        .querier
        .query_wasm_smart(&token, &Cw20QueryMsg::TokenInfo {})?;

    let teleporter = latest_teleporter(&deps.querier, &config.registry)?;
    let mut messages = vec![];
    let mut fee_info = TeleporterFeeInfo::none();
    if !fee_amount.is_zero() {
        let fee_token = deps.api.addr_validate(&fee_token)?;
        messages.push(pull_from(&deps, &env, &fee_token, &info.sender, fee_amount)?);
        messages.push(cw20_msg(
            &fee_token,
            &Cw20ExecuteMsg::IncreaseAllowance {
                spender: teleporter.to_string(),
                amount: fee_amount,
                expires: None,
            },
        )?);
        fee_info = TeleporterFeeInfo::new(fee_token.as_str(), fee_amount);
    }

    let payload = BridgeAction::CreateBridgeToken(CreateBridgeToken {
        native_chain_id: config.blockchain_id.clone(),
        native_bridge: env.contract.address.to_string(),
        native_asset: token.to_string(),
        destination_bridge: destination_bridge_address.clone(),
        name: token_info.name,
        symbol: token_info.symbol,
        decimals: token_info.decimals,
    });
    messages.push(teleporter_send(
        &teleporter,
        TeleporterMessageInput {
            destination_chain_id: destination_chain_id.clone(),
            destination_address: destination_bridge_address.clone(),
            fee_info,
            required_gas_limit: CREATE_BRIDGE_TOKEN_REQUIRED_GAS,
            allowed_relayer_addresses: vec![],
            message: payload.to_binary(),
        },
    )?);

    SUBMITTED_BRIDGE_TOKEN_CREATIONS.save(
        deps.storage,
        (
            destination_chain_id.as_str(),
            destination_bridge_address.as_str(),
            &token,
        ),
        &true,
    )?;

    let event = Event::new(SUBMIT_CREATE_BRIDGE_TOKEN)
        .add_attribute("destination_chain_id", &destination_chain_id)
        .add_attribute("destination_bridge_address", &destination_bridge_address)
        .add_attribute("native_token", token.as_str())
        .add_attribute("teleporter", teleporter.as_str());

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("method", "submit_create_bridge_token")
        .add_attribute("native_token", token.as_str())
        .add_attribute("destination_chain_id", destination_chain_id))
}

// ============================================================================
// Transfers
// ============================================================================

/// Execute handler for `BridgeTokens`.
pub fn execute_bridge_tokens(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    transfer: OutboundTransfer,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }

    let (messages, event) =
        send_transfer(deps, &env, &config, Funding::Caller(&info.sender), transfer)?;

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("method", "bridge_tokens")
        .add_attribute("sender", info.sender.as_str()))
}

/// Build the token movements and the Teleporter send for one hop.
///
/// Native tokens are locked and counted against the route; wrapped tokens are
/// burned and may only return to their native bridge. The payload amount is
/// `total - primary_fee`.
pub(crate) fn send_transfer(
    deps: DepsMut,
    env: &Env,
    config: &Config,
    funding: Funding,
    transfer: OutboundTransfer,
) -> Result<(Vec<CosmosMsg>, Event), ContractError> {
    check_route(
        config,
        &transfer.destination_chain_id,
        &transfer.destination_bridge_address,
    )?;
    if transfer.recipient.is_empty() {
        return Err(ContractError::InvalidRecipient);
    }
    if transfer.secondary_destination.is_none() && !transfer.secondary_fee_amount.is_zero() {
        return Err(ContractError::UnexpectedSecondaryFee);
    }
    let fees = transfer
        .primary_fee_amount
        .checked_add(transfer.secondary_fee_amount)
        .map_err(StdError::from)?;
    if transfer.total_amount <= fees {
        return Err(ContractError::InsufficientTotalAmount {
            total: transfer.total_amount,
            fees,
        });
    }
    let amount = transfer.total_amount - transfer.primary_fee_amount;

    let token = deps.api.addr_validate(&transfer.token)?;
    let mut messages = vec![];
    if let Funding::Caller(payer) = funding {
        messages.push(pull_from(&deps, env, &token, payer, transfer.total_amount)?);
    }

    let (native_chain_id, native_bridge, native_asset) =
        match WRAPPED_TOKENS.may_load(deps.storage, &token)? {
            Some(wrapped) => {
                if transfer.destination_chain_id != wrapped.native_chain_id
                    || transfer.destination_bridge_address != wrapped.native_bridge
                {
                    return Err(ContractError::InvalidWrappedTokenDestination {
                        native_chain_id: wrapped.native_chain_id,
                        native_bridge: wrapped.native_bridge,
                    });
                }
                messages.push(cw20_msg(&token, &Cw20ExecuteMsg::Burn { amount })?);
                (
                    wrapped.native_chain_id,
                    wrapped.native_bridge,
                    wrapped.native_asset,
                )
            }
            None => {
                if transfer.secondary_destination.is_some() {
                    return Err(ContractError::InvalidSecondaryDestination);
                }
                let route = (
                    transfer.destination_chain_id.as_str(),
                    transfer.destination_bridge_address.as_str(),
                    &token,
                );
                if !SUBMITTED_BRIDGE_TOKEN_CREATIONS.has(deps.storage, route) {
                    return Err(ContractError::TokenNotExported {
                        token: token.to_string(),
                        destination_chain_id: transfer.destination_chain_id.clone(),
                        destination_bridge: transfer.destination_bridge_address.clone(),
                    });
                }
                let bridged = BRIDGED_BALANCES
                    .may_load(deps.storage, route)?
                    .unwrap_or_default();
                BRIDGED_BALANCES.save(deps.storage, route, &(bridged + amount))?;
                (
                    config.blockchain_id.clone(),
                    env.contract.address.to_string(),
                    token.to_string(),
                )
            }
        };

    let teleporter = latest_teleporter(&deps.querier, &config.registry)?;
    let mut fee_info = TeleporterFeeInfo::none();
    if !transfer.primary_fee_amount.is_zero() {
        messages.push(cw20_msg(
            &token,
            &Cw20ExecuteMsg::IncreaseAllowance {
                spender: teleporter.to_string(),
                amount: transfer.primary_fee_amount,
                expires: None,
            },
        )?);
        fee_info = TeleporterFeeInfo::new(token.as_str(), transfer.primary_fee_amount);
    }

    let payload = BridgeAction::BridgeTransfer(BridgeTransfer {
        native_chain_id,
        native_bridge,
        native_asset,
        recipient: transfer.recipient.clone(),
        amount,
        secondary_fee: transfer.secondary_fee_amount,
        secondary_destination: transfer.secondary_destination.clone(),
    });
    messages.push(teleporter_send(
        &teleporter,
        TeleporterMessageInput {
            destination_chain_id: transfer.destination_chain_id.clone(),
            destination_address: transfer.destination_bridge_address.clone(),
            fee_info,
            required_gas_limit: TRANSFER_BRIDGE_TOKENS_REQUIRED_GAS,
            allowed_relayer_addresses: vec![],
            message: payload.to_binary(),
        },
    )?);

    let mut event = Event::new(BRIDGE_TOKENS)
        .add_attribute("token", token.as_str())
        .add_attribute("destination_chain_id", &transfer.destination_chain_id)
        .add_attribute(
            "destination_bridge_address",
            &transfer.destination_bridge_address,
        )
        .add_attribute("recipient", &transfer.recipient)
        .add_attribute("amount", amount)
        .add_attribute("primary_fee_amount", transfer.primary_fee_amount)
        .add_attribute("secondary_fee_amount", transfer.secondary_fee_amount);
    if let Some(hop) = &transfer.secondary_destination {
        event = event.add_attribute("secondary_destination_chain_id", &hop.chain_id);
    }

    Ok((messages, event))
}

// ============================================================================
// Helpers
// ============================================================================

fn check_route(
    config: &Config,
    destination_chain_id: &str,
    destination_bridge_address: &str,
) -> Result<(), ContractError> {
    if destination_chain_id == config.blockchain_id {
        return Err(ContractError::CannotBridgeToSameChain);
    }
    if destination_bridge_address.is_empty() {
        return Err(ContractError::InvalidBridgeAddress);
    }
    Ok(())
}

/// `TransferFrom` of `amount` into the bridge, after checking the allowance.
fn pull_from(
    deps: &DepsMut,
    env: &Env,
    token: &Addr,
    owner: &Addr,
    amount: Uint128,
) -> Result<CosmosMsg, ContractError> {
    let available = spendable_allowance(
        &deps.querier,
        token,
        owner,
        &env.contract.address,
        &env.block,
    )?;
    if available < amount {
        return Err(ContractError::InsufficientAllowance {
            required: amount,
            available,
        });
    }

    Ok(cw20_msg(
        token,
        &Cw20ExecuteMsg::TransferFrom {
            owner: owner.to_string(),
            recipient: env.contract.address.to_string(),
            amount,
        },
    )?)
}

fn teleporter_send(
    teleporter: &Addr,
    input: TeleporterMessageInput,
) -> Result<CosmosMsg, ContractError> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: teleporter.to_string(),
        msg: to_json_binary(&teleporter::msg::ExecuteMsg::SendCrossChainMessage(input))?,
        funds: vec![],
    }))
}
