//! Bridge Contract - Entry Points
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
    execute_bridge_tokens, execute_pause, execute_receive_teleporter_message,
    execute_submit_create_bridge_token, execute_unpause, execute_update_min_teleporter_version,
    handle_create_bridge_token_reply, OutboundTransfer,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_bridged_balance, query_config, query_denom_trace, query_native_to_wrapped_token,
    query_submitted_bridge_token_creation, query_wrapped_token_info,
};
use crate::registry::latest_version;
use crate::state::{
    BridgeVariant, Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, CREATE_BRIDGE_TOKEN_REPLY_ID,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let registry = deps.api.addr_validate(&msg.registry)?;

    let latest = latest_version(&deps.querier, &registry)?;
    let min_teleporter_version = msg.min_teleporter_version.unwrap_or(latest);
    if min_teleporter_version > latest {
        return Err(ContractError::MinTeleporterVersionAboveLatest {
            version: min_teleporter_version,
            latest,
        });
    }

    if let BridgeVariant::Ics20 { channel } = &msg.variant {
        if channel.is_empty() {
            return Err(ContractError::InvalidChannel);
        }
    }

    let config = Config {
        admin,
        registry,
        min_teleporter_version,
        bridge_token_code_id: msg.bridge_token_code_id,
        variant: msg.variant,
        blockchain_id: env.block.chain_id,
        paused: false,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin.as_str())
        .add_attribute("blockchain_id", config.blockchain_id)
        .add_attribute(
            "min_teleporter_version",
            config.min_teleporter_version.to_string(),
        ))
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
        // User operations
        ExecuteMsg::SubmitCreateBridgeToken {
            destination_chain_id,
            destination_bridge_address,
            native_token,
            fee_token,
            fee_amount,
        } => execute_submit_create_bridge_token(
            deps,
            env,
            info,
            destination_chain_id,
            destination_bridge_address,
            native_token,
            fee_token,
            fee_amount,
        ),
        ExecuteMsg::BridgeTokens {
            destination_chain_id,
            destination_bridge_address,
            token,
            recipient,
            total_amount,
            primary_fee_amount,
            secondary_fee_amount,
            secondary_destination,
        } => execute_bridge_tokens(
            deps,
            env,
            info,
            OutboundTransfer {
                destination_chain_id,
                destination_bridge_address,
                token,
                recipient,
                total_amount,
                primary_fee_amount,
                secondary_fee_amount,
                secondary_destination,
            },
        ),

        // Teleporter callback
        ExecuteMsg::ReceiveTeleporterMessage {
            source_chain_id,
            origin_sender,
            message,
        } => execute_receive_teleporter_message(
            deps,
            env,
            info,
            source_chain_id,
            origin_sender,
            message,
        ),

        // Admin operations
        ExecuteMsg::UpdateMinTeleporterVersion { version } => {
            execute_update_min_teleporter_version(deps, info, version)
        }
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
    }
}

// ============================================================================
// Reply
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        CREATE_BRIDGE_TOKEN_REPLY_ID => handle_create_bridge_token_reply(deps, msg),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::NativeToWrappedToken {
            native_chain_id,
            native_bridge,
            native_asset,
        } => to_json_binary(&query_native_to_wrapped_token(
            deps,
            native_chain_id,
            native_bridge,
            native_asset,
        )?),
        QueryMsg::WrappedTokenInfo { token } => {
            to_json_binary(&query_wrapped_token_info(deps, token)?)
        }
        QueryMsg::BridgedBalance {
            destination_chain_id,
            destination_bridge_address,
            token,
        } => to_json_binary(&query_bridged_balance(
            deps,
            destination_chain_id,
            destination_bridge_address,
            token,
        )?),
        QueryMsg::SubmittedBridgeTokenCreation {
            destination_chain_id,
            destination_bridge_address,
            token,
        } => to_json_binary(&query_submitted_bridge_token_creation(
            deps,
            destination_chain_id,
            destination_bridge_address,
            token,
        )?),
        QueryMsg::DenomTrace { token } => to_json_binary(&query_denom_trace(deps, token)?),
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
