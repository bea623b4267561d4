//! Bridge token contract entry points

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;
use cw20::MinterResponse;
use cw20_base::allowances::{
    execute_burn_from, execute_decrease_allowance, execute_increase_allowance,
    execute_transfer_from, query_allowance,
};
use cw20_base::contract::{
    execute_burn, execute_mint, execute_send, execute_transfer, query_balance, query_minter,
    query_token_info,
};
use cw20_base::enumerable::query_all_accounts;

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::state::{NativeBinding, CONTRACT_NAME, CONTRACT_VERSION, NATIVE_BINDING};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    for (field, value) in [
        ("native_chain_id", &msg.native_chain_id),
        ("native_bridge", &msg.native_bridge),
        ("native_asset", &msg.native_asset),
    ] {
        if value.is_empty() {
            return Err(ContractError::EmptyBindingField {
                field: field.to_string(),
            });
        }
    }

    cw20_base::contract::instantiate(
        deps.branch(),
        env,
        info.clone(),
        cw20_base::msg::InstantiateMsg {
            name: msg.name,
            symbol: msg.symbol,
            decimals: msg.decimals,
            initial_balances: vec![],
            mint: Some(MinterResponse {
                minter: info.sender.to_string(),
                cap: None,
            }),
            marketing: None,
        },
    )?;
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let binding = NativeBinding {
        native_chain_id: msg.native_chain_id,
        native_bridge: msg.native_bridge,
        native_asset: msg.native_asset,
    };
    NATIVE_BINDING.save(deps.storage, &binding)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("minter", info.sender)
        .add_attribute("native_chain_id", binding.native_chain_id)
        .add_attribute("native_bridge", binding.native_bridge)
        .add_attribute("native_asset", binding.native_asset))
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
    let response = match msg {
        ExecuteMsg::Transfer { recipient, amount } => {
            execute_transfer(deps, env, info, recipient, amount)?
        }
        ExecuteMsg::Send {
            contract,
            amount,
            msg,
        } => execute_send(deps, env, info, contract, amount, msg)?,
        ExecuteMsg::IncreaseAllowance {
            spender,
            amount,
            expires,
        } => execute_increase_allowance(deps, env, info, spender, amount, expires)?,
        ExecuteMsg::DecreaseAllowance {
            spender,
            amount,
            expires,
        } => execute_decrease_allowance(deps, env, info, spender, amount, expires)?,
        ExecuteMsg::TransferFrom {
            owner,
            recipient,
            amount,
        } => execute_transfer_from(deps, env, info, owner, recipient, amount)?,
        ExecuteMsg::Mint { recipient, amount } => {
            execute_mint(deps, env, info, recipient, amount)?
        }
        ExecuteMsg::Burn { amount } => {
            ensure_minter(deps.as_ref(), &info)?;
            execute_burn(deps, env, info, amount)?
        }
        ExecuteMsg::BurnFrom { owner, amount } => {
            ensure_minter(deps.as_ref(), &info)?;
            execute_burn_from(deps, env, info, owner, amount)?
        }
    };
    Ok(response)
}

/// Only the minter (the owning bridge) may burn.
fn ensure_minter(deps: Deps, info: &MessageInfo) -> Result<(), ContractError> {
    match query_minter(deps)? {
        Some(minter) if minter.minter == info.sender.as_str() => Ok(()),
        _ => Err(ContractError::Unauthorized),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Balance { address } => to_json_binary(&query_balance(deps, address)?),
        QueryMsg::TokenInfo {} => to_json_binary(&query_token_info(deps)?),
        QueryMsg::Allowance { owner, spender } => {
            to_json_binary(&query_allowance(deps, owner, spender)?)
        }
        QueryMsg::Minter {} => to_json_binary(&query_minter(deps)?),
        QueryMsg::AllAccounts { start_after, limit } => {
            to_json_binary(&query_all_accounts(deps, start_after, limit)?)
        }
        QueryMsg::NativeBinding {} => to_json_binary(&NATIVE_BINDING.load(deps.storage)?),
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
