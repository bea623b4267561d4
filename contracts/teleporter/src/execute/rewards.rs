//! Relayer reward redemption.

use cosmwasm_std::{to_json_binary, CosmosMsg, DepsMut, Event, MessageInfo, Response, WasmMsg};
use cw20::Cw20ExecuteMsg;

use common::events::{ATTR_AMOUNT, ATTR_FEE_ASSET, ATTR_REDEEMER, RELAYER_REWARDS_REDEEMED};

use crate::error::ContractError;
use crate::state::{FEE_TOTALS, RELAYER_REWARDS};

/// Pay out the caller's whole balance of `fee_asset`.
pub fn execute_redeem_relayer_rewards(
    deps: DepsMut,
    info: MessageInfo,
    fee_asset: String,
) -> Result<Response, ContractError> {
    let fee_asset = deps.api.addr_validate(&fee_asset)?;
    let key = (&info.sender, &fee_asset);

    let amount = RELAYER_REWARDS
        .may_load(deps.storage, key)?
        .unwrap_or_default();
    if amount.is_zero() {
        return Err(ContractError::NothingToRedeem {
            fee_asset: fee_asset.to_string(),
        });
    }
    RELAYER_REWARDS.remove(deps.storage, key);

    let mut totals = FEE_TOTALS
        .may_load(deps.storage, &fee_asset)?
        .unwrap_or_default();
    totals.redeemed += amount;
    FEE_TOTALS.save(deps.storage, &fee_asset, &totals)?;

    let transfer = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: fee_asset.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
            recipient: info.sender.to_string(),
            amount,
        })?,
        funds: vec![],
    });

    let event = Event::new(RELAYER_REWARDS_REDEEMED)
        .add_attribute(ATTR_REDEEMER, info.sender.as_str())
        .add_attribute(ATTR_FEE_ASSET, fee_asset.as_str())
        .add_attribute(ATTR_AMOUNT, amount.to_string());

    Ok(Response::new()
        .add_message(transfer)
        .add_event(event)
        .add_attribute("method", "redeem_relayer_rewards")
        .add_attribute("redeemer", info.sender)
        .add_attribute("amount", amount))
}
