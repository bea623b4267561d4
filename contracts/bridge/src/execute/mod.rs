//! Execute handlers for the bridge contract.
//!
//! - `outgoing` - token registration and transfers leaving this chain
//! - `incoming` - Teleporter deliveries and the wrapped token reply
//! - `admin` - pause, unpause and teleporter version management

mod admin;
mod incoming;
mod outgoing;

pub use admin::*;
pub use incoming::*;
pub use outgoing::*;

use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, StdResult, WasmMsg};
use cw20::Cw20ExecuteMsg;

fn cw20_msg(token: &Addr, msg: &Cw20ExecuteMsg) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(msg)?,
        funds: vec![],
    }))
}
