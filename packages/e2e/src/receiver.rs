//! Message log application
//!
//! A minimal Teleporter application that records every message its teleporter
//! delivers. A payload of [`REJECTED_PAYLOAD`] makes execution fail, so tests
//! can observe isolated execution failures.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response, StdError,
    StdResult,
};
use cw_multi_test::{Contract, ContractWrapper};
use cw_storage_plus::Item;

use common::TeleporterReceiverMsg;

pub const REJECTED_PAYLOAD: &[u8] = b"reject";

#[cw_serde]
pub struct InstantiateMsg {
    pub teleporter: String,
}

#[cw_serde]
pub enum QueryMsg {
    Received {},
}

#[cw_serde]
pub struct ReceivedMessage {
    pub source_chain_id: String,
    pub origin_sender: String,
    pub message: Binary,
}

#[cw_serde]
pub struct ReceivedResponse {
    pub messages: Vec<ReceivedMessage>,
}

const TELEPORTER: Item<Addr> = Item::new("teleporter");
const RECEIVED: Item<Vec<ReceivedMessage>> = Item::new("received");

pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> StdResult<Response> {
    let teleporter = deps.api.addr_validate(&msg.teleporter)?;
    TELEPORTER.save(deps.storage, &teleporter)?;
    RECEIVED.save(deps.storage, &vec![])?;
    Ok(Response::new().add_attribute("method", "instantiate"))
}

pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: TeleporterReceiverMsg,
) -> StdResult<Response> {
    let TeleporterReceiverMsg::ReceiveTeleporterMessage {
        source_chain_id,
        origin_sender,
        message,
    } = msg;

    if info.sender != TELEPORTER.load(deps.storage)? {
        return Err(StdError::generic_err("Unauthorized teleporter"));
    }
    if message.as_slice() == REJECTED_PAYLOAD {
        return Err(StdError::generic_err("Message rejected by receiver"));
    }

    let mut received = RECEIVED.load(deps.storage)?;
    received.push(ReceivedMessage {
        source_chain_id: source_chain_id.clone(),
        origin_sender,
        message,
    });
    RECEIVED.save(deps.storage, &received)?;

    Ok(Response::new()
        .add_attribute("method", "receive_teleporter_message")
        .add_attribute("source_chain_id", source_chain_id)
        .add_attribute("received_count", received.len().to_string()))
}

pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Received {} => to_json_binary(&ReceivedResponse {
            messages: RECEIVED.load(deps.storage)?,
        }),
    }
}

pub fn contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(execute, instantiate, query))
}
