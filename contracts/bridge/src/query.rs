//! Query handlers for the bridge contract.

use cosmwasm_std::{Deps, StdResult};

use crate::msg::{
    BridgedBalanceResponse, ConfigResponse, DenomTraceResponse, NativeToWrappedTokenResponse,
    SubmittedBridgeTokenCreationResponse, WrappedTokenInfoResponse,
};
use crate::state::{
    BRIDGED_BALANCES, CONFIG, NATIVE_TO_WRAPPED, SUBMITTED_BRIDGE_TOKEN_CREATIONS, WRAPPED_TOKENS,
};

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        registry: config.registry,
        min_teleporter_version: config.min_teleporter_version,
        bridge_token_code_id: config.bridge_token_code_id,
        variant: config.variant,
        blockchain_id: config.blockchain_id,
        paused: config.paused,
    })
}

pub fn query_native_to_wrapped_token(
    deps: Deps,
    native_chain_id: String,
    native_bridge: String,
    native_asset: String,
) -> StdResult<NativeToWrappedTokenResponse> {
    let token = NATIVE_TO_WRAPPED.may_load(
        deps.storage,
        (
            native_chain_id.as_str(),
            native_bridge.as_str(),
            native_asset.as_str(),
        ),
    )?;
    Ok(NativeToWrappedTokenResponse { token })
}

pub fn query_wrapped_token_info(deps: Deps, token: String) -> StdResult<WrappedTokenInfoResponse> {
    let token = deps.api.addr_validate(&token)?;
    Ok(WrappedTokenInfoResponse {
        info: WRAPPED_TOKENS.may_load(deps.storage, &token)?,
    })
}

pub fn query_bridged_balance(
    deps: Deps,
    destination_chain_id: String,
    destination_bridge_address: String,
    token: String,
) -> StdResult<BridgedBalanceResponse> {
    let token = deps.api.addr_validate(&token)?;
    let amount = BRIDGED_BALANCES
        .may_load(
            deps.storage,
            (
                destination_chain_id.as_str(),
                destination_bridge_address.as_str(),
                &token,
            ),
        )?
        .unwrap_or_default();
    Ok(BridgedBalanceResponse { amount })
}

pub fn query_submitted_bridge_token_creation(
    deps: Deps,
    destination_chain_id: String,
    destination_bridge_address: String,
    token: String,
) -> StdResult<SubmittedBridgeTokenCreationResponse> {
    let token = deps.api.addr_validate(&token)?;
    let submitted = SUBMITTED_BRIDGE_TOKEN_CREATIONS.has(
        deps.storage,
        (
            destination_chain_id.as_str(),
            destination_bridge_address.as_str(),
            &token,
        ),
    );
    Ok(SubmittedBridgeTokenCreationResponse { submitted })
}

pub fn query_denom_trace(deps: Deps, token: String) -> StdResult<DenomTraceResponse> {
    let token = deps.api.addr_validate(&token)?;
    let denom_trace = WRAPPED_TOKENS
        .may_load(deps.storage, &token)?
        .and_then(|info| info.denom_trace);
    Ok(DenomTraceResponse { denom_trace })
}
