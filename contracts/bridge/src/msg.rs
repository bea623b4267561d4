//! Message types for the bridge contract

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};

use common::HopDestination;

use crate::state::{BridgeVariant, WrappedTokenInfo};

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String,
    pub registry: String,
    /// Defaults to the registry's latest version
    pub min_teleporter_version: Option<u64>,
    /// Code ID of the `bridge-token` contract
    pub bridge_token_code_id: u64,
    pub variant: BridgeVariant,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // User Operations
    // ========================================================================
    /// Ask the bridge on another chain to create a wrapped version of a CW20
    /// native to this chain. The fee is pulled from the caller.
    SubmitCreateBridgeToken {
        destination_chain_id: String,
        destination_bridge_address: String,
        native_token: String,
        fee_token: String,
        fee_amount: Uint128,
    },

    /// Bridge `total_amount` of `token`. The primary fee is paid in `token`
    /// to the relayer of this hop; the recipient gets the rest minus the
    /// secondary fee when a second hop is requested.
    BridgeTokens {
        destination_chain_id: String,
        destination_bridge_address: String,
        token: String,
        recipient: String,
        total_amount: Uint128,
        primary_fee_amount: Uint128,
        secondary_fee_amount: Uint128,
        secondary_destination: Option<HopDestination>,
    },

    // ========================================================================
    // Teleporter Callback
    // ========================================================================
    ReceiveTeleporterMessage {
        source_chain_id: String,
        origin_sender: String,
        message: Binary,
    },

    // ========================================================================
    // Admin Operations
    // ========================================================================
    UpdateMinTeleporterVersion { version: u64 },
    Pause {},
    Unpause {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(NativeToWrappedTokenResponse)]
    NativeToWrappedToken {
        native_chain_id: String,
        native_bridge: String,
        native_asset: String,
    },

    #[returns(WrappedTokenInfoResponse)]
    WrappedTokenInfo { token: String },

    #[returns(BridgedBalanceResponse)]
    BridgedBalance {
        destination_chain_id: String,
        destination_bridge_address: String,
        token: String,
    },

    #[returns(SubmittedBridgeTokenCreationResponse)]
    SubmittedBridgeTokenCreation {
        destination_chain_id: String,
        destination_bridge_address: String,
        token: String,
    },

    /// ICS-20 variant only; `None` otherwise
    #[returns(DenomTraceResponse)]
    DenomTrace { token: String },
}

// ============================================================================
// Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub registry: Addr,
    pub min_teleporter_version: u64,
    pub bridge_token_code_id: u64,
    pub variant: BridgeVariant,
    pub blockchain_id: String,
    pub paused: bool,
}

#[cw_serde]
pub struct NativeToWrappedTokenResponse {
    pub token: Option<Addr>,
}

#[cw_serde]
pub struct WrappedTokenInfoResponse {
    pub info: Option<WrappedTokenInfo>,
}

#[cw_serde]
pub struct BridgedBalanceResponse {
    pub amount: Uint128,
}

#[cw_serde]
pub struct SubmittedBridgeTokenCreationResponse {
    pub submitted: bool,
}

#[cw_serde]
pub struct DenomTraceResponse {
    pub denom_trace: Option<String>,
}
