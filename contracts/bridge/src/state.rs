//! State definitions for the bridge contract

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONTRACT_NAME: &str = "crates.io:bridge";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CREATE_BRIDGE_TOKEN_REPLY_ID: u64 = 1;

/// Gas requested from relayers for a wrapped token instantiation.
pub const CREATE_BRIDGE_TOKEN_REQUIRED_GAS: u64 = 2_000_000;
/// Gas requested for a transfer, including a possible forward.
pub const TRANSFER_BRIDGE_TOKENS_REQUIRED_GAS: u64 = 300_000;

#[cw_serde]
pub enum BridgeVariant {
    Native,
    /// Wrapped tokens carry the denom trace `transfer/<channel>/<native_asset>`
    Ics20 { channel: String },
}

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    /// Teleporter registry used to resolve and authorize teleporters
    pub registry: Addr,
    /// Lowest registry version allowed to deliver messages
    pub min_teleporter_version: u64,
    pub bridge_token_code_id: u64,
    pub variant: BridgeVariant,
    pub blockchain_id: String,
    pub paused: bool,
}

/// Origin of a wrapped token minted by this bridge.
#[cw_serde]
pub struct WrappedTokenInfo {
    pub native_chain_id: String,
    pub native_bridge: String,
    pub native_asset: String,
    pub denom_trace: Option<String>,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// (destination chain, destination bridge, native token) -> exported
pub const SUBMITTED_BRIDGE_TOKEN_CREATIONS: Map<(&str, &str, &Addr), bool> =
    Map::new("submitted_creations");

/// (destination chain, destination bridge, native token) -> amount locked for that route
pub const BRIDGED_BALANCES: Map<(&str, &str, &Addr), Uint128> = Map::new("bridged_balances");

/// (native chain, native bridge, native asset) -> wrapped token
pub const NATIVE_TO_WRAPPED: Map<(&str, &str, &str), Addr> = Map::new("native_to_wrapped");

pub const WRAPPED_TOKENS: Map<&Addr, WrappedTokenInfo> = Map::new("wrapped_tokens");

/// Wrapped token awaiting its instantiate reply
pub const PENDING_WRAPPED_TOKEN: Item<WrappedTokenInfo> = Item::new("pending_wrapped_token");
