//! State definitions for the bridge token contract
//!
//! Balances, allowances and token info live in `cw20-base` storage.

use cosmwasm_schema::cw_serde;
use cw_storage_plus::Item;

pub const CONTRACT_NAME: &str = "crates.io:bridge-token";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Origin of the wrapped asset; written once at instantiation.
#[cw_serde]
pub struct NativeBinding {
    pub native_chain_id: String,
    /// Bridge contract on the native chain
    pub native_bridge: String,
    /// Asset contract on the native chain
    pub native_asset: String,
}

pub const NATIVE_BINDING: Item<NativeBinding> = Item::new("native_binding");
