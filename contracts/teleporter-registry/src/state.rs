//! State definitions for the Teleporter registry

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

pub const CONTRACT_NAME: &str = "crates.io:teleporter-registry";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest step allowed between consecutive versions
pub const MAX_VERSION_INCREMENT: u64 = 500;

#[cw_serde]
pub struct Config {
    pub admin: Addr,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Highest registered version (0 while empty)
pub const LATEST_VERSION: Item<u64> = Item::new("latest_version");

/// Version -> Teleporter address
pub const VERSION_TO_ADDRESS: Map<u64, Addr> = Map::new("version_to_address");

/// Teleporter address -> version
pub const ADDRESS_TO_VERSION: Map<&Addr, u64> = Map::new("address_to_version");
