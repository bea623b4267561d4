//! Message types for the Teleporter registry

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;

/// One registry entry as supplied by the admin.
#[cw_serde]
pub struct ProtocolRegistryEntry {
    pub version: u64,
    pub protocol_address: String,
}

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String,
    /// Registered in order with the same checks as `AddProtocolVersion`
    pub initial_entries: Vec<ProtocolRegistryEntry>,
}

#[cw_serde]
pub enum ExecuteMsg {
    AddProtocolVersion { entry: ProtocolRegistryEntry },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ProtocolAddressResponse)]
    GetAddressFromVersion { version: u64 },

    #[returns(ProtocolAddressResponse)]
    GetLatestAddress {},

    #[returns(LatestVersionResponse)]
    LatestVersion {},

    #[returns(VersionFromAddressResponse)]
    GetVersionFromAddress { address: String },

    #[returns(EntriesResponse)]
    Entries {
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    #[returns(ConfigResponse)]
    Config {},
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct ProtocolAddressResponse {
    pub version: u64,
    pub protocol_address: Addr,
}

#[cw_serde]
pub struct LatestVersionResponse {
    /// 0 while no version is registered
    pub version: u64,
}

#[cw_serde]
pub struct VersionFromAddressResponse {
    pub version: Option<u64>,
}

#[cw_serde]
pub struct EntriesResponse {
    pub entries: Vec<ProtocolAddressResponse>,
}

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
}
