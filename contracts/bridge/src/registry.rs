//! Teleporter resolution through the registry.

use cosmwasm_std::{Addr, QuerierWrapper, StdResult};
use teleporter_registry::msg::{
    LatestVersionResponse, ProtocolAddressResponse, QueryMsg as RegistryQueryMsg,
    VersionFromAddressResponse,
};

/// Teleporter used for outbound messages.
pub fn latest_teleporter(querier: &QuerierWrapper, registry: &Addr) -> StdResult<Addr> {
    let res: ProtocolAddressResponse =
        querier.query_wasm_smart(registry, &RegistryQueryMsg::GetLatestAddress {})?;
    Ok(res.protocol_address)
}

pub fn latest_version(querier: &QuerierWrapper, registry: &Addr) -> StdResult<u64> {
    let res: LatestVersionResponse =
        querier.query_wasm_smart(registry, &RegistryQueryMsg::LatestVersion {})?;
    Ok(res.version)
}

/// Registry version of `address`, if it is a registered teleporter.
pub fn teleporter_version(
    querier: &QuerierWrapper,
    registry: &Addr,
    address: &Addr,
) -> StdResult<Option<u64>> {
    let res: VersionFromAddressResponse = querier.query_wasm_smart(
        registry,
        &RegistryQueryMsg::GetVersionFromAddress {
            address: address.to_string(),
        },
    )?;
    Ok(res.version)
}
