//! Teleporter registry entry points

use cosmwasm_std::{
    entry_point, to_json_binary, Api, Binary, Deps, DepsMut, Env, MessageInfo, Order, Response,
    StdError, StdResult, Storage,
};
use cw2::set_contract_version;
use cw_storage_plus::Bound;

use crate::error::ContractError;
use crate::msg::{
    ConfigResponse, EntriesResponse, ExecuteMsg, InstantiateMsg, LatestVersionResponse,
    MigrateMsg, ProtocolAddressResponse, ProtocolRegistryEntry, QueryMsg,
    VersionFromAddressResponse,
};
use crate::state::{
    Config, ADDRESS_TO_VERSION, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, LATEST_VERSION,
    MAX_VERSION_INCREMENT, VERSION_TO_ADDRESS,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    CONFIG.save(deps.storage, &Config { admin })?;
    LATEST_VERSION.save(deps.storage, &0)?;

    for entry in &msg.initial_entries {
        add_entry(deps.storage, deps.api, entry)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("initial_entries", msg.initial_entries.len().to_string())
        .add_attribute(
            "latest_version",
            LATEST_VERSION.load(deps.storage)?.to_string(),
        ))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::AddProtocolVersion { entry } => execute_add_protocol_version(deps, info, entry),
    }
}

fn execute_add_protocol_version(
    deps: DepsMut,
    info: MessageInfo,
    entry: ProtocolRegistryEntry,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }

    add_entry(deps.storage, deps.api, &entry)?;

    Ok(Response::new()
        .add_attribute("method", "add_protocol_version")
        .add_attribute("version", entry.version.to_string())
        .add_attribute("protocol_address", entry.protocol_address))
}

/// Validate and append one entry. All checks run before any write.
fn add_entry(
    storage: &mut dyn Storage,
    api: &dyn Api,
    entry: &ProtocolRegistryEntry,
) -> Result<(), ContractError> {
    if entry.version == 0 {
        return Err(ContractError::VersionZero);
    }

    let latest = LATEST_VERSION.load(storage)?;
    if entry.version <= latest {
        return Err(ContractError::VersionNotMonotonic {
            version: entry.version,
            latest,
        });
    }
    if entry.version - latest > MAX_VERSION_INCREMENT {
        return Err(ContractError::VersionIncrementTooLarge {
            version: entry.version,
            latest,
            max: MAX_VERSION_INCREMENT,
        });
    }

    let address = api.addr_validate(&entry.protocol_address)?;
    if let Some(version) = ADDRESS_TO_VERSION.may_load(storage, &address)? {
        return Err(ContractError::AddressAlreadyRegistered {
            address: address.to_string(),
            version,
        });
    }

    VERSION_TO_ADDRESS.save(storage, entry.version, &address)?;
    ADDRESS_TO_VERSION.save(storage, &address, &entry.version)?;
    LATEST_VERSION.save(storage, &entry.version)?;
    Ok(())
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetAddressFromVersion { version } => {
            to_json_binary(&query_address_from_version(deps, version)?)
        }
        QueryMsg::GetLatestAddress {} => to_json_binary(&query_latest_address(deps)?),
        QueryMsg::LatestVersion {} => to_json_binary(&LatestVersionResponse {
            version: LATEST_VERSION.load(deps.storage)?,
        }),
        QueryMsg::GetVersionFromAddress { address } => {
            to_json_binary(&query_version_from_address(deps, address)?)
        }
        QueryMsg::Entries { start_after, limit } => {
            to_json_binary(&query_entries(deps, start_after, limit)?)
        }
        QueryMsg::Config {} => to_json_binary(&ConfigResponse {
            admin: CONFIG.load(deps.storage)?.admin,
        }),
    }
}

fn query_address_from_version(deps: Deps, version: u64) -> StdResult<ProtocolAddressResponse> {
    let protocol_address = VERSION_TO_ADDRESS
        .may_load(deps.storage, version)?
        .ok_or_else(|| {
            StdError::generic_err(ContractError::VersionNotFound { version }.to_string())
        })?;
    Ok(ProtocolAddressResponse {
        version,
        protocol_address,
    })
}

fn query_latest_address(deps: Deps) -> StdResult<ProtocolAddressResponse> {
    match LATEST_VERSION.load(deps.storage)? {
        0 => Err(StdError::generic_err(
            ContractError::NoVersionsRegistered.to_string(),
        )),
        latest => query_address_from_version(deps, latest),
    }
}

fn query_version_from_address(
    deps: Deps,
    address: String,
) -> StdResult<VersionFromAddressResponse> {
    let version = match deps.api.addr_validate(&address) {
        Ok(addr) => ADDRESS_TO_VERSION.may_load(deps.storage, &addr)?,
        Err(_) => None,
    };
    Ok(VersionFromAddressResponse { version })
}

fn query_entries(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<EntriesResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let entries = VERSION_TO_ADDRESS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            item.map(|(version, protocol_address)| ProtocolAddressResponse {
                version,
                protocol_address,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(EntriesResponse { entries })
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
