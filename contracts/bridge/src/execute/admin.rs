//! Admin operations handlers.
//!
//! This module handles:
//! - Pause/unpause of outbound transfers
//! - Raising the minimum accepted teleporter version

use cosmwasm_std::{DepsMut, MessageInfo, Response};

use crate::error::ContractError;
use crate::registry::latest_version;
use crate::state::CONFIG;

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause the bridge (stops outbound transfers; deliveries are still processed).
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }

    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "pause"))
}

/// Unpause the bridge (resumes outbound transfers).
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }

    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "unpause"))
}

// ============================================================================
// Teleporter Version
// ============================================================================

/// Stop accepting deliveries from teleporters below `version`.
///
/// The minimum only moves up and never past the registry's latest version.
pub fn execute_update_min_teleporter_version(
    deps: DepsMut,
    info: MessageInfo,
    version: u64,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }

    let latest = latest_version(&deps.querier, &config.registry)?;
    if version <= config.min_teleporter_version || version > latest {
        return Err(ContractError::InvalidMinTeleporterVersion {
            version,
            current: config.min_teleporter_version,
            latest,
        });
    }

    let previous = config.min_teleporter_version;
    config.min_teleporter_version = version;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "update_min_teleporter_version")
        .add_attribute("old_version", previous.to_string())
        .add_attribute("new_version", version.to_string()))
}
