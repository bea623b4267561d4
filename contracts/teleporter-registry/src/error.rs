//! Error types for the Teleporter registry

use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Protocol version must be at least 1")]
    VersionZero,

    #[error("Version not monotonic: {version} is not above latest version {latest}")]
    VersionNotMonotonic { version: u64, latest: u64 },

    #[error("Version increment too large: {version} exceeds latest {latest} by more than {max}")]
    VersionIncrementTooLarge { version: u64, latest: u64, max: u64 },

    #[error("Address already registered as version {version}: {address}")]
    AddressAlreadyRegistered { address: String, version: u64 },

    #[error("Version not found: {version}")]
    VersionNotFound { version: u64 },

    #[error("Registry is empty")]
    NoVersionsRegistered,
}
