//! Error types for the bridge contract

use common::PayloadError;
use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Invalid bridge payload: {0}")]
    Payload(#[from] PayloadError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================
    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized teleporter: {teleporter}")]
    UnauthorizedTeleporter { teleporter: String },

    #[error("Invalid minimum teleporter version {version}: current {current}, latest {latest}")]
    InvalidMinTeleporterVersion { version: u64, current: u64, latest: u64 },

    #[error("Minimum teleporter version {version} is above the latest registered version {latest}")]
    MinTeleporterVersionAboveLatest { version: u64, latest: u64 },

    // ========================================================================
    // Bridge State Errors
    // ========================================================================
    #[error("Bridge is paused")]
    BridgePaused,

    #[error("Invalid ICS-20 channel: must not be empty")]
    InvalidChannel,

    // ========================================================================
    // Outbound Errors
    // ========================================================================
    #[error("Cannot bridge to the same chain")]
    CannotBridgeToSameChain,

    #[error("Invalid bridge address: must not be empty")]
    InvalidBridgeAddress,

    #[error("Invalid recipient: must not be empty")]
    InvalidRecipient,

    #[error("Insufficient total amount: {total} does not cover fees of {fees}")]
    InsufficientTotalAmount { total: Uint128, fees: Uint128 },

    #[error("Secondary fee given without a secondary destination")]
    UnexpectedSecondaryFee,

    #[error("Native tokens cannot carry a secondary destination")]
    InvalidSecondaryDestination,

    #[error("Token {token} has not been exported to {destination_bridge} on {destination_chain_id}")]
    TokenNotExported {
        token: String,
        destination_chain_id: String,
        destination_bridge: String,
    },

    #[error("Cannot export wrapped token {token}")]
    CannotExportWrappedToken { token: String },

    #[error("Wrapped token can only be bridged to its native bridge {native_bridge} on {native_chain_id}")]
    InvalidWrappedTokenDestination {
        native_chain_id: String,
        native_bridge: String,
    },

    #[error("Insufficient allowance: required {required}, available {available}")]
    InsufficientAllowance {
        required: Uint128,
        available: Uint128,
    },

    // ========================================================================
    // Inbound Errors
    // ========================================================================
    #[error("Invalid transfer origin: {origin_sender} on {source_chain_id}")]
    InvalidTransferOrigin {
        source_chain_id: String,
        origin_sender: String,
    },

    #[error("Invalid destination bridge: {address}")]
    InvalidDestinationBridge { address: String },

    #[error("Insufficient bridged balance: available {available}, required {required}")]
    InsufficientBridgedBalance {
        available: Uint128,
        required: Uint128,
    },

    #[error("Unregistered asset {native_asset} of bridge {native_bridge} on {native_chain_id}")]
    UnregisteredAsset {
        native_chain_id: String,
        native_bridge: String,
        native_asset: String,
    },

    // ========================================================================
    // Reply Errors
    // ========================================================================
    #[error("Unknown reply id: {id}")]
    UnknownReplyId { id: u64 },

    #[error("Bridge token instantiation reported no contract address")]
    MissingContractAddress,
}
