//! Error types for the Teleporter contract

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Send Errors
    // ========================================================================

    #[error("Invalid destination chain: {chain_id}")]
    InvalidDestinationChain { chain_id: String },

    #[error("Invalid fee asset: {token}")]
    InvalidFeeAsset { token: String },

    #[error("Insufficient allowance: required {required}, available {available}")]
    InsufficientAllowance {
        required: Uint128,
        available: Uint128,
    },

    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount,

    // ========================================================================
    // Fee Top-Up Errors
    // ========================================================================

    #[error("Message not found: {message_id}")]
    MessageNotFound { message_id: u64 },

    #[error("Fee for message {message_id} was already credited to a relayer")]
    FeeAlreadyCredited { message_id: u64 },

    #[error("Fee token mismatch: message pays in {expected}, got {got}")]
    FeeTokenMismatch { expected: String, got: String },

    // ========================================================================
    // Receive Errors
    // ========================================================================

    #[error("Invalid source chain: {chain_id}")]
    InvalidSourceChain { chain_id: String },

    #[error("Invalid message proof for message {message_id} from {source_chain_id}")]
    InvalidMessageProof {
        source_chain_id: String,
        message_id: u64,
    },

    #[error("Unauthorized relayer: {relayer}")]
    UnauthorizedRelayer { relayer: String },

    #[error("Invalid relayer reward address")]
    InvalidRewardAddress,

    #[error("Message {message_id} from {source_chain_id} has not been delivered")]
    MessageNotDelivered {
        source_chain_id: String,
        message_id: u64,
    },

    // ========================================================================
    // Reward Errors
    // ========================================================================

    #[error("Nothing to redeem for fee asset {fee_asset}")]
    NothingToRedeem { fee_asset: String },

    // ========================================================================
    // Reply Errors
    // ========================================================================

    #[error("Unknown reply id: {id}")]
    UnknownReplyId { id: u64 },
}
