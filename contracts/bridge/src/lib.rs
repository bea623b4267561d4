//! Teleporter Token Bridge - CW20 bridging on top of Teleporter messaging
//!
//! Each chain runs one bridge. A CW20 native to this chain is locked here and
//! represented elsewhere by a `bridge-token` minted by the remote bridge.
//!
//! # Registration
//! 1. `SubmitCreateBridgeToken` sends a `CreateBridgeToken` payload to a remote bridge
//! 2. The remote bridge instantiates a wrapped token bound to (chain, bridge, asset)
//!
//! # Transfers
//! - Native token out: locked here, bridged balance of the route grows
//! - Wrapped token out: burned here, only towards its native chain
//! - Native token in: bridged balance of the route shrinks, tokens released
//! - Wrapped token in: minted to the recipient
//!
//! A transfer carrying a secondary destination is forwarded one more hop by
//! the receiving bridge, which pays the secondary fee as that hop's fee.
//!
//! # Variants
//! - `Native` - plain CW20 bridge
//! - `Ics20` - also records an ICS-20 denom trace for wrapped tokens and emits
//!   `fungible_token_packet` events

pub mod contract;
pub mod error;
mod execute;
pub mod msg;
mod query;
mod registry;
pub mod state;

pub use crate::error::ContractError;
