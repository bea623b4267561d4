//! Teleporter Registry - Versioned Teleporter Deployments
//!
//! Maps strictly increasing version numbers to Teleporter contract addresses
//! on this chain. Applications resolve the latest version to send and accept
//! deliveries from any registered version at or above their minimum.
//!
//! The registry is append-only: entries are never changed or removed.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
