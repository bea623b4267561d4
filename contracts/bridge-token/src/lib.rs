//! Bridge Token - Wrapped CW20 for the Teleporter token bridge
//!
//! A bridge contract instantiates one of these per native asset it receives
//! from another chain. The token is a standard CW20 ledger whose native
//! binding is fixed at instantiation, and only the instantiating bridge may
//! mint or burn.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
pub use crate::state::NativeBinding;
