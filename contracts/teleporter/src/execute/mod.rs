//! Execute handlers for the Teleporter contract.
//!
//! - `send` - SendCrossChainMessage, SendSpecifiedReceipts, AddFeeAmount
//! - `receive` - ReceiveCrossChainMessage, receipt settlement and the execution reply
//! - `rewards` - RedeemRelayerRewards

mod receive;
mod rewards;
mod send;

pub use receive::*;
pub use rewards::*;
pub use send::*;
