//! Teleporter Relayer - Library interface
//!
//! Off-chain side of Teleporter messaging: the chain client contract, inclusion
//! polling, typed event decoding, retry with backoff, and the relayer that
//! carries messages between teleporters.

pub mod chain;
pub mod config;
pub mod confirmation;
pub mod events;
pub mod relay;
pub mod retry;

pub use chain::{
    balance_of, query, ChainClient, ChainError, PendingTx, Receipt, SignedTx, TxEvent, TxStatus,
};
pub use config::RelayerConfig;
pub use confirmation::{wait_for_inclusion, ConfirmationConfig, ConfirmationError};
pub use events::{DecodeError, TeleporterEvent};
pub use relay::{ChainEndpoint, Delivery, DeliveryStatus, RelayError, Relayer};
pub use retry::RetryConfig;
