//! Teleporter E2E - in-process multi-chain network
//!
//! Every chain is a `cw-multi-test` app wrapped in [`LocalChain`], which
//! implements the relayer's chain client. Deployment, user transactions and
//! relaying all go through that client, so the scenarios in `tests/` exercise
//! the same submit, confirm and relay path a live deployment would.

pub mod local_chain;
pub mod network;
pub mod receiver;

pub use local_chain::LocalChain;
pub use network::{
    local_confirmation, local_relayer_config, ChainDeployment, LocalNetwork, CHAIN_A, CHAIN_B,
    CHAIN_C, DEPLOYER, E18, INITIAL_BALANCE, USER,
};

use tracing_subscriber::EnvFilter;

/// Install a test log subscriber once; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
