//! Event and attribute names shared by the contracts and the relayer's decoder.
//!
//! Contracts emit `Event::new(NAME)`; chains surface them with a `wasm-` prefix.

/// Prefix the chain adds to custom contract events
pub const WASM_EVENT_PREFIX: &str = "wasm-";

// Teleporter events
pub const SEND_CROSS_CHAIN_MESSAGE: &str = "send_cross_chain_message";
pub const RECEIVE_CROSS_CHAIN_MESSAGE: &str = "receive_cross_chain_message";
pub const MESSAGE_EXECUTED: &str = "message_executed";
pub const MESSAGE_EXECUTION_FAILED: &str = "message_execution_failed";
pub const RECEIPT_RECEIVED: &str = "receipt_received";
pub const ADD_FEE_AMOUNT: &str = "add_fee_amount";
pub const RELAYER_REWARDS_REDEEMED: &str = "relayer_rewards_redeemed";

// Bridge events
pub const SUBMIT_CREATE_BRIDGE_TOKEN: &str = "submit_create_bridge_token";
pub const CREATE_BRIDGE_TOKEN: &str = "create_bridge_token";
pub const BRIDGE_TOKENS: &str = "bridge_tokens";
pub const MINT_BRIDGE_TOKENS: &str = "mint_bridge_tokens";
pub const WITHDRAW_TOKENS: &str = "withdraw_tokens";
pub const FUNGIBLE_TOKEN_PACKET: &str = "fungible_token_packet";

// Attribute keys
pub const ATTR_CONTRACT_ADDRESS: &str = "_contract_address";
pub const ATTR_SOURCE_CHAIN_ID: &str = "source_chain_id";
pub const ATTR_DESTINATION_CHAIN_ID: &str = "destination_chain_id";
pub const ATTR_DESTINATION_ADDRESS: &str = "destination_address";
pub const ATTR_MESSAGE_ID: &str = "message_id";
pub const ATTR_ORIGIN_SENDER: &str = "origin_sender";
pub const ATTR_FEE_TOKEN: &str = "fee_token_address";
pub const ATTR_FEE_AMOUNT: &str = "fee_amount";
pub const ATTR_REQUIRED_GAS_LIMIT: &str = "required_gas_limit";
pub const ATTR_ALLOWED_RELAYERS: &str = "allowed_relayer_addresses";
pub const ATTR_RECEIPT_COUNT: &str = "receipt_count";
pub const ATTR_MESSAGE: &str = "message";
pub const ATTR_MESSAGE_HASH: &str = "message_hash";
pub const ATTR_REWARD_REDEEMER: &str = "reward_redeemer";
pub const ATTR_DELIVERER: &str = "deliverer";
pub const ATTR_REASON: &str = "reason";
pub const ATTR_RELAYER_REWARD_ADDRESS: &str = "relayer_reward_address";
pub const ATTR_AMOUNT: &str = "amount";
pub const ATTR_REDEEMER: &str = "redeemer";
pub const ATTR_FEE_ASSET: &str = "fee_asset";

/// Separator for list-valued attributes
pub const LIST_SEPARATOR: char = ',';
