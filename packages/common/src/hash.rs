//! Message commitment hashing
//!
//! The destination teleporter recomputes this commitment to bind the
//! delivered message to the bytes the source teleporter stored.
//!
//! # Byte Layout
//! Every variable-length field is a 4-byte big-endian length followed by its
//! bytes; integers are big-endian.
//! - source_chain_id (string)
//! - message_id (u64)
//! - origin_sender, destination_chain_id, destination_address (strings)
//! - fee_token_address (string), fee amount (u128)
//! - required_gas_limit (u64)
//! - allowed relayer count (u32), then each relayer (string)
//! - receipt count (u32), then each `received_message_id (u64)` + `relayer_reward_address (string)`
//! - message (bytes)

use tiny_keccak::{Hasher, Keccak};

use crate::teleporter::TeleporterMessage;

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

fn put_bytes(data: &mut Vec<u8>, bytes: &[u8]) {
    data.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    data.extend_from_slice(bytes);
}

/// Compute the commitment of `message` as sent from `source_chain_id`.
pub fn compute_message_hash(source_chain_id: &str, message: &TeleporterMessage) -> [u8; 32] {
    let mut data = Vec::with_capacity(256 + message.message.len());

    put_bytes(&mut data, source_chain_id.as_bytes());
    data.extend_from_slice(&message.message_id.to_be_bytes());
    put_bytes(&mut data, message.origin_sender.as_bytes());
    put_bytes(&mut data, message.destination_chain_id.as_bytes());
    put_bytes(&mut data, message.destination_address.as_bytes());
    put_bytes(&mut data, message.fee_info.fee_token_address.as_bytes());
    data.extend_from_slice(&message.fee_info.amount.u128().to_be_bytes());
    data.extend_from_slice(&message.required_gas_limit.to_be_bytes());

    data.extend_from_slice(&(message.allowed_relayer_addresses.len() as u32).to_be_bytes());
    for relayer in &message.allowed_relayer_addresses {
        put_bytes(&mut data, relayer.as_bytes());
    }

    data.extend_from_slice(&(message.receipts.len() as u32).to_be_bytes());
    for receipt in &message.receipts {
        data.extend_from_slice(&receipt.received_message_id.to_be_bytes());
        put_bytes(&mut data, receipt.relayer_reward_address.as_bytes());
    }

    put_bytes(&mut data, message.message.as_slice());

    keccak256(&data)
}

/// Convert bytes32 to hex string (for display/logging)
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teleporter::{TeleporterFeeInfo, TeleporterMessageReceipt};
    use cosmwasm_std::{Binary, Uint128};

    fn sample() -> TeleporterMessage {
        TeleporterMessage {
            message_id: 7,
            origin_sender: "sender".to_string(),
            destination_chain_id: "chain-b".to_string(),
            destination_address: "app".to_string(),
            fee_info: TeleporterFeeInfo::new("fee", Uint128::new(1)),
            required_gas_limit: 100_000,
            allowed_relayer_addresses: vec![],
            receipts: vec![],
            message: Binary::from(vec![1, 2, 3, 4]),
        }
    }

    #[test]
    fn test_keccak256_empty() {
        let hash = keccak256(&[]);
        assert_eq!(
            bytes32_to_hex(&hash),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_message_hash_deterministic() {
        assert_eq!(
            compute_message_hash("chain-a", &sample()),
            compute_message_hash("chain-a", &sample())
        );
    }

    #[test]
    fn test_message_hash_binds_source_chain() {
        assert_ne!(
            compute_message_hash("chain-a", &sample()),
            compute_message_hash("chain-c", &sample())
        );
    }

    #[test]
    fn test_message_hash_binds_every_field() {
        let base = compute_message_hash("chain-a", &sample());

        let mut fee = sample();
        fee.fee_info.amount = Uint128::new(2);
        assert_ne!(base, compute_message_hash("chain-a", &fee));

        let mut relayers = sample();
        relayers.allowed_relayer_addresses = vec!["relayer".to_string()];
        assert_ne!(base, compute_message_hash("chain-a", &relayers));

        let mut receipts = sample();
        receipts.receipts = vec![TeleporterMessageReceipt {
            received_message_id: 1,
            relayer_reward_address: "relayer".to_string(),
        }];
        assert_ne!(base, compute_message_hash("chain-a", &receipts));

        let mut payload = sample();
        payload.message = Binary::from(vec![1, 2, 3, 5]);
        assert_ne!(base, compute_message_hash("chain-a", &payload));
    }

    #[test]
    fn test_length_prefix_prevents_field_shifting() {
        let mut left = sample();
        left.origin_sender = "ab".to_string();
        left.destination_address = "c".to_string();
        let mut right = sample();
        right.origin_sender = "a".to_string();
        right.destination_address = "bc".to_string();
        assert_ne!(
            compute_message_hash("chain-a", &left),
            compute_message_hash("chain-a", &right)
        );
    }
}
