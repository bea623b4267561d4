//! Bridge payload codec
//!
//! Bridge instances exchange these actions as the opaque `message` bytes of a
//! Teleporter message. The encoding is versioned so that messages still in
//! flight remain decodable after an upgrade.
//!
//! # Layout (big-endian)
//! - version (u8)
//! - action tag (u8): 0 = CreateBridgeToken, 1 = BridgeTransfer
//! - action fields; strings are a u32 length followed by UTF-8 bytes,
//!   amounts are u128, decimals u8, an optional hop is a u8 flag followed by
//!   `chain_id` and `bridge_address` when the flag is 1

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, Uint128};
use thiserror::Error;

/// Current payload version
pub const PAYLOAD_VERSION: u8 = 1;

const TAG_CREATE_BRIDGE_TOKEN: u8 = 0;
const TAG_BRIDGE_TRANSFER: u8 = 1;

#[derive(Error, Debug, PartialEq)]
pub enum PayloadError {
    #[error("Empty bridge payload")]
    Empty,

    #[error("Unsupported payload version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("Unknown bridge action: {tag}")]
    UnknownAction { tag: u8 },

    #[error("Truncated payload: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("Invalid UTF-8 in payload field at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("Trailing bytes after payload: {count}")]
    TrailingBytes { count: usize },

    #[error("Invalid option flag: {flag}")]
    InvalidFlag { flag: u8 },
}

/// Next hop of a multi-hop transfer.
#[cw_serde]
pub struct HopDestination {
    pub chain_id: String,
    pub bridge_address: String,
}

/// Registration of a native asset on a destination bridge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateBridgeToken {
    pub native_chain_id: String,
    pub native_bridge: String,
    pub native_asset: String,
    /// Bridge on the destination chain expected to create the wrapped token
    pub destination_bridge: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Movement of bridged value, identified by its native triple.
#[derive(Clone, Debug, PartialEq)]
pub struct BridgeTransfer {
    pub native_chain_id: String,
    pub native_bridge: String,
    pub native_asset: String,
    pub recipient: String,
    /// Amount to credit on arrival (primary fee already deducted)
    pub amount: Uint128,
    /// Fee paid out of `amount` for the next hop; zero without one
    pub secondary_fee: Uint128,
    pub secondary_destination: Option<HopDestination>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BridgeAction {
    CreateBridgeToken(CreateBridgeToken),
    BridgeTransfer(BridgeTransfer),
}

impl BridgeAction {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![PAYLOAD_VERSION];
        match self {
            BridgeAction::CreateBridgeToken(create) => {
                out.push(TAG_CREATE_BRIDGE_TOKEN);
                put_str(&mut out, &create.native_chain_id);
                put_str(&mut out, &create.native_bridge);
                put_str(&mut out, &create.native_asset);
                put_str(&mut out, &create.destination_bridge);
                put_str(&mut out, &create.name);
                put_str(&mut out, &create.symbol);
                out.push(create.decimals);
            }
            BridgeAction::BridgeTransfer(transfer) => {
                out.push(TAG_BRIDGE_TRANSFER);
                put_str(&mut out, &transfer.native_chain_id);
                put_str(&mut out, &transfer.native_bridge);
                put_str(&mut out, &transfer.native_asset);
                put_str(&mut out, &transfer.recipient);
                out.extend_from_slice(&transfer.amount.u128().to_be_bytes());
                out.extend_from_slice(&transfer.secondary_fee.u128().to_be_bytes());
                match &transfer.secondary_destination {
                    Some(hop) => {
                        out.push(1);
                        put_str(&mut out, &hop.chain_id);
                        put_str(&mut out, &hop.bridge_address);
                    }
                    None => out.push(0),
                }
            }
        }
        out
    }

    pub fn to_binary(&self) -> Binary {
        Binary::from(self.encode())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        let mut reader = Reader::new(bytes);
        let version = reader.u8().map_err(|_| PayloadError::Empty)?;
        if version == 0 || version > PAYLOAD_VERSION {
            return Err(PayloadError::UnsupportedVersion { version });
        }

        let action = match reader.u8()? {
            TAG_CREATE_BRIDGE_TOKEN => BridgeAction::CreateBridgeToken(CreateBridgeToken {
                native_chain_id: reader.string()?,
                native_bridge: reader.string()?,
                native_asset: reader.string()?,
                destination_bridge: reader.string()?,
                name: reader.string()?,
                symbol: reader.string()?,
                decimals: reader.u8()?,
            }),
            TAG_BRIDGE_TRANSFER => BridgeAction::BridgeTransfer(BridgeTransfer {
                native_chain_id: reader.string()?,
                native_bridge: reader.string()?,
                native_asset: reader.string()?,
                recipient: reader.string()?,
                amount: Uint128::new(reader.u128()?),
                secondary_fee: Uint128::new(reader.u128()?),
                secondary_destination: match reader.u8()? {
                    0 => None,
                    1 => Some(HopDestination {
                        chain_id: reader.string()?,
                        bridge_address: reader.string()?,
                    }),
                    flag => return Err(PayloadError::InvalidFlag { flag }),
                },
            }),
            tag => return Err(PayloadError::UnknownAction { tag }),
        };

        reader.finish()?;
        Ok(action)
    }
}

fn put_str(out: &mut Vec<u8>, value: &str) {
    out.extend_from_slice(&(value.len() as u32).to_be_bytes());
    out.extend_from_slice(value.as_bytes());
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], PayloadError> {
        let end = self
            .offset
            .checked_add(needed)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(PayloadError::Truncated {
                offset: self.offset,
                needed,
            })?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, PayloadError> {
        Ok(self.take(1)?[0])
    }

    fn u128(&mut self) -> Result<u128, PayloadError> {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(self.take(16)?);
        Ok(u128::from_be_bytes(buf))
    }

    fn string(&mut self) -> Result<String, PayloadError> {
        let mut len = [0u8; 4];
        len.copy_from_slice(self.take(4)?);
        let start = self.offset;
        let bytes = self.take(u32::from_be_bytes(len) as usize)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| PayloadError::InvalidUtf8 { offset: start })
    }

    fn finish(&self) -> Result<(), PayloadError> {
        match self.bytes.len() - self.offset {
            0 => Ok(()),
            count => Err(PayloadError::TrailingBytes { count }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_action() -> BridgeAction {
        BridgeAction::CreateBridgeToken(CreateBridgeToken {
            native_chain_id: "c-chain".to_string(),
            native_bridge: "bridge-c".to_string(),
            native_asset: "token-x".to_string(),
            destination_bridge: "bridge-b".to_string(),
            name: "Mock Token".to_string(),
            symbol: "EXMP".to_string(),
            decimals: 18,
        })
    }

    fn transfer_action(hop: Option<HopDestination>) -> BridgeAction {
        BridgeAction::BridgeTransfer(BridgeTransfer {
            native_chain_id: "c-chain".to_string(),
            native_bridge: "bridge-c".to_string(),
            native_asset: "token-x".to_string(),
            recipient: "recipient".to_string(),
            amount: Uint128::new(12_000_000_000_000_000_000),
            secondary_fee: Uint128::new(1_000_000_000_000_000_000),
            secondary_destination: hop,
        })
    }

    #[test]
    fn test_create_bridge_token_decodes() {
        let action = create_action();
        assert_eq!(BridgeAction::decode(&action.encode()).unwrap(), action);
    }

    #[test]
    fn test_transfer_with_hop_decodes() {
        let action = transfer_action(Some(HopDestination {
            chain_id: "subnet-c".to_string(),
            bridge_address: "bridge-on-c".to_string(),
        }));
        assert_eq!(BridgeAction::decode(&action.encode()).unwrap(), action);
    }

    #[test]
    fn test_header_layout() {
        let bytes = transfer_action(None).encode();
        assert_eq!(bytes[0], PAYLOAD_VERSION);
        assert_eq!(bytes[1], TAG_BRIDGE_TRANSFER);
        // no hop: the flag is the last byte
        assert_eq!(*bytes.last().unwrap(), 0);
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(BridgeAction::decode(&[]), Err(PayloadError::Empty));
    }

    #[test]
    fn test_decode_future_version() {
        let mut bytes = create_action().encode();
        bytes[0] = PAYLOAD_VERSION + 1;
        assert_eq!(
            BridgeAction::decode(&bytes),
            Err(PayloadError::UnsupportedVersion {
                version: PAYLOAD_VERSION + 1
            })
        );
    }

    #[test]
    fn test_decode_unknown_tag() {
        assert_eq!(
            BridgeAction::decode(&[PAYLOAD_VERSION, 9]),
            Err(PayloadError::UnknownAction { tag: 9 })
        );
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = create_action().encode();
        let err = BridgeAction::decode(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, PayloadError::Truncated { .. }));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut bytes = create_action().encode();
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(
            BridgeAction::decode(&bytes),
            Err(PayloadError::TrailingBytes { count: 2 })
        );
    }

    #[test]
    fn test_decode_invalid_flag() {
        let mut bytes = transfer_action(None).encode();
        let last = bytes.len() - 1;
        bytes[last] = 7;
        assert_eq!(
            BridgeAction::decode(&bytes),
            Err(PayloadError::InvalidFlag { flag: 7 })
        );
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut bytes = vec![PAYLOAD_VERSION, TAG_CREATE_BRIDGE_TOKEN];
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&[0xff, 0xfe]);
        assert_eq!(
            BridgeAction::decode(&bytes),
            Err(PayloadError::InvalidUtf8 { offset: 6 })
        );
    }
}
