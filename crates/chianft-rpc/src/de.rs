use chia_protocol::Bytes32;
use hex::FromHex;

use crate::RpcError;

/// Parses a 32 byte hex string, with or without a `0x` prefix.
pub fn parse_bytes32(hex: &str) -> Result<Bytes32, RpcError> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    Ok(Bytes32::new(<[u8; 32]>::from_hex(hex)?))
}
