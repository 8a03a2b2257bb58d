//! Serde helper for byte fields that travel as 0x-prefixed hex strings.
//!
//! Usage: `#[serde(with = "crate::utils::hex_bytes")]` on a `Vec<u8>` field.

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let stripped = raw.strip_prefix("0x").unwrap_or(&raw);
    hex::decode(stripped).map_err(serde::de::Error::custom)
}
