//! Hex and payload encoding helpers.
//!
//! Every binary value that crosses the operation boundary (digests, keys,
//! signatures) is lowercase hex. Message and data payloads are either UTF-8
//! text or hex, chosen explicitly by a [`PayloadEncoding`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Error message for odd-length hex input. Hex always encodes whole bytes.
pub const ODD_LENGTH_MESSAGE: &str = "Hex string must have even length";

/// Lowercase hex encoding of `bytes`.
pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decode a hex string (either case) into bytes.
///
/// Odd-length input is rejected before any character is inspected.
pub fn from_hex(s: &str) -> Result<Vec<u8>, TypeError> {
    if s.len() % 2 != 0 {
        return Err(TypeError::InvalidHex(ODD_LENGTH_MESSAGE.into()));
    }
    hex::decode(s).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            TypeError::InvalidHex(format!("invalid hex character {c:?} at position {index}"))
        }
        hex::FromHexError::OddLength => TypeError::InvalidHex(ODD_LENGTH_MESSAGE.into()),
        other => TypeError::InvalidHex(other.to_string()),
    })
}

/// Decode hex into a fixed-size array, checking the length.
pub fn from_hex_array<const N: usize>(s: &str) -> Result<[u8; N], TypeError> {
    let bytes = from_hex(s)?;
    bytes.try_into().map_err(|v: Vec<u8>| TypeError::InvalidLength {
        expected: N,
        actual: v.len(),
    })
}

/// How a message or data payload is written in a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PayloadEncoding {
    /// The payload bytes are the UTF-8 bytes of the string.
    #[default]
    Utf8,
    /// The payload is hex, with an optional `0x` prefix.
    Hex,
}

impl PayloadEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Hex => "hex",
        }
    }

    /// Turn a request payload into the bytes it denotes.
    pub fn decode(&self, raw: &str) -> Result<Vec<u8>, TypeError> {
        match self {
            Self::Utf8 => Ok(raw.as_bytes().to_vec()),
            Self::Hex => {
                let stripped = raw
                    .strip_prefix("0x")
                    .or_else(|| raw.strip_prefix("0X"))
                    .unwrap_or(raw);
                from_hex(stripped)
            }
        }
    }
}

impl FromStr for PayloadEncoding {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "hex" => Ok(Self::Hex),
            _ => Err(TypeError::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for PayloadEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PayloadEncoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PayloadEncoding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
