//! Argument decoding shared by the operations.
//!
//! Argument objects are camelCase JSON. Binary arguments arrive as hex,
//! payloads as UTF-8 or hex per their `encoding` field, and integers as
//! either a JSON number or a decimal string.

use std::fmt;

use prims_types::{HashAlgorithm, PayloadEncoding};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use crate::error::{DispatchError, DispatchResult};

/// An integer argument written as a JSON number or a decimal string.
///
/// Kept wide so that negative and oversized inputs survive decoding and can
/// be rejected with a precise message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntArg(pub i128);

impl IntArg {
    /// The value as a non-negative count.
    pub fn non_negative(self, field: &str) -> DispatchResult<usize> {
        if self.0 < 0 {
            return Err(DispatchError::validation(format!(
                "{field} must be non-negative, got {}",
                self.0
            )));
        }
        usize::try_from(self.0)
            .map_err(|_| DispatchError::validation(format!("{field} is too large: {}", self.0)))
    }

    /// The value as an upper bound that must be positive.
    pub fn positive_u64(self, field: &str) -> DispatchResult<u64> {
        if self.0 <= 0 {
            return Err(DispatchError::validation(format!(
                "{field} must be greater than 0, got {}",
                self.0
            )));
        }
        u64::try_from(self.0)
            .map_err(|_| DispatchError::validation(format!("{field} is too large: {}", self.0)))
    }

    pub fn signed(self, field: &str) -> DispatchResult<i64> {
        i64::try_from(self.0)
            .map_err(|_| DispatchError::validation(format!("{field} is out of range: {}", self.0)))
    }
}

impl<'de> Deserialize<'de> for IntArg {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IntVisitor;

        impl Visitor<'_> for IntVisitor {
            type Value = IntArg;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a decimal string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<IntArg, E> {
                Ok(IntArg(i128::from(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<IntArg, E> {
                Ok(IntArg(i128::from(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<IntArg, E> {
                // 5.0 is accepted; 5.5 is not
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e38 {
                    Ok(IntArg(v as i128))
                } else {
                    Err(E::custom(format!("expected an integer, got {v}")))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<IntArg, E> {
                v.trim()
                    .parse::<i128>()
                    .map(IntArg)
                    .map_err(|_| E::custom(format!("expected a decimal integer, got {v:?}")))
            }
        }

        deserializer.deserialize_any(IntVisitor)
    }
}

/// Parse an optional algorithm name, defaulting to SHA-256.
pub fn algorithm(name: Option<&str>) -> DispatchResult<HashAlgorithm> {
    match name {
        Some(name) => Ok(name.parse()?),
        None => Ok(HashAlgorithm::default()),
    }
}

/// Parse an optional payload encoding, defaulting to UTF-8.
pub fn encoding(name: Option<&str>) -> DispatchResult<PayloadEncoding> {
    match name {
        Some(name) => Ok(name.parse()?),
        None => Ok(PayloadEncoding::default()),
    }
}

/// Decode a hex-only binary argument (keys, signatures, digests).
pub fn hex_bytes(value: &str) -> DispatchResult<Vec<u8>> {
    Ok(PayloadEncoding::Hex.decode(value)?)
}

/// Reject collections longer than a configured limit.
pub fn check_limit(what: &str, actual: usize, limit: usize) -> DispatchResult<()> {
    if actual > limit {
        return Err(DispatchError::validation(format!(
            "{what} exceeds limit: {actual} > {limit}"
        )));
    }
    Ok(())
}
