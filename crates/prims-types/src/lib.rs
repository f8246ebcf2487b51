//! Foundation types for prims.
//!
//! Value types shared by the crypto core and the operation surface. Every
//! other prims crate depends on `prims-types`.
//!
//! # Key Types
//!
//! - [`Digest`]: Fixed-length hash output, hex on the wire
//! - [`HashAlgorithm`]: `SHA-256`, `SHA-384`, `SHA-512` or `BLAKE3`
//! - [`PayloadEncoding`]: How request payloads are written (`utf8` or `hex`)
//! - [`KeyPair`]: Opaque private/public key bytes

pub mod algorithm;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod keypair;

pub use algorithm::HashAlgorithm;
pub use digest::Digest;
pub use encoding::{from_hex, from_hex_array, to_hex, PayloadEncoding};
pub use error::TypeError;
pub use keypair::KeyPair;
