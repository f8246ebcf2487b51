//! Cryptographic primitives for prims.
//!
//! Four independent components, all synchronous and stateless:
//!
//! - [`Hasher`]: SHA-256/384/512 and BLAKE3 digests
//! - [`MerkleTree`]: batch commitments with inclusion proofs
//! - [`Ed25519`] and [`Bls`]: the two [`SignatureScheme`]s, BLS with aggregation
//! - [`SecureRandom`]: OS-CSPRNG bytes, bounded integers, sampling and UUIDs
//!
//! All crypto operations wrap established libraries; nothing here implements
//! curve or hash arithmetic directly.

pub mod bls;
pub mod ed25519;
pub mod hasher;
pub mod merkle;
pub mod random;
pub mod scheme;

pub use bls::{Bls, BlsPublicKey, BlsSecretKey, BlsSignature};
pub use ed25519::{Ed25519, Signature, SigningKey, VerifyingKey};
pub use hasher::{hash, verify_hash, Hasher};
pub use merkle::{merkle_proof, merkle_root, MerkleError, MerkleProof, MerkleTree};
pub use random::{RandomError, SecureRandom};
pub use scheme::{SignatureError, SignatureScheme};
