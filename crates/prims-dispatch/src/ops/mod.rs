//! The built-in operations, grouped by component.

pub mod hash;
pub mod merkle;
pub mod random;
pub mod signature;

use prims_crypto::{Bls, Ed25519};
use serde::{Deserialize, Serialize};

use crate::operation::DynOperation;
use signature::{KeygenOp, Label, SignOp, VerifyOp};

/// Argument object for operations that take none. Extra fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct NoArgs {}

/// `{"valid": bool}`, the result of every verification.
#[derive(Debug, Serialize)]
pub struct Validity {
    pub valid: bool,
}

/// Every built-in operation, in no particular order.
pub fn builtin() -> Vec<Box<dyn DynOperation>> {
    vec![
        Box::new(hash::HashOp),
        Box::new(hash::VerifyHashOp),
        Box::new(merkle::MerkleRootOp),
        Box::new(merkle::MerkleProofOp),
        Box::new(merkle::VerifyMerkleProofOp),
        Box::new(KeygenOp::<Ed25519>::new(Label {
            name: "ed25519_keygen",
            description: "Generate an Ed25519 key pair",
        })),
        Box::new(SignOp::<Ed25519>::new(Label {
            name: "ed25519_sign",
            description: "Sign a message with an Ed25519 private key",
        })),
        Box::new(VerifyOp::<Ed25519>::new(Label {
            name: "ed25519_verify",
            description: "Verify an Ed25519 signature",
        })),
        Box::new(KeygenOp::<Bls>::new(Label {
            name: "bls_keygen",
            description: "Generate a BLS12-381 key pair",
        })),
        Box::new(SignOp::<Bls>::new(Label {
            name: "bls_sign",
            description: "Sign a message with a BLS12-381 private key",
        })),
        Box::new(VerifyOp::<Bls>::new(Label {
            name: "bls_verify",
            description: "Verify a BLS12-381 signature or same-message aggregate",
        })),
        Box::new(signature::BlsAggregateSignaturesOp),
        Box::new(signature::BlsAggregatePublicKeysOp),
        Box::new(random::RandomBytesOp),
        Box::new(random::RandomIntOp),
        Box::new(random::RandomIntRangeOp),
        Box::new(random::RandomSelectOp),
        Box::new(random::RandomSampleOp),
        Box::new(random::RandomShuffleOp),
        Box::new(random::RandomUuidOp),
    ]
}
