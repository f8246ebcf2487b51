use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encoding::to_hex;

/// A private/public key pair as opaque bytes.
///
/// Sizes are fixed by the signature scheme that produced the pair. The caller
/// owns storage and lifetime; nothing in prims keeps a copy.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub private_key: Vec<u8>,
    pub public_key: Vec<u8>,
}

impl KeyPair {
    pub fn new(private_key: Vec<u8>, public_key: Vec<u8>) -> Self {
        Self {
            private_key,
            public_key,
        }
    }

    pub fn public_key_hex(&self) -> String {
        to_hex(&self.public_key)
    }

    pub fn private_key_hex(&self) -> String {
        to_hex(&self.private_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key_hex())
            .finish()
    }
}
