use prims_types::KeyPair;
use rand::rngs::OsRng;

use crate::scheme::{check_len, SignatureError, SignatureScheme};

const SCHEME: &str = "Ed25519";

pub const PRIVATE_KEY_LEN: usize = 32;
pub const PUBLIC_KEY_LEN: usize = 32;
pub const SIGNATURE_LEN: usize = 64;
/// Seed followed by public key, the layout some tooling exports.
pub const EXPANDED_PRIVATE_KEY_LEN: usize = 64;

/// Ed25519 signing key (private).
pub struct SigningKey(ed25519_dalek::SigningKey);

/// Ed25519 verifying key (public).
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyingKey(ed25519_dalek::VerifyingKey);

/// Ed25519 signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(ed25519_dalek::Signature);

impl SigningKey {
    /// Generate a new signing key from OS entropy.
    pub fn generate() -> Self {
        Self(ed25519_dalek::SigningKey::generate(&mut OsRng))
    }

    /// Create from a raw 32-byte seed.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&bytes))
    }

    /// Accept either the 32-byte seed or the 64-byte `seed || public` form.
    ///
    /// For the 64-byte form the trailing public key must match the seed.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        match bytes.len() {
            PRIVATE_KEY_LEN => {
                let mut seed = [0u8; PRIVATE_KEY_LEN];
                seed.copy_from_slice(bytes);
                Ok(Self::from_bytes(seed))
            }
            EXPANDED_PRIVATE_KEY_LEN => {
                let (seed_bytes, public) = bytes.split_at(PRIVATE_KEY_LEN);
                let mut seed = [0u8; PRIVATE_KEY_LEN];
                seed.copy_from_slice(seed_bytes);
                let key = Self::from_bytes(seed);
                if key.verifying_key().as_bytes().as_slice() != public {
                    return Err(SignatureError::InvalidPrivateKey {
                        scheme: SCHEME,
                        reason: "embedded public key does not match seed".into(),
                    });
                }
                Ok(key)
            }
            actual => Err(SignatureError::InvalidPrivateKeyLength {
                scheme: SCHEME,
                expected: PRIVATE_KEY_LEN,
                actual,
            }),
        }
    }

    /// The corresponding public verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }

    /// Sign a message. Deterministic for a given key and message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        use ed25519_dalek::Signer;
        Signature(self.0.sign(message))
    }

    /// Raw seed bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl VerifyingKey {
    /// Verify a signature on a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        use ed25519_dalek::Verifier;
        self.0.verify(message, &signature.0).is_ok()
    }

    /// Raw public key bytes.
    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Create from a raw 32-byte public key.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignatureError> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map_err(|_| SignatureError::InvalidPublicKey { scheme: SCHEME })?;
        Ok(Self(key))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        let arr: [u8; PUBLIC_KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| SignatureError::InvalidPublicKeyLength {
                    scheme: SCHEME,
                    expected: PUBLIC_KEY_LEN,
                    actual: bytes.len(),
                })?;
        Self::from_bytes(arr)
    }
}

impl Signature {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        let arr: [u8; SIGNATURE_LEN] =
            bytes
                .try_into()
                .map_err(|_| SignatureError::InvalidSignatureLength {
                    scheme: SCHEME,
                    expected: SIGNATURE_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(ed25519_dalek::Signature::from_bytes(&arr)))
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningKey(<redacted>)")
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VerifyingKey({})", hex::encode(self.0.to_bytes()))
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", hex::encode(&self.0.to_bytes()[..8]))
    }
}

/// Single-signer scheme: 32-byte keys, 64-byte deterministic signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519;

impl SignatureScheme for Ed25519 {
    const NAME: &'static str = SCHEME;
    const PRIVATE_KEY_LEN: usize = PRIVATE_KEY_LEN;
    const PUBLIC_KEY_LEN: usize = PUBLIC_KEY_LEN;
    const SIGNATURE_LEN: usize = SIGNATURE_LEN;

    fn generate_keypair() -> Result<KeyPair, SignatureError> {
        let sk = SigningKey::generate();
        Ok(KeyPair::new(
            sk.as_bytes().to_vec(),
            sk.verifying_key().as_bytes().to_vec(),
        ))
    }

    fn sign(message: &[u8], private_key: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let sk = SigningKey::from_slice(private_key)?;
        Ok(sk.sign(message).to_bytes().to_vec())
    }

    fn verify(
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<bool, SignatureError> {
        check_len(public_key, PUBLIC_KEY_LEN, |actual| {
            SignatureError::InvalidPublicKeyLength {
                scheme: SCHEME,
                expected: PUBLIC_KEY_LEN,
                actual,
            }
        })?;
        let sig = Signature::from_slice(signature)?;
        // Right length but not a curve point: the check ran and failed
        let Ok(vk) = VerifyingKey::from_slice(public_key) else {
            return Ok(false);
        };
        Ok(vk.verify(message, &sig))
    }
}
