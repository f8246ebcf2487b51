//! BLS12-381 signatures with same-message aggregation.
//!
//! Public keys live in G1 (48 bytes compressed) and signatures in G2 (96 bytes
//! compressed). Messages are hashed to G2 under the basic-scheme ciphersuite
//! [`DST`]. Verification is the pairing check `e(g1, sig) == e(pk, H(m))`.
//!
//! Aggregates are plain group sums. An aggregate signature verifies against
//! the aggregate public key only when every signer signed the same message.

use blst::min_pk::{
    AggregatePublicKey, AggregateSignature, PublicKey as RawPublicKey, SecretKey as RawSecretKey,
    Signature as RawSignature,
};
use blst::BLST_ERROR;
use prims_types::KeyPair;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::scheme::{SignatureError, SignatureScheme};

const SCHEME: &str = "BLS12-381";

/// Hash-to-curve domain separation tag.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

pub const PRIVATE_KEY_LEN: usize = 32;
pub const PUBLIC_KEY_LEN: usize = 48;
pub const SIGNATURE_LEN: usize = 96;

const IKM_LEN: usize = 32;

/// BLS secret key (a scalar).
#[derive(Clone)]
pub struct BlsSecretKey(RawSecretKey);

/// BLS public key (a G1 point).
#[derive(Clone)]
pub struct BlsPublicKey(RawPublicKey);

/// BLS signature (a G2 point).
#[derive(Clone)]
pub struct BlsSignature(RawSignature);

impl BlsSecretKey {
    /// Derive a key from 32 bytes of OS entropy via the standard `KeyGen`.
    pub fn generate() -> Result<Self, SignatureError> {
        let mut ikm = [0u8; IKM_LEN];
        OsRng
            .try_fill_bytes(&mut ikm)
            .map_err(|e| SignatureError::KeyGeneration(e.to_string()))?;
        RawSecretKey::key_gen(&ikm, &[])
            .map(Self)
            .map_err(|e| SignatureError::KeyGeneration(format!("{e:?}")))
    }

    /// Big-endian scalar bytes. Zero and values at or above the group order
    /// are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(SignatureError::InvalidPrivateKeyLength {
                scheme: SCHEME,
                expected: PRIVATE_KEY_LEN,
                actual: bytes.len(),
            });
        }
        RawSecretKey::from_bytes(bytes)
            .map(Self)
            .map_err(|e| SignatureError::InvalidPrivateKey {
                scheme: SCHEME,
                reason: format!("{e:?}"),
            })
    }

    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LEN] {
        self.0.to_bytes()
    }

    pub fn public_key(&self) -> BlsPublicKey {
        BlsPublicKey(self.0.sk_to_pk())
    }

    /// `sk * H(message)`.
    pub fn sign(&self, message: &[u8]) -> BlsSignature {
        BlsSignature(self.0.sign(message, DST, &[]))
    }
}

impl BlsPublicKey {
    /// Decode a compressed key. The point must be on the curve, in the
    /// prime-order subgroup and not the identity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(SignatureError::InvalidPublicKeyLength {
                scheme: SCHEME,
                expected: PUBLIC_KEY_LEN,
                actual: bytes.len(),
            });
        }
        RawPublicKey::key_validate(bytes)
            .map(Self)
            .map_err(|_| SignatureError::InvalidPublicKey { scheme: SCHEME })
    }

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.0.compress()
    }

    pub fn verify(&self, message: &[u8], signature: &BlsSignature) -> bool {
        signature.0.verify(true, message, DST, &[], &self.0, true) == BLST_ERROR::BLST_SUCCESS
    }
}

impl BlsSignature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(SignatureError::InvalidSignatureLength {
                scheme: SCHEME,
                expected: SIGNATURE_LEN,
                actual: bytes.len(),
            });
        }
        RawSignature::from_bytes(bytes)
            .map(Self)
            .map_err(|_| SignatureError::InvalidSignature { scheme: SCHEME })
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0.compress()
    }
}

impl PartialEq for BlsPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsPublicKey {}

impl PartialEq for BlsSignature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsSignature {}

impl std::fmt::Debug for BlsSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlsSecretKey(<redacted>)")
    }
}

impl std::fmt::Debug for BlsPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlsPublicKey({})", hex::encode(self.to_bytes()))
    }
}

impl std::fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlsSignature({}...)", hex::encode(&self.to_bytes()[..8]))
    }
}

/// Sum signatures in G2. Order does not matter.
pub fn aggregate_signatures(signatures: &[BlsSignature]) -> Result<BlsSignature, SignatureError> {
    if signatures.is_empty() {
        return Err(SignatureError::EmptyAggregation("signatures"));
    }
    let raw: Vec<&RawSignature> = signatures.iter().map(|s| &s.0).collect();
    AggregateSignature::aggregate(&raw, true)
        .map(|agg| BlsSignature(agg.to_signature()))
        .map_err(|_| SignatureError::InvalidSignature { scheme: SCHEME })
}

/// Sum public keys in G1. Order does not matter.
pub fn aggregate_public_keys(keys: &[BlsPublicKey]) -> Result<BlsPublicKey, SignatureError> {
    if keys.is_empty() {
        return Err(SignatureError::EmptyAggregation("public keys"));
    }
    let raw: Vec<&RawPublicKey> = keys.iter().map(|k| &k.0).collect();
    AggregatePublicKey::aggregate(&raw, true)
        .map(|agg| BlsPublicKey(agg.to_public_key()))
        .map_err(|_| SignatureError::InvalidPublicKey { scheme: SCHEME })
}

/// Aggregatable scheme over BLS12-381.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bls;

impl Bls {
    /// Decode and aggregate compressed signatures.
    pub fn aggregate_signatures<B: AsRef<[u8]>>(
        signatures: &[B],
    ) -> Result<Vec<u8>, SignatureError> {
        let decoded = signatures
            .iter()
            .map(|s| BlsSignature::from_bytes(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(aggregate_signatures(&decoded)?.to_bytes().to_vec())
    }

    /// Decode and aggregate compressed public keys.
    pub fn aggregate_public_keys<B: AsRef<[u8]>>(keys: &[B]) -> Result<Vec<u8>, SignatureError> {
        let decoded = keys
            .iter()
            .map(|k| BlsPublicKey::from_bytes(k.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(aggregate_public_keys(&decoded)?.to_bytes().to_vec())
    }
}

impl SignatureScheme for Bls {
    const NAME: &'static str = SCHEME;
    const PRIVATE_KEY_LEN: usize = PRIVATE_KEY_LEN;
    const PUBLIC_KEY_LEN: usize = PUBLIC_KEY_LEN;
    const SIGNATURE_LEN: usize = SIGNATURE_LEN;

    fn generate_keypair() -> Result<KeyPair, SignatureError> {
        let sk = BlsSecretKey::generate()?;
        Ok(KeyPair::new(
            sk.to_bytes().to_vec(),
            sk.public_key().to_bytes().to_vec(),
        ))
    }

    fn sign(message: &[u8], private_key: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let sk = BlsSecretKey::from_bytes(private_key)?;
        Ok(sk.sign(message).to_bytes().to_vec())
    }

    fn verify(
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<bool, SignatureError> {
        // Well-sized inputs that fail to decode are a failed check, not an error
        let pk = match BlsPublicKey::from_bytes(public_key) {
            Ok(pk) => pk,
            Err(SignatureError::InvalidPublicKey { .. }) => return Ok(false),
            Err(e) => return Err(e),
        };
        let sig = match BlsSignature::from_bytes(signature) {
            Ok(sig) => sig,
            Err(SignatureError::InvalidSignature { .. }) => return Ok(false),
            Err(e) => return Err(e),
        };
        Ok(pk.verify(message, &sig))
    }
}
