use prims_types::KeyPair;

/// A signature scheme operating on opaque key and signature bytes.
///
/// Implementations are stateless unit types. Signing is all-or-nothing and a
/// verification mismatch is `Ok(false)`; `Err` means the check could not run
/// (wrong-length or undecodable inputs).
pub trait SignatureScheme {
    /// Scheme name as reported on the operation surface.
    const NAME: &'static str;
    const PRIVATE_KEY_LEN: usize;
    const PUBLIC_KEY_LEN: usize;
    const SIGNATURE_LEN: usize;

    /// Fresh key pair from OS entropy.
    fn generate_keypair() -> Result<KeyPair, SignatureError>;

    fn sign(message: &[u8], private_key: &[u8]) -> Result<Vec<u8>, SignatureError>;

    fn verify(message: &[u8], signature: &[u8], public_key: &[u8])
        -> Result<bool, SignatureError>;
}

/// Errors from signing operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid {scheme} private key length: expected {expected} bytes, got {actual}")]
    InvalidPrivateKeyLength {
        scheme: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {scheme} public key length: expected {expected} bytes, got {actual}")]
    InvalidPublicKeyLength {
        scheme: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {scheme} signature length: expected {expected} bytes, got {actual}")]
    InvalidSignatureLength {
        scheme: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {scheme} private key: {reason}")]
    InvalidPrivateKey { scheme: &'static str, reason: String },

    #[error("invalid {scheme} public key")]
    InvalidPublicKey { scheme: &'static str },

    #[error("invalid {scheme} signature")]
    InvalidSignature { scheme: &'static str },

    #[error("cannot aggregate an empty list of {0}")]
    EmptyAggregation(&'static str),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),
}

pub(crate) fn check_len(
    bytes: &[u8],
    expected: usize,
    err: impl FnOnce(usize) -> SignatureError,
) -> Result<(), SignatureError> {
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(err(bytes.len()))
    }
}
