use prims_types::{Digest, HashAlgorithm};

/// Stateless digest function for one algorithm.
///
/// A `Hasher` is a plain value: copying it is free and two hashers with the
/// same algorithm are interchangeable. Equal `(data, algorithm)` always yields
/// an equal [`Digest`] whose length is [`HashAlgorithm::output_len`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hasher {
    algorithm: HashAlgorithm,
}

impl Hasher {
    pub const SHA256: Self = Self::new(HashAlgorithm::Sha256);
    pub const SHA384: Self = Self::new(HashAlgorithm::Sha384);
    pub const SHA512: Self = Self::new(HashAlgorithm::Sha512);
    pub const BLAKE3: Self = Self::new(HashAlgorithm::Blake3);

    pub const fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash raw bytes.
    pub fn hash(&self, data: &[u8]) -> Digest {
        self.hash_parts(&[data])
    }

    /// Hash the concatenation `left || right` without building it in memory.
    pub fn combine(&self, left: &[u8], right: &[u8]) -> Digest {
        self.hash_parts(&[left, right])
    }

    /// Recompute and compare. A mismatch is `false`, never an error.
    pub fn verify(&self, data: &[u8], expected: &Digest) -> bool {
        self.hash(data) == *expected
    }

    fn hash_parts(&self, parts: &[&[u8]]) -> Digest {
        match self.algorithm {
            HashAlgorithm::Sha256 => sha2_parts::<sha2::Sha256>(parts),
            HashAlgorithm::Sha384 => sha2_parts::<sha2::Sha384>(parts),
            HashAlgorithm::Sha512 => sha2_parts::<sha2::Sha512>(parts),
            HashAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                for part in parts {
                    hasher.update(part);
                }
                Digest::from(*hasher.finalize().as_bytes())
            }
        }
    }
}

fn sha2_parts<D: sha2::Digest>(parts: &[&[u8]]) -> Digest {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    Digest::from_bytes(hasher.finalize().to_vec())
}

/// Hash `data` with `algorithm`.
pub fn hash(data: &[u8], algorithm: HashAlgorithm) -> Digest {
    Hasher::new(algorithm).hash(data)
}

/// Check `data` against an expected digest.
pub fn verify_hash(data: &[u8], expected: &Digest, algorithm: HashAlgorithm) -> bool {
    Hasher::new(algorithm).verify(data, expected)
}
