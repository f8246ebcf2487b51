use prims_crypto::Hasher;
use prims_types::{Digest, HashAlgorithm};
use serde::{Deserialize, Serialize};

use crate::args;
use crate::config::DispatchConfig;
use crate::error::DispatchResult;
use crate::operation::Operation;

use super::Validity;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashArgs {
    pub data: String,
    pub algorithm: Option<String>,
    pub encoding: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HashOutput {
    pub hash: Digest,
    pub algorithm: HashAlgorithm,
}

/// `hash`: digest a payload.
pub struct HashOp;

impl Operation for HashOp {
    type Args = HashArgs;
    type Input = (Hasher, Vec<u8>);
    type Output = HashOutput;

    fn name(&self) -> &'static str {
        "hash"
    }

    fn description(&self) -> &'static str {
        "Hash data with SHA-256, SHA-384, SHA-512 or BLAKE3"
    }

    fn validate(&self, args: HashArgs, _limits: &DispatchConfig) -> DispatchResult<Self::Input> {
        let algorithm = args::algorithm(args.algorithm.as_deref())?;
        let data = args::encoding(args.encoding.as_deref())?.decode(&args.data)?;
        Ok((Hasher::new(algorithm), data))
    }

    fn execute(&self, (hasher, data): Self::Input) -> DispatchResult<HashOutput> {
        Ok(HashOutput {
            hash: hasher.hash(&data),
            algorithm: hasher.algorithm(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyHashArgs {
    pub data: String,
    pub expected_hash: String,
    pub algorithm: Option<String>,
    pub encoding: Option<String>,
}

pub struct VerifyHashInput {
    hasher: Hasher,
    data: Vec<u8>,
    expected: Digest,
}

/// `verify_hash`: recompute and compare. Hex case does not matter.
pub struct VerifyHashOp;

impl Operation for VerifyHashOp {
    type Args = VerifyHashArgs;
    type Input = VerifyHashInput;
    type Output = Validity;

    fn name(&self) -> &'static str {
        "verify_hash"
    }

    fn description(&self) -> &'static str {
        "Check data against an expected hex digest"
    }

    fn validate(
        &self,
        args: VerifyHashArgs,
        _limits: &DispatchConfig,
    ) -> DispatchResult<VerifyHashInput> {
        let algorithm = args::algorithm(args.algorithm.as_deref())?;
        let data = args::encoding(args.encoding.as_deref())?.decode(&args.data)?;
        let expected = Digest::from_bytes(args::hex_bytes(&args.expected_hash)?);
        Ok(VerifyHashInput {
            hasher: Hasher::new(algorithm),
            data,
            expected,
        })
    }

    fn execute(&self, input: VerifyHashInput) -> DispatchResult<Validity> {
        Ok(Validity {
            valid: input.hasher.verify(&input.data, &input.expected),
        })
    }
}
