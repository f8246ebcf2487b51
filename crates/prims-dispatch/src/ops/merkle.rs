use prims_crypto::{MerkleError, MerkleProof, MerkleTree};
use prims_types::{Digest, HashAlgorithm};
use serde::{Deserialize, Serialize};

use crate::args::{self, IntArg};
use crate::config::DispatchConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::operation::Operation;

use super::Validity;

/// Decode every leaf with the request's encoding. The list must be non-empty
/// and within the leaf limit.
fn decode_leaves(
    leaves: &[String],
    encoding: Option<&str>,
    limits: &DispatchConfig,
) -> DispatchResult<Vec<Vec<u8>>> {
    if leaves.is_empty() {
        return Err(MerkleError::Empty.into());
    }
    args::check_limit("leaves", leaves.len(), limits.max_leaves)?;
    let encoding = args::encoding(encoding)?;
    leaves
        .iter()
        .map(|leaf| encoding.decode(leaf).map_err(DispatchError::from))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleRootArgs {
    pub leaves: Vec<String>,
    pub algorithm: Option<String>,
    pub encoding: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleRootOutput {
    pub root: Digest,
    pub algorithm: HashAlgorithm,
    pub leaf_count: usize,
}

/// `merkle_root`: commit to a batch of leaves.
pub struct MerkleRootOp;

impl Operation for MerkleRootOp {
    type Args = MerkleRootArgs;
    type Input = (Vec<Vec<u8>>, HashAlgorithm);
    type Output = MerkleRootOutput;

    fn name(&self) -> &'static str {
        "merkle_root"
    }

    fn description(&self) -> &'static str {
        "Compute the Merkle root of a list of leaves"
    }

    fn validate(&self, args: MerkleRootArgs, limits: &DispatchConfig) -> DispatchResult<Self::Input> {
        let leaves = decode_leaves(&args.leaves, args.encoding.as_deref(), limits)?;
        Ok((leaves, args::algorithm(args.algorithm.as_deref())?))
    }

    fn execute(&self, (leaves, algorithm): Self::Input) -> DispatchResult<MerkleRootOutput> {
        let tree = MerkleTree::build(&leaves, algorithm)?;
        Ok(MerkleRootOutput {
            root: tree.root().clone(),
            algorithm,
            leaf_count: tree.leaf_count(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProofArgs {
    pub leaves: Vec<String>,
    pub leaf_index: IntArg,
    pub algorithm: Option<String>,
    pub encoding: Option<String>,
}

pub struct MerkleProofInput {
    leaves: Vec<Vec<u8>>,
    index: usize,
    algorithm: HashAlgorithm,
}

/// `merkle_proof`: inclusion proof for one leaf.
pub struct MerkleProofOp;

impl Operation for MerkleProofOp {
    type Args = MerkleProofArgs;
    type Input = MerkleProofInput;
    type Output = MerkleProof;

    fn name(&self) -> &'static str {
        "merkle_proof"
    }

    fn description(&self) -> &'static str {
        "Generate an inclusion proof for the leaf at leafIndex"
    }

    fn validate(
        &self,
        args: MerkleProofArgs,
        limits: &DispatchConfig,
    ) -> DispatchResult<MerkleProofInput> {
        let index = args.leaf_index.non_negative("leafIndex")?;
        let leaves = decode_leaves(&args.leaves, args.encoding.as_deref(), limits)?;
        if index >= leaves.len() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                leaf_count: leaves.len(),
            }
            .into());
        }
        Ok(MerkleProofInput {
            leaves,
            index,
            algorithm: args::algorithm(args.algorithm.as_deref())?,
        })
    }

    fn execute(&self, input: MerkleProofInput) -> DispatchResult<MerkleProof> {
        let tree = MerkleTree::build(&input.leaves, input.algorithm)?;
        Ok(tree.proof(input.index)?)
    }
}

/// A proof as it arrives on the wire. Digests stay hex strings until
/// `validate`, so bad hex is reported as an encoding failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofArgs {
    pub leaf: String,
    pub leaf_index: IntArg,
    pub siblings: Vec<Option<String>>,
    pub root: String,
    pub tree_size: IntArg,
}

impl ProofArgs {
    fn decode(self) -> DispatchResult<MerkleProof> {
        let digest = |hex: &str| args::hex_bytes(hex).map(Digest::from_bytes);
        let siblings = self
            .siblings
            .iter()
            .map(|s| s.as_deref().map(digest).transpose())
            .collect::<DispatchResult<Vec<_>>>()?;
        Ok(MerkleProof {
            leaf: digest(&self.leaf)?,
            leaf_index: self.leaf_index.non_negative("leafIndex")?,
            siblings,
            root: digest(&self.root)?,
            tree_size: self.tree_size.non_negative("treeSize")?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyMerkleProofArgs {
    pub proof: ProofArgs,
    pub algorithm: Option<String>,
}

/// `verify_merkle_proof`: recompute the root from a proof.
pub struct VerifyMerkleProofOp;

impl Operation for VerifyMerkleProofOp {
    type Args = VerifyMerkleProofArgs;
    type Input = (MerkleProof, HashAlgorithm);
    type Output = Validity;

    fn name(&self) -> &'static str {
        "verify_merkle_proof"
    }

    fn description(&self) -> &'static str {
        "Verify a Merkle inclusion proof against its root"
    }

    fn validate(
        &self,
        args: VerifyMerkleProofArgs,
        _limits: &DispatchConfig,
    ) -> DispatchResult<Self::Input> {
        let algorithm = args::algorithm(args.algorithm.as_deref())?;
        Ok((args.proof.decode()?, algorithm))
    }

    fn execute(&self, (proof, algorithm): Self::Input) -> DispatchResult<Validity> {
        Ok(Validity {
            valid: proof.verify(algorithm),
        })
    }
}
