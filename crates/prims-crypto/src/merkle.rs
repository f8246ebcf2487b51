use prims_types::{Digest, HashAlgorithm};
use serde::{Deserialize, Serialize};

use crate::hasher::Hasher;

/// Binary Merkle tree over a batch of byte strings.
///
/// Leaf digest = `hash(element)`. Internal digest = `hash(left || right)`.
/// Levels pair nodes left to right; when a level has an odd count the last
/// node is promoted to the next level unchanged (it is never duplicated).
#[derive(Clone, Debug)]
pub struct MerkleTree {
    hasher: Hasher,
    /// Level 0 = leaf digests, last level = `[root]`.
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Hash each element and build the tree.
    pub fn build<I, B>(elements: I, algorithm: HashAlgorithm) -> Result<Self, MerkleError>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let hasher = Hasher::new(algorithm);
        let leaves = elements
            .into_iter()
            .map(|e| hasher.hash(e.as_ref()))
            .collect();
        Self::from_leaf_digests(leaves, algorithm)
    }

    /// Build from already-hashed leaves.
    pub fn from_leaf_digests(
        leaves: Vec<Digest>,
        algorithm: HashAlgorithm,
    ) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::Empty);
        }

        let hasher = Hasher::new(algorithm);
        let mut levels = vec![leaves];

        while let Some(current) = levels.last().filter(|l| l.len() > 1) {
            let next = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hasher.combine(left.as_bytes(), right.as_bytes()),
                    // Odd node: promoted as-is
                    _ => pair[0].clone(),
                })
                .collect();
            levels.push(next);
        }

        Ok(Self { hasher, levels })
    }

    /// The root digest.
    pub fn root(&self) -> &Digest {
        // levels is never empty and its last level holds exactly the root
        &self.levels[self.levels.len() - 1][0]
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.hasher.algorithm()
    }

    /// Number of levels above the leaves (the proof length).
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Generate an inclusion proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<MerkleProof, MerkleError> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(MerkleError::IndexOutOfRange { index, leaf_count });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut idx = index;
        for level in &self.levels[..self.depth()] {
            // `None` when this node was the unpaired last one
            siblings.push(level.get(idx ^ 1).cloned());
            idx /= 2;
        }

        Ok(MerkleProof {
            leaf: self.levels[0][index].clone(),
            leaf_index: index,
            siblings,
            root: self.root().clone(),
            tree_size: leaf_count,
        })
    }
}

/// Merkle inclusion proof.
///
/// `siblings` runs bottom to top with one entry per level; a `None` entry
/// marks a level where the node was promoted without a partner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof {
    /// Digest of the leaf being proven.
    pub leaf: Digest,
    pub leaf_index: usize,
    pub siblings: Vec<Option<Digest>>,
    /// Expected root digest.
    pub root: Digest,
    pub tree_size: usize,
}

impl MerkleProof {
    /// Recompute the root from the leaf and sibling path.
    ///
    /// The path must have exactly the shape that `leaf_index` and
    /// `tree_size` imply: a sibling wherever the node had a partner and a
    /// pass-through wherever it was promoted. Any other shape is `false`.
    pub fn verify(&self, algorithm: HashAlgorithm) -> bool {
        if self.leaf_index >= self.tree_size {
            return false;
        }

        let hasher = Hasher::new(algorithm);
        let mut current = self.leaf.clone();
        let mut idx = self.leaf_index;
        let mut width = self.tree_size;
        let mut steps = self.siblings.iter();

        while width > 1 {
            let Some(step) = steps.next() else {
                return false;
            };
            let has_partner = idx % 2 == 1 || idx + 1 < width;
            current = match (step, has_partner) {
                (Some(sibling), true) if idx % 2 == 0 => {
                    hasher.combine(current.as_bytes(), sibling.as_bytes())
                }
                (Some(sibling), true) => hasher.combine(sibling.as_bytes(), current.as_bytes()),
                (None, false) => current,
                _ => return false,
            };
            idx /= 2;
            width = width.div_ceil(2);
        }

        steps.next().is_none() && current == self.root
    }
}

/// Root of the tree over `elements`.
pub fn merkle_root<I, B>(elements: I, algorithm: HashAlgorithm) -> Result<Digest, MerkleError>
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    MerkleTree::build(elements, algorithm).map(|tree| tree.root().clone())
}

/// Inclusion proof for `elements[index]`.
pub fn merkle_proof<I, B>(
    elements: I,
    index: usize,
    algorithm: HashAlgorithm,
) -> Result<MerkleProof, MerkleError>
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    MerkleTree::build(elements, algorithm)?.proof(index)
}

/// Errors from Merkle operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum MerkleError {
    #[error("merkle tree requires at least one leaf")]
    Empty,

    #[error("leaf index {index} out of range for {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALG: HashAlgorithm = HashAlgorithm::Sha256;

    fn elements(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| format!("leaf-{i}").into_bytes()).collect()
    }

    fn h(data: &[u8]) -> Digest {
        Hasher::new(ALG).hash(data)
    }

    fn combine(l: &Digest, r: &Digest) -> Digest {
        Hasher::new(ALG).combine(l.as_bytes(), r.as_bytes())
    }

    #[test]
    fn empty_tree_is_an_error() {
        let err = MerkleTree::build(Vec::<Vec<u8>>::new(), ALG).unwrap_err();
        assert_eq!(err, MerkleError::Empty);
    }

    #[test]
    fn single_leaf_is_root() {
        let tree = MerkleTree::build([b"only"], ALG).unwrap();
        assert_eq!(*tree.root(), h(b"only"));
        let proof = tree.proof(0).unwrap();
        assert!(proof.siblings.is_empty());
        assert!(proof.verify(ALG));
    }

    #[test]
    fn two_leaves_produce_parent() {
        let tree = MerkleTree::build([b"a", b"b"], ALG).unwrap();
        assert_eq!(*tree.root(), combine(&h(b"a"), &h(b"b")));
    }

    #[test]
    fn odd_node_is_promoted_not_duplicated() {
        let tree = MerkleTree::build([b"a", b"b", b"c"], ALG).unwrap();
        let expected = combine(&combine(&h(b"a"), &h(b"b")), &h(b"c"));
        assert_eq!(*tree.root(), expected);
        let duplicated = combine(
            &combine(&h(b"a"), &h(b"b")),
            &combine(&h(b"c"), &h(b"c")),
        );
        assert_ne!(*tree.root(), duplicated);
    }

    #[test]
    fn promoted_leaf_records_pass_through() {
        let tree = MerkleTree::build(elements(5), ALG).unwrap();
        let proof = tree.proof(4).unwrap();
        // widths 5 -> 3 -> 2 -> 1: promoted twice, then paired with the left subtree
        assert_eq!(proof.siblings.len(), 3);
        assert!(proof.siblings[0].is_none());
        assert!(proof.siblings[1].is_none());
        assert!(proof.siblings[2].is_some());
        assert!(proof.verify(ALG));
    }

    #[test]
    fn proof_verifies_for_all_leaves() {
        let leaves = elements(7);
        let tree = MerkleTree::build(&leaves, ALG).unwrap();
        for (i, leaf) in leaves.iter().enumerate() {
            let proof = tree.proof(i).unwrap();
            assert_eq!(proof.leaf, h(leaf));
            assert_eq!(proof.tree_size, 7);
            assert!(proof.verify(ALG), "proof for leaf {i} should verify");
        }
    }

    #[test]
    fn power_of_two_leaves() {
        let tree = MerkleTree::build(elements(8), ALG).unwrap();
        for i in 0..8 {
            let proof = tree.proof(i).unwrap();
            assert!(proof.verify(ALG));
            assert_eq!(proof.siblings.len(), 3);
            assert!(proof.siblings.iter().all(Option::is_some));
        }
    }

    #[test]
    fn proof_out_of_bounds_is_an_error() {
        let tree = MerkleTree::build(elements(2), ALG).unwrap();
        assert_eq!(
            tree.proof(5).unwrap_err(),
            MerkleError::IndexOutOfRange { index: 5, leaf_count: 2 }
        );
    }

    #[test]
    fn tampered_leaf_fails_verification() {
        let mut proof = merkle_proof(elements(4), 0, ALG).unwrap();
        proof.leaf = h(b"forged");
        assert!(!proof.verify(ALG));
    }

    #[test]
    fn tampered_sibling_fails_verification() {
        let mut proof = merkle_proof(elements(6), 3, ALG).unwrap();
        proof.siblings[1] = Some(h(b"forged"));
        assert!(!proof.verify(ALG));
    }

    #[test]
    fn tampered_root_fails_verification() {
        let mut proof = merkle_proof(elements(6), 3, ALG).unwrap();
        proof.root = h(b"forged");
        assert!(!proof.verify(ALG));
    }

    #[test]
    fn malformed_shape_fails_verification() {
        let mut proof = merkle_proof(elements(5), 4, ALG).unwrap();
        proof.siblings.push(None);
        assert!(!proof.verify(ALG));

        let mut proof = merkle_proof(elements(5), 4, ALG).unwrap();
        proof.siblings[0] = Some(h(b"x"));
        assert!(!proof.verify(ALG));

        let mut proof = merkle_proof(elements(5), 1, ALG).unwrap();
        proof.leaf_index = 9;
        assert!(!proof.verify(ALG));
    }

    #[test]
    fn wrong_algorithm_fails_verification() {
        let proof = merkle_proof(elements(4), 2, ALG).unwrap();
        assert!(!proof.verify(HashAlgorithm::Blake3));
    }

    #[test]
    fn changing_any_leaf_changes_root() {
        let leaves = elements(9);
        let root = merkle_root(&leaves, ALG).unwrap();
        for i in 0..leaves.len() {
            let mut changed = leaves.clone();
            changed[i].push(b'!');
            assert_ne!(merkle_root(&changed, ALG).unwrap(), root, "leaf {i}");
        }
    }

    #[test]
    fn every_algorithm_builds_and_proves() {
        for alg in HashAlgorithm::ALL {
            let tree = MerkleTree::build(elements(3), alg).unwrap();
            assert_eq!(tree.root().len(), alg.output_len());
            assert!(tree.proof(2).unwrap().verify(alg));
        }
    }

    #[test]
    fn proof_serde_roundtrip() {
        let proof = merkle_proof(elements(5), 4, ALG).unwrap();
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["leafIndex"], 4);
        assert_eq!(json["treeSize"], 5);
        assert!(json["siblings"][0].is_null());
        let parsed: MerkleProof = serde_json::from_value(json).unwrap();
        assert_eq!(proof, parsed);
        assert!(parsed.verify(ALG));
    }

    proptest! {
        #[test]
        fn every_proof_verifies(n in 1usize..48) {
            let tree = MerkleTree::build(elements(n), ALG).unwrap();
            for i in 0..n {
                prop_assert!(tree.proof(i).unwrap().verify(ALG));
            }
        }
    }
}
