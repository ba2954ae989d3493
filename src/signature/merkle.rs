//! Sorted-pair merkle trees for bulk signatures.
//!
//! Pairs are hashed as `keccak(min(a, b) ‖ max(a, b))`, so a root depends only
//! on the set of siblings along the path, never on left/right position, and
//! proofs carry no direction bits.

use alloy_primitives::{Keccak256, B256};

/// Commutative pair hash
pub fn hash_pair(a: B256, b: B256) -> B256 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Keccak256::new();
    hasher.update(low);
    hasher.update(high);
    hasher.finalize()
}

/// Fold `proof` over `leaf`
pub fn compute_root(leaf: B256, proof: &[B256]) -> B256 {
    proof.iter().fold(leaf, |node, sibling| hash_pair(node, *sibling))
}

/// Tree an off-chain signer builds to sign many orders at once.
///
/// Leaves are padded with the zero digest to a power of two (at least two),
/// so every proof has the same length: the tree depth.
///
/// ## Example
///
/// ```
/// use alloy_primitives::B256;
/// use nft_exchange::signature::{compute_root, BulkTree};
///
/// let leaves: Vec<B256> = (1..=3).map(B256::repeat_byte).collect();
/// let tree = BulkTree::new(&leaves);
/// assert_eq!(tree.depth(), 2);
///
/// let proof = tree.proof(2).unwrap();
/// assert_eq!(compute_root(leaves[2], &proof), tree.root());
/// ```
#[derive(Debug, Clone)]
pub struct BulkTree {
    /// `layers[0]` is the padded leaf layer, the last layer holds the root
    layers: Vec<Vec<B256>>,
    leaf_count: usize,
}

impl BulkTree {
    pub fn new(leaves: &[B256]) -> Self {
        let width = leaves.len().max(2).next_power_of_two();
        let mut layer = leaves.to_vec();
        layer.resize(width, B256::ZERO);

        let mut layers = vec![layer];
        while layers[layers.len() - 1].len() > 1 {
            let next = layers[layers.len() - 1]
                .chunks(2)
                .map(|pair| hash_pair(pair[0], pair[1]))
                .collect();
            layers.push(next);
        }

        Self {
            layers,
            leaf_count: leaves.len(),
        }
    }

    pub fn root(&self) -> B256 {
        self.layers[self.layers.len() - 1][0]
    }

    /// Proof length
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Sibling path of leaf `index`, or `None` past the real leaves
    pub fn proof(&self, index: usize) -> Option<Vec<B256>> {
        if index >= self.leaf_count {
            return None;
        }
        let mut position = index;
        let proof = self.layers[..self.depth()]
            .iter()
            .map(|layer| {
                let sibling = layer[position ^ 1];
                position /= 2;
                sibling
            })
            .collect();
        Some(proof)
    }
}
