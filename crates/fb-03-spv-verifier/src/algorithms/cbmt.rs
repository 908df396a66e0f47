//! # Complete Binary Merkle Tree
//!
//! The Merkle tree CKB uses for transaction roots, and that history roots
//! reuse over tiny-header leaves.
//!
//! ## Layout
//!
//! For `n` leaves the tree is an array of `2n - 1` nodes. Leaf `i` sits at
//! node `n - 1 + i`, and `node[i] = merge(node[2i + 1], node[2i + 2])`.
//! `merge(a, b) = content_hash(a ‖ b)`. The root of an empty tree is the
//! zero hash; the root of a one-leaf tree is the leaf itself.
//!
//! ## Index Helpers
//!
//! | Helper | Formula | Valid for |
//! |--------|---------|-----------|
//! | `sibling(i)` | `((i + 1) ^ 1) - 1` | `i > 0` |
//! | `parent(i)` | `(i - 1) >> 1` | `i > 0` |
//! | `is_left(i)` | `i` odd | all |

use std::collections::VecDeque;

use shared_crypto::CkbHasher;
use shared_types::{Hash, ZERO_HASH};

/// Merge two nodes.
pub fn merge(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = CkbHasher::new();
    hasher.update(left).update(right);
    hasher.finalize()
}

/// Sibling node index. `index` must be non-zero.
pub fn sibling(index: u64) -> u64 {
    ((index + 1) ^ 1) - 1
}

/// Parent node index. `index` must be non-zero.
pub fn parent(index: u64) -> u64 {
    (index - 1) >> 1
}

/// True if `index` is a left child.
pub fn is_left(index: u64) -> bool {
    index & 1 == 1
}

/// Root over `leaves`.
pub fn build_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return ZERO_HASH;
    }
    let nodes = build_nodes(leaves);
    nodes[0]
}

fn build_nodes(leaves: &[Hash]) -> Vec<Hash> {
    let n = leaves.len();
    let mut nodes = vec![ZERO_HASH; n - 1];
    nodes.extend_from_slice(leaves);
    for i in (0..n - 1).rev() {
        nodes[i] = merge(&nodes[2 * i + 1], &nodes[2 * i + 2]);
    }
    nodes
}

/// `transactions_root` as committed in a CKB header.
pub fn transactions_root(raw_transactions_root: &Hash, witnesses_root: &Hash) -> Hash {
    merge(raw_transactions_root, witnesses_root)
}

/// Walk a single-leaf path from node `index` to the root.
///
/// Lemmas are siblings bottom-up. Returns `None` unless the lemmas are
/// exactly enough to reach the root.
pub fn single_proof_root(leaf: &Hash, index: u64, lemmas: &[Hash]) -> Option<Hash> {
    let mut current = *leaf;
    let mut index = index;
    let mut lemmas = lemmas.iter();

    while index > 0 {
        let lemma = lemmas.next()?;
        current = if index < sibling(index) {
            merge(&current, lemma)
        } else {
            merge(lemma, &current)
        };
        index = parent(index);
    }

    if lemmas.next().is_some() {
        return None;
    }
    Some(current)
}

/// Multi-leaf proof: node indices of the proven leaves plus lemmas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CbmtProof {
    /// Node indices, descending.
    pub indices: Vec<u64>,
    /// Sibling hashes in consumption order.
    pub lemmas: Vec<Hash>,
}

/// Reconstruct the root from leaves at node `indices` and `lemmas`.
///
/// Leaves are processed highest index first. Each node merges with its
/// sibling: the next queued node when that is the sibling, otherwise the
/// next lemma. The parent goes to the back of the queue. Reaching the root
/// with lemmas or queued nodes left over is a failure.
pub fn multi_proof_root(indices: &[u64], leaves: &[Hash], lemmas: &[Hash]) -> Option<Hash> {
    if leaves.is_empty() || indices.len() != leaves.len() {
        return None;
    }

    let mut nodes: Vec<(u64, Hash)> = indices.iter().copied().zip(leaves.iter().copied()).collect();
    nodes.sort_by(|a, b| b.0.cmp(&a.0));
    if nodes.windows(2).any(|w| w[0].0 == w[1].0) {
        return None;
    }

    let mut queue: VecDeque<(u64, Hash)> = nodes.into();
    let mut lemmas = lemmas.iter();

    while let Some((index, node)) = queue.pop_front() {
        if index == 0 {
            return if lemmas.next().is_none() && queue.is_empty() {
                Some(node)
            } else {
                None
            };
        }

        let sibling_index = sibling(index);
        let sibling_node = match queue.front() {
            Some((front, hash)) if *front == sibling_index => {
                let hash = *hash;
                queue.pop_front();
                hash
            }
            _ => *lemmas.next()?,
        };

        let parent_node = if is_left(index) {
            merge(&node, &sibling_node)
        } else {
            merge(&sibling_node, &node)
        };
        queue.push_back((parent(index), parent_node));
    }

    None
}

/// Build a proof for the leaves at positions `leaf_indices`.
pub fn build_proof(leaves: &[Hash], leaf_indices: &[u64]) -> Option<CbmtProof> {
    if leaves.is_empty() || leaf_indices.is_empty() {
        return None;
    }
    let n = leaves.len() as u64;
    let mut indices: Vec<u64> = leaf_indices.iter().map(|i| i + n - 1).collect();
    indices.sort_by(|a, b| b.cmp(a));
    indices.dedup();
    if indices[0] >= 2 * n - 1 {
        return None;
    }

    let nodes = build_nodes(leaves);
    let mut lemmas = Vec::new();
    let mut queue: VecDeque<u64> = indices.iter().copied().collect();

    while let Some(index) = queue.pop_front() {
        if index == 0 {
            break;
        }
        let sibling_index = sibling(index);
        if queue.front() == Some(&sibling_index) {
            queue.pop_front();
        } else {
            lemmas.push(nodes[sibling_index as usize]);
        }
        let parent_index = parent(index);
        if parent_index != 0 {
            queue.push_back(parent_index);
        }
    }

    Some(CbmtProof { indices, lemmas })
}
