//! Binary Merkle tree over fixed-size leaves with inclusion proofs.
//!
//! Behavior:
//! - The tree is left-leaning complete: every level is full except possibly
//!   the last, which is filled from the left. Internal nodes may have a
//!   single left child.
//! - A leaf's label is the raw block bytes; an internal node's label is the
//!   hash of its children's labels (or of the left label alone when the
//!   right child is absent).
//! - The tree root commits to the leaf count: `root_hash = H(root_label ‖
//!   le_u64(count))`, and `H(le_u64(0))` for the empty tree.
//! - Trees are built once from an ordered leaf sequence and immutable
//!   thereafter.
//!
//! The hasher is a type parameter (default Keccak-256); verifying a proof
//! against a [`TreeRoot`] names the hasher at the call site. Nothing in this
//! module touches shared state.

use sha3::{Digest, Keccak256};
use std::marker::PhantomData;
use thiserror::Error;

/// Structural or label violations detected by [`BinaryTree::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MerkleError {
    /// Stored leaf count disagrees with the number of reachable leaves.
    #[error("incorrect count: was {actual}, should be {expected}")]
    CountMismatch { expected: u64, actual: u64 },
    /// Tree (or subtree) height disagrees with the leaf count.
    #[error("incorrect height: was {actual}, should be {expected}")]
    HeightMismatch { expected: u32, actual: u32 },
    /// An internal node's label is not the hash of its children.
    #[error("node label mismatch")]
    LabelMismatch,
    /// A node has a right child but no left child.
    #[error("node missing first child, but has second")]
    DanglingRightChild,
    /// The stored root hash does not commit to the root label and count.
    #[error("incorrect root hash")]
    RootHashMismatch,
    /// A proof was requested for a leaf index outside the tree.
    #[error("leaf index {index} out of range for {count} leaves")]
    IndexOutOfRange { index: u64, count: u64 },
}

/// A node in the tree. Leaves carry block bytes; internal nodes carry the
/// hash of their children.
#[derive(Debug, Clone)]
pub struct Node {
    label: Vec<u8>,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    /// Returns this node's label bytes.
    pub fn label(&self) -> &[u8] {
        &self.label
    }
}

/// An immutable left-leaning complete binary Merkle tree.
#[derive(Debug, Clone)]
pub struct BinaryTree<H: Digest = Keccak256> {
    count: u64,
    root: Option<Node>,
    root_hash: Vec<u8>,
    _hasher: PhantomData<H>,
}

/// The published root of a tree, for verifiers that do not store the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRoot {
    /// Number of leaves the root commits to.
    pub count: u64,
    /// The count-committing root hash.
    pub hash: Vec<u8>,
}

/// Returns the height of a tree holding `count` leaves: the number of nodes
/// on any root-to-leaf path. Zero for the empty tree.
pub fn height_for(count: u64) -> u32 {
    if count == 0 {
        return 0;
    }
    let mut height = 0u32;
    while (count as u128) > (1u128 << height) {
        height += 1;
    }
    height + 1
}

/// Splits `data` into segments of `segment_size` bytes; the final segment
/// keeps whatever remains. A zero segment size yields no segments.
pub fn split_blocks(data: &[u8], segment_size: usize) -> Vec<&[u8]> {
    if segment_size == 0 {
        return Vec::new();
    }
    data.chunks(segment_size).collect()
}

/// Builds a tree over `data` split into `segment_size`-byte segments and
/// validates it, returning the tree and its published root.
pub fn build_bmt<H: Digest>(
    data: &[u8],
    segment_size: usize,
) -> Result<(BinaryTree<H>, TreeRoot), MerkleError> {
    let blocks = split_blocks(data, segment_size);
    let tree = BinaryTree::<H>::build(&blocks);
    tree.validate()?;
    let root = tree.root();
    Ok((tree, root))
}

impl<H: Digest> BinaryTree<H> {
    /// Builds a tree from an ordered sequence of leaf blocks.
    ///
    /// Leaf labels are the block bytes as-is; the caller is responsible for
    /// any padding. An empty sequence yields the empty tree.
    pub fn build<B: AsRef<[u8]>>(blocks: &[B]) -> Self {
        let count = blocks.len() as u64;
        let height = height_for(count);
        let (root, _rest) = build_node::<H, B>(blocks, height);
        let root_label = root.as_ref().map(|n| n.label.as_slice()).unwrap_or(&[]);
        let root_hash = count_hash::<H>(count, root_label);
        Self {
            count,
            root,
            root_hash,
            _hasher: PhantomData,
        }
    }

    /// Number of leaves in the tree.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The count-committing root hash.
    pub fn root_hash(&self) -> &[u8] {
        &self.root_hash
    }

    /// The published root for verifiers.
    pub fn root(&self) -> TreeRoot {
        TreeRoot {
            count: self.count,
            hash: self.root_hash.clone(),
        }
    }

    /// Recomputes every internal label bottom-up and the root hash,
    /// returning the first violation found.
    ///
    /// All trees produced by [`build`](Self::build) pass; a failure means
    /// the tree was constructed or modified incorrectly.
    pub fn validate(&self) -> Result<(), MerkleError> {
        let (count, height) = validate_node::<H>(self.root.as_ref())?;
        if count != self.count {
            return Err(MerkleError::CountMismatch {
                expected: count,
                actual: self.count,
            });
        }
        let expected_height = height_for(count);
        if height != expected_height {
            return Err(MerkleError::HeightMismatch {
                expected: expected_height,
                actual: height,
            });
        }
        let root_label = self.root.as_ref().map(|n| n.label.as_slice()).unwrap_or(&[]);
        if count_hash::<H>(self.count, root_label) != self.root_hash {
            return Err(MerkleError::RootHashMismatch);
        }
        Ok(())
    }

    /// Returns the sibling chain proving inclusion of the leaf at `index`,
    /// leaf label first.
    ///
    /// Levels where the path's node has no sibling (the left-leaning edge of
    /// the tree) contribute no entry.
    pub fn inclusion_proof(&self, index: u64) -> Result<Vec<Vec<u8>>, MerkleError> {
        if index >= self.count {
            return Err(MerkleError::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        let root = match self.root.as_ref() {
            Some(root) => root,
            None => {
                return Err(MerkleError::IndexOutOfRange {
                    index,
                    count: self.count,
                })
            }
        };
        Ok(prove_node(height_for(self.count), root, index))
    }
}

impl TreeRoot {
    /// Creates a published root from a count and hash.
    pub fn new(count: u64, hash: Vec<u8>) -> Self {
        Self { count, hash }
    }

    /// Verifies an inclusion proof for the leaf at `index`.
    ///
    /// Recomputes the root by consuming `proof` from the top sibling down
    /// and compares the count-committing hash against this root. Returns
    /// false for any corrupted label, wrong index or wrong count.
    pub fn check_proof<H: Digest>(&self, proof: &[Vec<u8>], index: u64) -> bool {
        let height = height_for(self.count);
        match check_node::<H>(height, proof, index, self.count) {
            Some(label) => count_hash::<H>(self.count, &label) == self.hash,
            None => false,
        }
    }
}

/// Hash of a node label pair; with a single left child, hash of that label
/// alone.
fn node_hash<H: Digest>(left: Option<&Node>, right: Option<&Node>) -> Vec<u8> {
    let mut hasher = H::new();
    if let Some(left) = left {
        hasher.update(&left.label);
        if let Some(right) = right {
            hasher.update(&right.label);
        }
    }
    hasher.finalize().to_vec()
}

/// The count-committing hash: `H(label ‖ le_u64(count))`.
fn count_hash<H: Digest>(count: u64, label: &[u8]) -> Vec<u8> {
    let mut hasher = H::new();
    hasher.update(label);
    hasher.update(count.to_le_bytes());
    hasher.finalize().to_vec()
}

/// Builds a subtree of the given height from the front of `data`, returning
/// the node and the blocks it did not consume.
fn build_node<'a, H: Digest, B: AsRef<[u8]>>(
    data: &'a [B],
    height: u32,
) -> (Option<Node>, &'a [B]) {
    if height == 0 || data.is_empty() {
        return (None, data);
    }
    if height == 1 {
        let leaf = Node {
            label: data[0].as_ref().to_vec(),
            left: None,
            right: None,
        };
        return (Some(leaf), &data[1..]);
    }
    let (left, rest) = build_node::<H, B>(data, height - 1);
    let (right, rest) = build_node::<H, B>(rest, height - 1);
    let label = node_hash::<H>(left.as_ref(), right.as_ref());
    let node = Node {
        label,
        left: left.map(Box::new),
        right: right.map(Box::new),
    };
    (Some(node), rest)
}

/// Recomputes labels below `node`, returning its leaf count and height.
fn validate_node<H: Digest>(node: Option<&Node>) -> Result<(u64, u32), MerkleError> {
    let node = match node {
        Some(node) => node,
        None => return Ok((0, 0)),
    };
    if node.left.is_none() {
        if node.right.is_some() {
            return Err(MerkleError::DanglingRightChild);
        }
        // Leaf: label is arbitrary block data.
        return Ok((1, 1));
    }

    let (mut count, height) = validate_node::<H>(node.left.as_deref())?;
    if let Some(right) = node.right.as_deref() {
        let (right_count, right_height) = validate_node::<H>(Some(right))?;
        count += right_count;
        if right_height != height {
            return Err(MerkleError::HeightMismatch {
                expected: height,
                actual: right_height,
            });
        }
    }
    if node_hash::<H>(node.left.as_deref(), node.right.as_deref()) != node.label {
        return Err(MerkleError::LabelMismatch);
    }
    Ok((count, height + 1))
}

/// Collects sibling labels from the leaf at `index` up to `node`, leaf label
/// first. `index` must be in range for the subtree.
fn prove_node(height: u32, node: &Node, index: u64) -> Vec<Vec<u8>> {
    if height == 1 {
        debug_assert_eq!(index, 0);
        return vec![node.label.clone()];
    }
    let child_index = (index >> (height - 2)) & 1;
    let next_index = index & !(1u64 << (height - 2));
    let (child, sibling) = if child_index == 0 {
        (node.left.as_deref(), node.right.as_deref())
    } else {
        (node.right.as_deref(), node.left.as_deref())
    };
    let mut proof = match child {
        Some(child) => prove_node(height - 1, child, next_index),
        None => Vec::new(),
    };
    if let Some(sibling) = sibling {
        proof.push(sibling.label.clone());
    }
    proof
}

/// Recomputes the label of a `height`-tall subtree holding `count` leaves
/// from `proof`, consuming siblings from the back. `None` on any
/// inconsistency.
///
/// The left subtree of a node at height `h` is full and holds
/// `cap = 1 << (h - 2)` leaves whenever the node holds more than `cap`;
/// otherwise the right child is absent and no sibling is consumed at that
/// level.
fn check_node<H: Digest>(
    height: u32,
    proof: &[Vec<u8>],
    index: u64,
    count: u64,
) -> Option<Vec<u8>> {
    if proof.is_empty() || index >= count {
        return None;
    }
    if height == 1 {
        if index != 0 || proof.len() != 1 {
            return None;
        }
        return Some(proof[0].clone());
    }

    let cap = 1u64 << (height - 2);
    let child_index = (index >> (height - 2)) & 1;
    let next_index = index & !cap;
    let last = proof.len() - 1;

    let mut hasher = H::new();
    if child_index == 1 {
        // Descending right: the full left subtree's label is the sibling.
        let label = check_node::<H>(height - 1, &proof[..last], next_index, count - cap)?;
        hasher.update(&proof[last]);
        hasher.update(&label);
    } else {
        let next_count = count.min(cap);
        if count <= cap {
            // No right subtree at this level; nothing to consume.
            let label = check_node::<H>(height - 1, proof, next_index, next_count)?;
            hasher.update(&label);
        } else {
            let label = check_node::<H>(height - 1, &proof[..last], next_index, next_count)?;
            hasher.update(&label);
            hasher.update(&proof[last]);
        }
    }
    Some(hasher.finalize().to_vec())
}
