//! Contribution commitments.
//!
//! Builds a Merkle root over a group's paid contributions so an embedding
//! application can publish a compact commitment to the contribution history
//! and hand individual members an inclusion proof for their deposits.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::Contribution;

/// One step of an inclusion proof: a sibling hash and which side it sits on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Vec<u8>,
    pub sibling_on_left: bool,
}

/// Inclusion proof for one paid contribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionProof {
    pub address: String,
    pub cycle: u32,
    pub leaf_hash: Vec<u8>,
    pub path: Vec<ProofStep>,
}

/// Hash a contribution into a leaf node
fn hash_leaf(contribution: &Contribution) -> Vec<u8> {
    let leaf_data = format!(
        "{}:{}:{}:{}:{}",
        contribution.group_id,
        contribution.address,
        contribution.cycle,
        contribution.amount,
        contribution.paid_at_block
    );

    let mut hasher = Sha256::new();
    hasher.update(leaf_data.as_bytes());
    hasher.finalize().to_vec()
}

/// Hash a pair of child hashes into their parent
fn hash_pair(left: &[u8], right: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().to_vec()
}

/// Deterministic leaf ordering: by (address, cycle)
fn sorted_leaves<'a>(contributions: &[&'a Contribution]) -> Vec<&'a Contribution> {
    let mut leaves = contributions.to_vec();
    leaves.sort_by(|a, b| (&a.address, a.cycle).cmp(&(&b.address, b.cycle)));
    leaves
}

/// Merkle root over the given paid contributions.
///
/// The empty set commits to the all-zero hash.
pub fn contribution_root(contributions: &[&Contribution]) -> Vec<u8> {
    let (root, _) = contribution_proofs(contributions);
    root
}

/// Merkle root plus one inclusion proof per contribution.
///
/// Odd nodes at any level are paired with themselves, so every proof step
/// records which side its sibling hashes on.
pub fn contribution_proofs(contributions: &[&Contribution]) -> (Vec<u8>, Vec<ContributionProof>) {
    if contributions.is_empty() {
        return (vec![0u8; 32], Vec::new());
    }

    let leaves = sorted_leaves(contributions);
    let mut proofs: Vec<ContributionProof> = leaves
        .iter()
        .map(|c| ContributionProof {
            address: c.address.clone(),
            cycle: c.cycle,
            leaf_hash: hash_leaf(c),
            path: Vec::new(),
        })
        .collect();

    // Position of each leaf's ancestor within the current level
    let mut positions: Vec<usize> = (0..leaves.len()).collect();
    let mut level: Vec<Vec<u8>> = proofs.iter().map(|p| p.leaf_hash.clone()).collect();

    while level.len() > 1 {
        for (leaf, pos) in positions.iter_mut().enumerate() {
            let (sibling_pos, sibling_on_left) = if *pos % 2 == 0 {
                // Duplicate the last node when the level has an odd count
                let sibling = if *pos + 1 < level.len() { *pos + 1 } else { *pos };
                (sibling, false)
            } else {
                (*pos - 1, true)
            };

            proofs[leaf].path.push(ProofStep {
                sibling: level[sibling_pos].clone(),
                sibling_on_left,
            });
            *pos /= 2;
        }

        let mut next_level = Vec::with_capacity((level.len() + 1) / 2);
        for pair in level.chunks(2) {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            next_level.push(hash_pair(left, right));
        }
        level = next_level;
    }

    (level.remove(0), proofs)
}

/// Verify an inclusion proof against a root
pub fn verify_proof(proof: &ContributionProof, root: &[u8]) -> bool {
    let mut current = proof.leaf_hash.clone();

    for step in &proof.path {
        current = if step.sibling_on_left {
            hash_pair(&step.sibling, &current)
        } else {
            hash_pair(&current, &step.sibling)
        };
    }

    current == root
}
