use std::sync::Arc;

use crate::models::Contribution;
use crate::state_digest::{self, ContributionProof};
use crate::store::LedgerStore;

/// Repository for per-cycle contribution record access
pub struct ContributionRepository {
    store: Arc<LedgerStore>,
}

impl ContributionRepository {
    /// Create a new ContributionRepository
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Find one contribution record by group, address and cycle
    pub async fn find(&self, group_id: &str, address: &str, cycle: u32) -> Option<Contribution> {
        self.store
            .read()
            .await
            .contribution(group_id, address, cycle)
            .cloned()
    }

    /// Whether the member has a paid contribution for the cycle
    pub async fn has_paid(&self, group_id: &str, address: &str, cycle: u32) -> bool {
        self.store.read().await.has_paid(group_id, address, cycle)
    }

    /// Paid contributions for one cycle
    pub async fn paid_for_cycle(&self, group_id: &str, cycle: u32) -> Vec<Contribution> {
        self.store
            .read()
            .await
            .paid_contributions_for_cycle(group_id, cycle)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Sum of paid contributions for one cycle
    pub async fn total_for_cycle(&self, group_id: &str, cycle: u32) -> u64 {
        self.store
            .read()
            .await
            .paid_contributions_for_cycle(group_id, cycle)
            .iter()
            .map(|c| c.amount)
            .sum()
    }

    /// Merkle root committing to every paid contribution of the group
    pub async fn contribution_root(&self, group_id: &str) -> Vec<u8> {
        let state = self.store.read().await;
        let contributions = state.paid_contributions(group_id);
        state_digest::contribution_root(&contributions)
    }

    /// Merkle root plus one inclusion proof per paid contribution
    pub async fn contribution_proofs(&self, group_id: &str) -> (Vec<u8>, Vec<ContributionProof>) {
        let state = self.store.read().await;
        let contributions = state.paid_contributions(group_id);
        state_digest::contribution_proofs(&contributions)
    }
}
