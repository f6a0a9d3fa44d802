use std::sync::Arc;

use crate::models::Member;
use crate::store::LedgerStore;

/// Repository for membership record access
pub struct MemberRepository {
    store: Arc<LedgerStore>,
}

impl MemberRepository {
    /// Create a new MemberRepository
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Find one member record by group and address
    pub async fn find(&self, group_id: &str, address: &str) -> Option<Member> {
        self.store.read().await.member(group_id, address).cloned()
    }

    /// Whether the address belongs to the group
    pub async fn is_member(&self, group_id: &str, address: &str) -> bool {
        self.store.read().await.is_member(group_id, address)
    }

    /// Members of a group ordered by payout position
    pub async fn list_by_group(&self, group_id: &str) -> Vec<Member> {
        self.store
            .read()
            .await
            .members_of(group_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Ids of every group the address has joined
    pub async fn groups_for_member(&self, address: &str) -> Vec<String> {
        self.store.read().await.groups_for_member(address)
    }
}
