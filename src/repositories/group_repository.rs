use std::sync::Arc;

use crate::models::Group;
use crate::store::LedgerStore;

/// Repository for group record access
pub struct GroupRepository {
    store: Arc<LedgerStore>,
}

impl GroupRepository {
    /// Create a new GroupRepository
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Find a group by its externally chosen id
    pub async fn find_by_id(&self, group_id: &str) -> Option<Group> {
        self.store.read().await.group(group_id).cloned()
    }

    /// Whether a group exists under the given id
    pub async fn exists(&self, group_id: &str) -> bool {
        self.store.read().await.contains_group(group_id)
    }

    /// All groups created by the given address, ordered by creation block
    pub async fn find_by_creator(&self, creator: &str) -> Vec<Group> {
        let state = self.store.read().await;
        let mut groups: Vec<Group> = state
            .groups()
            .filter(|g| g.creator == creator)
            .cloned()
            .collect();
        groups.sort_by_key(|g| g.created_at_block);
        groups
    }
}
