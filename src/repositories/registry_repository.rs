use std::sync::Arc;

use crate::models::Group;
use crate::store::LedgerStore;

/// Repository over the public discovery index.
///
/// The index is append-only and sequential: position N holds the id of the
/// N-th publicly listed group ever created.
pub struct RegistryRepository {
    store: Arc<LedgerStore>,
}

impl RegistryRepository {
    /// Create a new RegistryRepository
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Number of publicly listed groups
    pub async fn count(&self) -> u64 {
        self.store.read().await.public_group_count()
    }

    /// Full group record at a registry index
    pub async fn find_by_index(&self, index: u64) -> Option<Group> {
        let state = self.store.read().await;
        let group_id = state.public_group_id_at(index)?;
        state.group(group_id).cloned()
    }

    /// Page through public groups in listing order
    pub async fn list(&self, limit: usize, offset: usize) -> Vec<Group> {
        let state = self.store.read().await;
        state
            .public_group_ids()
            .iter()
            .skip(offset)
            .take(limit)
            .filter_map(|id| state.group(id).cloned())
            .collect()
    }
}
