use std::sync::Arc;

use crate::store::LedgerStore;

/// Repository for account balance lookups.
///
/// Balances live on the ledger's internal balance sheet, the stand-in for
/// the chain's native token accounts.
pub struct AccountRepository {
    store: Arc<LedgerStore>,
}

impl AccountRepository {
    /// Create a new AccountRepository
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Current balance of an address (0 for unknown addresses)
    pub async fn balance_of(&self, address: &str) -> u64 {
        self.store.read().await.balance_of(address)
    }
}
