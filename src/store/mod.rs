//! Ledger store: the single authoritative copy of all savings-group state.
//!
//! One `RwLock` guards the whole arena. Mutating operations take the write
//! lock exactly once, validate every rule against the guarded state, and
//! only then apply their writes — the total-order serialization point that
//! stands in for a chain's transaction ordering. Reads share the read lock
//! and observe the last committed write.

pub mod state;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

pub use state::LedgerState;

/// Snapshot format version; bumped on incompatible layout changes
const SNAPSHOT_VERSION: u32 = 1;

/// Store-level (infrastructure) errors: snapshot I/O and format problems
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported snapshot version {0} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion(u32),
}

/// On-disk snapshot envelope
#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    saved_at: NaiveDateTime,
    state: LedgerState,
}

/// Durable handle over the ledger state.
pub struct LedgerStore {
    state: RwLock<LedgerState>,
    snapshot_path: Option<PathBuf>,
}

impl LedgerStore {
    /// Create an empty, non-persistent store (tests and embedders)
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            snapshot_path: None,
        }
    }

    /// Open a store backed by a snapshot file, loading it if present
    pub fn open(snapshot_path: PathBuf) -> Result<Self, StoreError> {
        let state = if snapshot_path.exists() {
            let raw = std::fs::read_to_string(&snapshot_path)?;
            let snapshot: Snapshot = serde_json::from_str(&raw)?;
            if snapshot.version != SNAPSHOT_VERSION {
                return Err(StoreError::UnsupportedVersion(snapshot.version));
            }
            info!(
                "Loaded ledger snapshot from {:?} (saved at {}, block height {})",
                snapshot_path,
                snapshot.saved_at,
                snapshot.state.block_height()
            );
            snapshot.state
        } else {
            info!("No snapshot at {:?}, starting with an empty ledger", snapshot_path);
            LedgerState::default()
        };

        Ok(Self {
            state: RwLock::new(state),
            snapshot_path: Some(snapshot_path),
        })
    }

    /// Persist the current state; a no-op for in-memory stores.
    ///
    /// Writes to a sibling temp file first so a crash mid-write cannot
    /// truncate the previous snapshot.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let snapshot = {
            let state = self.state.read().await;
            Snapshot {
                version: SNAPSHOT_VERSION,
                saved_at: chrono::Utc::now().naive_utc(),
                state: state.clone(),
            }
        };

        let json = serde_json::to_string(&snapshot)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Shared read access; observes a consistent committed snapshot
    pub async fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().await
    }

    /// Exclusive write access; hold for the full check-then-commit span
    pub async fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().await
    }

    /// Current logical block height
    pub async fn block_height(&self) -> u64 {
        self.state.read().await.block_height()
    }

    /// Advance the logical clock, returning the new height
    pub async fn advance_blocks(&self, blocks: u64) -> u64 {
        self.state.write().await.advance_blocks(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trip() {
        let dir = std::env::temp_dir().join("coopsave-store-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ledger.json");
        let _ = std::fs::remove_file(&path);

        tokio_test::block_on(async {
            let store = LedgerStore::open(path.clone()).unwrap();
            store.advance_blocks(42).await;
            store.write().await.credit("addr-1", 500).unwrap();
            store.persist().await.unwrap();

            let reopened = LedgerStore::open(path.clone()).unwrap();
            assert_eq!(reopened.block_height().await, 42);
            assert_eq!(reopened.read().await.balance_of("addr-1"), 500);
        });

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_in_memory_persist_is_noop() {
        tokio_test::block_on(async {
            let store = LedgerStore::in_memory();
            store.advance_blocks(1).await;
            store.persist().await.unwrap();
        });
    }
}
