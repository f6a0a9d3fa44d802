use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub timestamp: i64,
    pub operation: String, // "group_created", "member_joined", "deposit", etc.
    pub group_id: Option<String>,
    pub caller: Option<String>,
    pub details: serde_json::Value,
}

/// Audit trail service logging every successful mutating operation.
///
/// Entries are JSON lines appended to a dated file. The disabled
/// construction drops entries, for tests and embedders that opt out.
pub struct AuditTrailService {
    file_handle: Option<Arc<Mutex<std::fs::File>>>,
}

impl AuditTrailService {
    /// Create a new audit trail service writing under the given directory
    pub fn new(log_directory: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&log_directory)?;

        let date = chrono::Utc::now().format("%Y-%m-%d");
        let log_file = log_directory.join(format!("audit_{}.log", date));

        let file = OpenOptions::new().create(true).append(true).open(&log_file)?;

        info!("Audit trail initialized: {:?}", log_file);

        Ok(Self {
            file_handle: Some(Arc::new(Mutex::new(file))),
        })
    }

    /// Construct a no-op audit trail
    pub fn disabled() -> Self {
        Self { file_handle: None }
    }

    /// Append an audit entry; failures are logged and never surfaced,
    /// so a full disk cannot fail a committed ledger operation
    pub async fn log(&self, entry: AuditLogEntry) {
        let Some(handle) = &self.file_handle else {
            return;
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize audit entry: {}", e);
                return;
            }
        };

        let mut file = handle.lock().await;
        if let Err(e) = writeln!(file, "{}", json).and_then(|_| file.flush()) {
            warn!("Failed to write audit log: {}", e);
        }
    }

    /// Record an operation against a group
    pub async fn record(
        &self,
        operation: &str,
        group_id: &str,
        caller: &str,
        details: serde_json::Value,
    ) {
        self.log(AuditLogEntry {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now().timestamp(),
            operation: operation.to_string(),
            group_id: Some(group_id.to_string()),
            caller: Some(caller.to_string()),
            details,
        })
        .await;
    }

    /// Log group creation
    pub async fn log_group_created(&self, group_id: &str, creator: &str, kind: &str, mode: u8) {
        self.record(
            "group_created",
            group_id,
            creator,
            serde_json::json!({ "kind": kind, "mode": mode }),
        )
        .await;
    }

    /// Log a join or add-member
    pub async fn log_member_joined(&self, group_id: &str, address: &str, position: u32) {
        self.record(
            "member_joined",
            group_id,
            address,
            serde_json::json!({ "payout_position": position }),
        )
        .await;
    }

    /// Log a cycle deposit
    pub async fn log_deposit(&self, group_id: &str, address: &str, cycle: u32, amount: u64) {
        self.record(
            "deposit",
            group_id,
            address,
            serde_json::json!({ "cycle": cycle, "amount": amount }),
        )
        .await;
    }

    /// Log a rotating payout
    pub async fn log_payout(&self, group_id: &str, address: &str, cycle: u32, amount: u64) {
        self.record(
            "payout_claimed",
            group_id,
            address,
            serde_json::json!({ "cycle": cycle, "amount": amount }),
        )
        .await;
    }

    /// Log a savings withdrawal
    pub async fn log_withdrawal(&self, group_id: &str, address: &str, amount: u64) {
        self.record(
            "savings_withdrawn",
            group_id,
            address,
            serde_json::json!({ "amount": amount }),
        )
        .await;
    }

    /// Log a mode-change proposal or vote
    pub async fn log_mode_change(&self, group_id: &str, address: &str, details: serde_json::Value) {
        self.record("mode_change", group_id, address, details).await;
    }
}
