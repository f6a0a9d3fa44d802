//! CoopSave Ledger Library
//!
//! An embeddable ledger engine for rotating (ROSCA) and collective
//! community-savings groups. The engine is the authoritative state machine:
//! groups, members, per-cycle contributions and the public discovery index
//! live in one serialized arena, and every operation either fully commits
//! or rejects with a machine-readable error code before any mutation.

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state_digest;
pub mod store;

// Re-export commonly used types
pub use config::{AppConfig, ProtocolLimits};
pub use error::{AppResult, ErrorKind, LedgerError};

use repositories::*;
use services::*;
use std::sync::Arc;
use store::LedgerStore;

/// Application state containing all repositories and services
pub struct AppState {
    pub store: Arc<LedgerStore>,
    pub group_repo: Arc<GroupRepository>,
    pub member_repo: Arc<MemberRepository>,
    pub contribution_repo: Arc<ContributionRepository>,
    pub registry_repo: Arc<RegistryRepository>,
    pub account_repo: Arc<AccountRepository>,
    pub group_service: Arc<GroupService>,
    pub contribution_service: Arc<ContributionService>,
    pub payout_service: Arc<PayoutService>,
    pub governance_service: Arc<GovernanceService>,
    pub audit: Arc<AuditTrailService>,
}

impl AppState {
    /// Create a new AppState with initialized repositories and services
    pub fn new(store: Arc<LedgerStore>, limits: ProtocolLimits, audit: AuditTrailService) -> Self {
        let audit = Arc::new(audit);

        Self {
            group_repo: Arc::new(GroupRepository::new(store.clone())),
            member_repo: Arc::new(MemberRepository::new(store.clone())),
            contribution_repo: Arc::new(ContributionRepository::new(store.clone())),
            registry_repo: Arc::new(RegistryRepository::new(store.clone())),
            account_repo: Arc::new(AccountRepository::new(store.clone())),
            group_service: Arc::new(GroupService::new(store.clone(), limits.clone(), audit.clone())),
            contribution_service: Arc::new(ContributionService::new(store.clone(), audit.clone())),
            payout_service: Arc::new(PayoutService::new(
                store.clone(),
                limits.grace_period_blocks,
                audit.clone(),
            )),
            governance_service: Arc::new(GovernanceService::new(store.clone(), audit.clone())),
            audit,
            store,
        }
    }
}
