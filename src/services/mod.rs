pub mod audit;
pub mod contribution_service;
pub mod governance_service;
pub mod group_service;
pub mod payout_service;

pub use audit::AuditTrailService;
pub use contribution_service::ContributionService;
pub use governance_service::GovernanceService;
pub use group_service::GroupService;
pub use payout_service::PayoutService;

use crate::error::{AppResult, LedgerError};
use crate::models::{Group, GroupStatus, Member};
use crate::store::LedgerState;

/// Look up a group or reject with the not-found code
pub(crate) fn require_group<'a>(state: &'a LedgerState, group_id: &str) -> AppResult<&'a Group> {
    state
        .group(group_id)
        .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))
}

/// Look up the caller's membership or reject
pub(crate) fn require_member<'a>(
    state: &'a LedgerState,
    group_id: &str,
    address: &str,
) -> AppResult<&'a Member> {
    state.member(group_id, address).ok_or(LedgerError::NotMember)
}

/// Reject any operation that needs an actively cycling group
pub(crate) fn ensure_active(group: &Group) -> AppResult<()> {
    match group.status {
        GroupStatus::Active => Ok(()),
        GroupStatus::Enrollment => Err(LedgerError::NotTimeYet),
        GroupStatus::Paused => Err(LedgerError::GroupPaused),
        GroupStatus::Completed | GroupStatus::WithdrawalOpen => Err(LedgerError::GroupCompleted),
    }
}

/// Reject empty or over-length names
pub(crate) fn validate_name(name: &str, max_len: usize) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::EmptyName);
    }
    if name.len() > max_len {
        return Err(LedgerError::NameTooLong { max: max_len });
    }
    Ok(())
}
