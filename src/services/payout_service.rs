use std::sync::Arc;

use tracing::info;

use crate::error::{AppResult, LedgerError};
use crate::models::{GroupMode, GroupStatus};
use crate::services::{ensure_active, require_group, require_member, AuditTrailService};
use crate::store::LedgerStore;

/// Payout/withdrawal resolver.
///
/// For rotating groups, resolves who is owed the current cycle's pooled
/// deposits and advances the cycle on claim. For pooled groups, resolves a
/// member's one-shot principal withdrawal once every cycle has completed.
pub struct PayoutService {
    store: Arc<LedgerStore>,
    grace_period_blocks: u64,
    audit: Arc<AuditTrailService>,
}

impl PayoutService {
    pub fn new(store: Arc<LedgerStore>, grace_period_blocks: u64, audit: Arc<AuditTrailService>) -> Self {
        Self {
            store,
            grace_period_blocks,
            audit,
        }
    }

    /// Sum of paid contributions for one cycle of a group — the amount a
    /// claim for that cycle would pay
    pub async fn payout_amount_for_cycle(&self, group_id: &str, cycle: u32) -> AppResult<u64> {
        let state = self.store.read().await;
        require_group(&state, group_id)?;
        Ok(state
            .paid_contributions_for_cycle(group_id, cycle)
            .iter()
            .map(|c| c.amount)
            .sum())
    }

    /// Claim the current cycle's pooled deposits. Rotating mode only.
    ///
    /// The claim is blocked until every member has paid the cycle, must
    /// match the caller's payout position, and must land inside the cycle
    /// window plus the grace period. Claiming advances the cycle; the final
    /// claim completes the group. Returns the amount paid out.
    pub async fn claim_payout(&self, group_id: &str, caller: &str) -> AppResult<u64> {
        let (amount, cycle, completed) = {
            let mut state = self.store.write().await;
            let block = state.block_height();

            let (amount, cycle, pool_after) = {
                let group = require_group(&state, group_id)?;
                if group.mode != GroupMode::RotatingPayout {
                    return Err(LedgerError::InvalidMode);
                }
                ensure_active(group)?;
                let member = require_member(&state, group_id, caller)?;

                if member.has_received_payout {
                    return Err(LedgerError::AlreadyReceivedPayout);
                }
                if group.current_cycle != member.payout_position {
                    return Err(LedgerError::NotYourTurn {
                        position: member.payout_position,
                        current_cycle: group.current_cycle,
                    });
                }
                if block > group.cycle_end_block().saturating_add(self.grace_period_blocks) {
                    return Err(LedgerError::GracePeriodEnded);
                }

                let cycle = group.current_cycle;
                let fully_funded = state
                    .members_of(group_id)
                    .iter()
                    .all(|m| state.has_paid(group_id, &m.address, cycle));
                if !fully_funded {
                    return Err(LedgerError::InsufficientContributions);
                }

                let amount: u64 = state
                    .paid_contributions_for_cycle(group_id, cycle)
                    .iter()
                    .map(|c| c.amount)
                    .sum();
                let pool_after = group
                    .total_pool_balance
                    .checked_sub(amount)
                    .ok_or(LedgerError::InsufficientContributions)?;
                state
                    .balance_of(caller)
                    .checked_add(amount)
                    .ok_or(LedgerError::TransferFailed)?;
                (amount, cycle, pool_after)
            };

            state.credit(caller, amount)?;
            let member = state
                .member_mut(group_id, caller)
                .ok_or(LedgerError::NotMember)?;
            member.has_received_payout = true;

            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            group.total_pool_balance = pool_after;

            let completed = group.current_cycle >= group.total_cycles();
            if completed {
                group.status = GroupStatus::Completed;
            } else {
                group.current_cycle += 1;
                group.cycle_start_block = block;
            }
            (amount, cycle, completed)
        };

        info!(
            "Member {} claimed payout of {} for cycle {} of group {}",
            caller, amount, cycle, group_id
        );
        if completed {
            info!("Group {} completed: all payouts distributed", group_id);
        }
        self.audit.log_payout(group_id, caller, cycle, amount).await;

        Ok(amount)
    }

    /// Withdraw the caller's lifetime contributions. Pooled modes only,
    /// once the withdrawal window is open; callable once per member.
    /// Returns the amount withdrawn.
    pub async fn withdraw_savings(&self, group_id: &str, caller: &str) -> AppResult<u64> {
        let (amount, all_withdrawn) = {
            let mut state = self.store.write().await;

            let (amount, pool_after) = {
                let group = require_group(&state, group_id)?;
                if !group.mode.is_pooled() {
                    return Err(LedgerError::InvalidMode);
                }
                let member = require_member(&state, group_id, caller)?;

                match group.status {
                    GroupStatus::WithdrawalOpen => {}
                    GroupStatus::Enrollment | GroupStatus::Active => {
                        return Err(LedgerError::NotAllCyclesComplete)
                    }
                    GroupStatus::Paused => return Err(LedgerError::GroupPaused),
                    GroupStatus::Completed => return Err(LedgerError::WithdrawalNotAvailable),
                }
                if member.has_withdrawn {
                    return Err(LedgerError::AlreadyWithdrawn);
                }

                let amount = member.total_contributed;
                let pool_after = group
                    .total_pool_balance
                    .checked_sub(amount)
                    .ok_or(LedgerError::TransferFailed)?;
                state
                    .balance_of(caller)
                    .checked_add(amount)
                    .ok_or(LedgerError::TransferFailed)?;
                (amount, pool_after)
            };

            state.credit(caller, amount)?;
            let member = state
                .member_mut(group_id, caller)
                .ok_or(LedgerError::NotMember)?;
            member.has_withdrawn = true;

            let all_withdrawn = state.members_of(group_id).iter().all(|m| m.has_withdrawn);
            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            group.total_pool_balance = pool_after;
            if all_withdrawn {
                group.status = GroupStatus::Completed;
            }
            (amount, all_withdrawn)
        };

        info!(
            "Member {} withdrew savings of {} from group {}",
            caller, amount, group_id
        );
        if all_withdrawn {
            info!("Group {} completed: all members withdrawn", group_id);
        }
        self.audit.log_withdrawal(group_id, caller, amount).await;

        Ok(amount)
    }
}
