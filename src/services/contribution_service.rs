use std::sync::Arc;

use tracing::info;

use crate::error::{AppResult, LedgerError};
use crate::models::Contribution;
use crate::services::{ensure_active, require_group, require_member, AuditTrailService};
use crate::store::LedgerStore;

/// Service for cycle deposits and the internal balance sheet.
pub struct ContributionService {
    store: Arc<LedgerStore>,
    audit: Arc<AuditTrailService>,
}

impl ContributionService {
    pub fn new(store: Arc<LedgerStore>, audit: Arc<AuditTrailService>) -> Self {
        Self { store, audit }
    }

    /// Deposit the group's fixed amount for the current cycle.
    ///
    /// One paid contribution per member per cycle; the member's account is
    /// debited and the group pool credited in the same committed write.
    pub async fn deposit(&self, group_id: &str, caller: &str) -> AppResult<Contribution> {
        let contribution = {
            let mut state = self.store.write().await;
            let block = state.block_height();

            // All rejections happen before any write
            let (amount, cycle) = {
                let group = require_group(&state, group_id)?;
                ensure_active(group)?;
                let member = require_member(&state, group_id, caller)?;

                let cycle = group.current_cycle;
                if state.has_paid(group_id, caller, cycle) {
                    return Err(LedgerError::AlreadyPaid { cycle });
                }

                let amount = group.deposit_per_member;
                if state.balance_of(caller) < amount {
                    return Err(LedgerError::NoBalance);
                }
                group
                    .total_pool_balance
                    .checked_add(amount)
                    .ok_or(LedgerError::TransferFailed)?;
                member
                    .total_contributed
                    .checked_add(amount)
                    .ok_or(LedgerError::TransferFailed)?;
                (amount, cycle)
            };

            state.debit(caller, amount)?;
            let member = state
                .member_mut(group_id, caller)
                .ok_or(LedgerError::NotMember)?;
            member.total_contributed += amount;
            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            group.total_pool_balance += amount;

            let contribution = Contribution::paid(
                group_id.to_string(),
                caller.to_string(),
                cycle,
                amount,
                block,
            );
            state.record_contribution(contribution.clone());
            contribution
        };

        info!(
            "Member {} deposited {} for cycle {} of group {}",
            caller, contribution.amount, contribution.cycle, group_id
        );
        self.audit
            .log_deposit(group_id, caller, contribution.cycle, contribution.amount)
            .await;

        Ok(contribution)
    }

    /// Credit an address on the internal balance sheet.
    ///
    /// Embedding-level faucet standing in for the chain's native token;
    /// members need funds here before they can deposit.
    pub async fn fund_account(&self, address: &str, amount: u64) -> AppResult<u64> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let balance = self.store.write().await.credit(address, amount)?;
        info!("Funded account {} with {} (balance now {})", address, amount, balance);
        Ok(balance)
    }
}
