use std::sync::Arc;

use tracing::info;

use crate::config::ProtocolLimits;
use crate::error::{AppResult, LedgerError};
use crate::models::{CreateGroupParams, Group, GroupKind, GroupMode, GroupStatus, Member};
use crate::services::{ensure_active, require_group, require_member, validate_name, AuditTrailService};
use crate::store::LedgerStore;

/// Service driving the group lifecycle: creation, enrollment, start,
/// pause/resume and the cycle clock for pooled modes.
///
/// Every mutating method takes the store's write lock once, checks every
/// rule against the guarded state, and only then applies its writes.
pub struct GroupService {
    store: Arc<LedgerStore>,
    limits: ProtocolLimits,
    audit: Arc<AuditTrailService>,
}

impl GroupService {
    pub fn new(store: Arc<LedgerStore>, limits: ProtocolLimits, audit: Arc<AuditTrailService>) -> Self {
        Self { store, limits, audit }
    }

    /// Create a publicly listed group in Enrollment status.
    ///
    /// The creator is not auto-enrolled; they join like any other member.
    pub async fn create_public_group(
        &self,
        caller: &str,
        params: CreateGroupParams,
        enrollment_period_blocks: u64,
        auto_start_when_full: bool,
    ) -> AppResult<Group> {
        if enrollment_period_blocks == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        self.create_group(caller, params, GroupKind::Public, enrollment_period_blocks, auto_start_when_full)
            .await
    }

    /// Create an invitation-only group in Enrollment status
    pub async fn create_private_group(&self, caller: &str, params: CreateGroupParams) -> AppResult<Group> {
        self.create_group(caller, params, GroupKind::Private, 0, false).await
    }

    async fn create_group(
        &self,
        caller: &str,
        params: CreateGroupParams,
        kind: GroupKind,
        enrollment_period_blocks: u64,
        auto_start_when_full: bool,
    ) -> AppResult<Group> {
        let mode = GroupMode::from_u8(params.mode)?;
        validate_name(&params.group_id, self.limits.max_name_len)?;
        validate_name(&params.name, self.limits.max_name_len)?;
        if let Some(description) = &params.description {
            if description.len() > self.limits.max_description_len {
                return Err(LedgerError::NameTooLong {
                    max: self.limits.max_description_len,
                });
            }
        }
        if params.deposit_per_member == 0 || params.cycle_duration_blocks == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if params.max_members < 2 || params.max_members > self.limits.max_members_cap {
            return Err(LedgerError::InvalidMemberLimit {
                requested: params.max_members,
                cap: self.limits.max_members_cap,
            });
        }

        let group = {
            let mut state = self.store.write().await;
            if state.contains_group(&params.group_id) {
                return Err(LedgerError::GroupIdTaken(params.group_id));
            }

            let block = state.block_height();
            let group = Group {
                group_id: params.group_id,
                name: params.name,
                description: params.description,
                creator: caller.to_string(),
                deposit_per_member: params.deposit_per_member,
                cycle_duration_blocks: params.cycle_duration_blocks,
                max_members: params.max_members,
                mode,
                kind,
                status: GroupStatus::Enrollment,
                members_count: 0,
                current_cycle: 0,
                cycle_start_block: 0,
                total_pool_balance: 0,
                enrollment_period_blocks,
                enrollment_end_block: match kind {
                    GroupKind::Public => Some(block.saturating_add(enrollment_period_blocks)),
                    GroupKind::Private => None,
                },
                auto_start_when_full,
                is_public_listed: kind == GroupKind::Public,
                created_at_block: block,
                pending_mode_change: None,
                mode_change_votes_for: 0,
                mode_change_votes_against: 0,
            };

            state.insert_group(group.clone());
            if kind == GroupKind::Public {
                state.push_public_group(group.group_id.clone());
            }
            group
        };

        info!(
            "Created {} group {} ({}, {} members max)",
            match kind {
                GroupKind::Public => "public",
                GroupKind::Private => "private",
            },
            group.group_id,
            group.mode.label(),
            group.max_members
        );
        self.audit
            .log_group_created(
                &group.group_id,
                caller,
                match kind {
                    GroupKind::Public => "public",
                    GroupKind::Private => "private",
                },
                group.mode.as_u8(),
            )
            .await;

        Ok(group)
    }

    /// Join a public group, taking the next sequential payout position.
    ///
    /// Auto-starts the group when configured and the join fills the last
    /// slot during initial enrollment.
    pub async fn join_public_group(
        &self,
        group_id: &str,
        caller: &str,
        member_name: &str,
    ) -> AppResult<Member> {
        validate_name(member_name, self.limits.max_name_len)?;

        let (member, started) = {
            let mut state = self.store.write().await;
            let block = state.block_height();

            {
                let group = require_group(&state, group_id)?;
                if group.kind != GroupKind::Public {
                    return Err(LedgerError::GroupNotPublic);
                }
                match group.status {
                    GroupStatus::Enrollment | GroupStatus::Active => {}
                    GroupStatus::Paused => return Err(LedgerError::GroupPaused),
                    GroupStatus::Completed | GroupStatus::WithdrawalOpen => {
                        return Err(LedgerError::GroupCompleted)
                    }
                }
                if state.is_member(group_id, caller) {
                    return Err(LedgerError::AlreadyMember);
                }
                if group.is_full() {
                    return Err(LedgerError::MaxMembers {
                        max_members: group.max_members,
                    });
                }
                if !group.enrollment_open_at(block) {
                    return Err(LedgerError::EnrollmentClosed);
                }
            }

            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            group.members_count += 1;
            let position = group.members_count;

            let started = group.status == GroupStatus::Enrollment
                && group.auto_start_when_full
                && group.is_full();
            if started {
                group.status = GroupStatus::Active;
                group.current_cycle = 1;
                group.cycle_start_block = block;
                group.enrollment_end_block = None;
            }

            let member = Member::new(
                group_id.to_string(),
                caller.to_string(),
                member_name.to_string(),
                position,
                block,
            );
            state.insert_member(member.clone());
            (member, started)
        };

        info!(
            "Member {} joined group {} at position {}",
            caller, group_id, member.payout_position
        );
        if started {
            info!("Group {} is full, auto-starting cycle 1", group_id);
        }
        self.audit
            .log_member_joined(group_id, caller, member.payout_position)
            .await;

        Ok(member)
    }

    /// Add a member to a private group at an explicit payout position.
    /// Creator-only.
    pub async fn add_member(
        &self,
        group_id: &str,
        caller: &str,
        address: &str,
        member_name: &str,
        payout_position: u32,
    ) -> AppResult<Member> {
        validate_name(member_name, self.limits.max_name_len)?;

        let member = {
            let mut state = self.store.write().await;
            let block = state.block_height();

            {
                let group = require_group(&state, group_id)?;
                if group.creator != caller {
                    return Err(LedgerError::Unauthorized);
                }
                if group.kind != GroupKind::Private {
                    return Err(LedgerError::InvalidGroupType);
                }
                match group.status {
                    GroupStatus::Enrollment => {}
                    GroupStatus::Active | GroupStatus::WithdrawalOpen => {
                        return Err(LedgerError::EnrollmentClosed)
                    }
                    GroupStatus::Paused => return Err(LedgerError::GroupPaused),
                    GroupStatus::Completed => return Err(LedgerError::GroupCompleted),
                }
                if payout_position < 1 || payout_position > group.max_members {
                    return Err(LedgerError::InvalidPayoutPosition {
                        position: payout_position,
                        max_members: group.max_members,
                    });
                }
                if state.position_taken(group_id, payout_position) {
                    return Err(LedgerError::InvalidPayoutPosition {
                        position: payout_position,
                        max_members: group.max_members,
                    });
                }
                if state.is_member(group_id, address) {
                    return Err(LedgerError::AlreadyMember);
                }
                if group.is_full() {
                    return Err(LedgerError::MaxMembers {
                        max_members: group.max_members,
                    });
                }
            }

            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            group.members_count += 1;

            let member = Member::new(
                group_id.to_string(),
                address.to_string(),
                member_name.to_string(),
                payout_position,
                block,
            );
            state.insert_member(member.clone());
            member
        };

        info!(
            "Creator added member {} to group {} at position {}",
            address, group_id, payout_position
        );
        self.audit
            .log_member_joined(group_id, address, payout_position)
            .await;

        Ok(member)
    }

    /// Close enrollment and start cycle 1. Creator-only; requires at least
    /// two members regardless of what the client gated.
    pub async fn close_enrollment_and_start(&self, group_id: &str, caller: &str) -> AppResult<Group> {
        let group = {
            let mut state = self.store.write().await;
            let block = state.block_height();

            {
                let group = require_group(&state, group_id)?;
                if group.creator != caller {
                    return Err(LedgerError::Unauthorized);
                }
                match group.status {
                    GroupStatus::Enrollment => {}
                    GroupStatus::Active | GroupStatus::WithdrawalOpen => {
                        return Err(LedgerError::CycleInProgress)
                    }
                    GroupStatus::Paused => return Err(LedgerError::GroupPaused),
                    GroupStatus::Completed => return Err(LedgerError::GroupCompleted),
                }
                if group.members_count < 2 {
                    return Err(LedgerError::NotTimeYet);
                }
            }

            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            group.status = GroupStatus::Active;
            group.current_cycle = 1;
            group.cycle_start_block = block;
            group.enrollment_end_block = None;
            group.clone()
        };

        info!(
            "Group {} started: cycle 1 of {} begins at block {}",
            group_id,
            group.total_cycles(),
            group.cycle_start_block
        );
        self.audit
            .record(
                "enrollment_closed",
                group_id,
                caller,
                serde_json::json!({ "members": group.members_count }),
            )
            .await;

        Ok(group)
    }

    /// Reopen enrollment on an Active public group so new members can join
    /// mid-flight. Creator-only; rejected while the running cycle's window
    /// has not elapsed.
    pub async fn open_enrollment_period(
        &self,
        group_id: &str,
        caller: &str,
        enrollment_period_blocks: u64,
    ) -> AppResult<Group> {
        if enrollment_period_blocks == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let group = {
            let mut state = self.store.write().await;
            let block = state.block_height();

            {
                let group = require_group(&state, group_id)?;
                if group.creator != caller {
                    return Err(LedgerError::Unauthorized);
                }
                if group.kind != GroupKind::Public {
                    return Err(LedgerError::InvalidGroupType);
                }
                ensure_active(group)?;
                if block < group.cycle_end_block() {
                    return Err(LedgerError::CycleInProgress);
                }
            }

            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            group.enrollment_period_blocks = enrollment_period_blocks;
            group.enrollment_end_block = Some(block.saturating_add(enrollment_period_blocks));
            group.clone()
        };

        info!(
            "Group {} reopened enrollment until block {:?}",
            group_id, group.enrollment_end_block
        );
        self.audit
            .record(
                "enrollment_reopened",
                group_id,
                caller,
                serde_json::json!({ "period_blocks": enrollment_period_blocks }),
            )
            .await;

        Ok(group)
    }

    /// Freeze an active group. Creator-only.
    pub async fn pause_group(&self, group_id: &str, caller: &str) -> AppResult<Group> {
        let group = {
            let mut state = self.store.write().await;
            {
                let group = require_group(&state, group_id)?;
                if group.creator != caller {
                    return Err(LedgerError::Unauthorized);
                }
                ensure_active(group)?;
            }
            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            group.status = GroupStatus::Paused;
            group.clone()
        };

        info!("Group {} paused by creator", group_id);
        self.audit
            .record("group_paused", group_id, caller, serde_json::json!({}))
            .await;
        Ok(group)
    }

    /// Resume a paused group. Creator-only.
    pub async fn resume_group(&self, group_id: &str, caller: &str) -> AppResult<Group> {
        let group = {
            let mut state = self.store.write().await;
            {
                let group = require_group(&state, group_id)?;
                if group.creator != caller {
                    return Err(LedgerError::Unauthorized);
                }
                if group.status != GroupStatus::Paused {
                    return Err(LedgerError::CycleInProgress);
                }
            }
            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            group.status = GroupStatus::Active;
            group.clone()
        };

        info!("Group {} resumed", group_id);
        self.audit
            .record("group_resumed", group_id, caller, serde_json::json!({}))
            .await;
        Ok(group)
    }

    /// Advance the cycle clock of a pooled-mode group once its window has
    /// elapsed. Any member may call. Rotating groups advance on claim
    /// instead.
    pub async fn advance_cycle(&self, group_id: &str, caller: &str) -> AppResult<Group> {
        let (group, withdrawal_opened) = {
            let mut state = self.store.write().await;
            let block = state.block_height();

            {
                let group = require_group(&state, group_id)?;
                ensure_active(group)?;
                require_member(&state, group_id, caller)?;
                if !group.mode.is_pooled() {
                    return Err(LedgerError::InvalidMode);
                }
                if block < group.cycle_end_block() {
                    return Err(LedgerError::CycleInProgress);
                }
            }

            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            let withdrawal_opened = group.current_cycle >= group.total_cycles();
            if withdrawal_opened {
                group.status = GroupStatus::WithdrawalOpen;
            } else {
                group.current_cycle += 1;
                group.cycle_start_block = block;
            }
            (group.clone(), withdrawal_opened)
        };

        if withdrawal_opened {
            info!("Group {} completed all cycles, withdrawal window open", group_id);
        } else {
            info!(
                "Group {} advanced to cycle {} of {}",
                group_id,
                group.current_cycle,
                group.total_cycles()
            );
        }
        self.audit
            .record(
                "cycle_advanced",
                group_id,
                caller,
                serde_json::json!({
                    "current_cycle": group.current_cycle,
                    "status": group.status.as_str(),
                }),
            )
            .await;

        Ok(group)
    }
}
