use std::sync::Arc;

use tracing::info;

use crate::error::{AppResult, LedgerError};
use crate::models::{Group, GroupMode};
use crate::services::{ensure_active, require_group, require_member, AuditTrailService};
use crate::store::{LedgerState, LedgerStore};

/// Mode-change governance: propose, vote, and resolve by simple majority.
///
/// A proposal counts as the proposer's "for" vote. The tally is checked on
/// every vote: a strict majority of the current membership ratifies; the
/// proposal is rejected as soon as the votes against make ratification
/// impossible. Resolution clears the proposal and every member's vote flag.
pub struct GovernanceService {
    store: Arc<LedgerStore>,
    audit: Arc<AuditTrailService>,
}

impl GovernanceService {
    pub fn new(store: Arc<LedgerStore>, audit: Arc<AuditTrailService>) -> Self {
        Self { store, audit }
    }

    /// Open a mode-change vote. Any member of an active group may propose.
    pub async fn propose_mode_change(
        &self,
        group_id: &str,
        caller: &str,
        new_mode: u8,
    ) -> AppResult<Group> {
        let new_mode = GroupMode::from_u8(new_mode)?;

        let group = {
            let mut state = self.store.write().await;

            {
                let group = require_group(&state, group_id)?;
                ensure_active(group)?;
                require_member(&state, group_id, caller)?;
                if group.pending_mode_change.is_some() {
                    return Err(LedgerError::ModeChangePending);
                }
                if group.mode == new_mode {
                    return Err(LedgerError::InvalidMode);
                }
            }

            let member = state
                .member_mut(group_id, caller)
                .ok_or(LedgerError::NotMember)?;
            member.voted_on_mode_change = true;
            member.vote_for_mode_change = true;

            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            group.pending_mode_change = Some(new_mode);
            group.mode_change_votes_for = 1;
            group.mode_change_votes_against = 0;

            resolve_vote(&mut state, group_id)?;
            state
                .group(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?
                .clone()
        };

        info!(
            "Member {} proposed changing group {} to {}",
            caller,
            group_id,
            new_mode.label()
        );
        self.audit
            .log_mode_change(
                group_id,
                caller,
                serde_json::json!({ "action": "proposed", "new_mode": new_mode.as_u8() }),
            )
            .await;

        Ok(group)
    }

    /// Cast a vote on the open proposal. Members vote once; the tally is
    /// resolved immediately when a side reaches its threshold.
    pub async fn vote_on_mode_change(
        &self,
        group_id: &str,
        caller: &str,
        support: bool,
    ) -> AppResult<Group> {
        let group = {
            let mut state = self.store.write().await;

            {
                let group = require_group(&state, group_id)?;
                ensure_active(group)?;
                let member = require_member(&state, group_id, caller)?;
                if group.pending_mode_change.is_none() {
                    return Err(LedgerError::NoPendingModeChange);
                }
                if member.voted_on_mode_change {
                    return Err(LedgerError::AlreadyVoted);
                }
            }

            let member = state
                .member_mut(group_id, caller)
                .ok_or(LedgerError::NotMember)?;
            member.voted_on_mode_change = true;
            member.vote_for_mode_change = support;

            let group = state
                .group_mut(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
            if support {
                group.mode_change_votes_for += 1;
            } else {
                group.mode_change_votes_against += 1;
            }

            resolve_vote(&mut state, group_id)?;
            state
                .group(group_id)
                .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?
                .clone()
        };

        info!(
            "Member {} voted {} on mode change for group {}",
            caller,
            if support { "for" } else { "against" },
            group_id
        );
        self.audit
            .log_mode_change(
                group_id,
                caller,
                serde_json::json!({ "action": "voted", "support": support }),
            )
            .await;

        Ok(group)
    }
}

/// Tally the open vote and resolve it when a threshold is met.
fn resolve_vote(state: &mut LedgerState, group_id: &str) -> AppResult<()> {
    let (pending, votes_for, votes_against, members_count) = {
        let group = require_group(state, group_id)?;
        (
            group.pending_mode_change,
            group.mode_change_votes_for,
            group.mode_change_votes_against,
            group.members_count,
        )
    };

    let Some(new_mode) = pending else {
        return Ok(());
    };

    let ratified = 2 * votes_for > members_count;
    let rejected = 2 * votes_against >= members_count;
    if !ratified && !rejected {
        return Ok(());
    }

    for member in state.members_of_mut(group_id) {
        member.voted_on_mode_change = false;
        member.vote_for_mode_change = false;
    }

    let group = state
        .group_mut(group_id)
        .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
    group.pending_mode_change = None;
    group.mode_change_votes_for = 0;
    group.mode_change_votes_against = 0;

    if ratified {
        group.mode = new_mode;
        info!("Group {} mode change ratified: now {}", group_id, new_mode.label());
    } else {
        info!("Group {} mode change rejected", group_id);
    }

    Ok(())
}
