use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppResult, LedgerError};
use crate::models::{Contribution, Group, Member};

/// The entity arena behind the ledger.
///
/// Pure lookup/append state keyed by composite identifiers: groups by id,
/// members by (group, address), contributions by (group, address, cycle).
/// No business rules live here; the services validate and then write
/// through these accessors while holding the store's write lock.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LedgerState {
    /// Logical clock standing in for chain block height
    block_height: u64,
    groups: BTreeMap<String, Group>,
    /// group_id -> address -> member
    members: BTreeMap<String, BTreeMap<String, Member>>,
    /// group_id -> address -> cycle -> contribution
    contributions: BTreeMap<String, BTreeMap<String, BTreeMap<u32, Contribution>>>,
    /// Internal balance sheet standing in for the chain's native token
    accounts: BTreeMap<String, u64>,
    /// Append-only discovery index of publicly listed group ids
    public_index: Vec<String>,
}

impl LedgerState {
    // --- block clock ---

    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    /// Advance the logical clock, returning the new height
    pub fn advance_blocks(&mut self, blocks: u64) -> u64 {
        self.block_height = self.block_height.saturating_add(blocks);
        self.block_height
    }

    // --- groups ---

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.get(group_id)
    }

    pub fn group_mut(&mut self, group_id: &str) -> Option<&mut Group> {
        self.groups.get_mut(group_id)
    }

    pub fn contains_group(&self, group_id: &str) -> bool {
        self.groups.contains_key(group_id)
    }

    pub fn insert_group(&mut self, group: Group) {
        self.groups.insert(group.group_id.clone(), group);
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    // --- members ---

    pub fn member(&self, group_id: &str, address: &str) -> Option<&Member> {
        self.members.get(group_id).and_then(|m| m.get(address))
    }

    pub fn member_mut(&mut self, group_id: &str, address: &str) -> Option<&mut Member> {
        self.members.get_mut(group_id).and_then(|m| m.get_mut(address))
    }

    pub fn is_member(&self, group_id: &str, address: &str) -> bool {
        self.member(group_id, address).is_some()
    }

    pub fn insert_member(&mut self, member: Member) {
        self.members
            .entry(member.group_id.clone())
            .or_default()
            .insert(member.address.clone(), member);
    }

    /// Members of a group ordered by payout position
    pub fn members_of(&self, group_id: &str) -> Vec<&Member> {
        let mut members: Vec<&Member> = self
            .members
            .get(group_id)
            .map(|m| m.values().collect())
            .unwrap_or_default();
        members.sort_by_key(|m| m.payout_position);
        members
    }

    /// Mutable access to every member of a group (vote-flag resets)
    pub fn members_of_mut(&mut self, group_id: &str) -> Vec<&mut Member> {
        self.members
            .get_mut(group_id)
            .map(|m| m.values_mut().collect())
            .unwrap_or_default()
    }

    pub fn position_taken(&self, group_id: &str, position: u32) -> bool {
        self.members
            .get(group_id)
            .map_or(false, |m| m.values().any(|mem| mem.payout_position == position))
    }

    /// Ids of every group the address belongs to
    pub fn groups_for_member(&self, address: &str) -> Vec<String> {
        self.members
            .iter()
            .filter(|(_, members)| members.contains_key(address))
            .map(|(group_id, _)| group_id.clone())
            .collect()
    }

    // --- contributions ---

    pub fn contribution(&self, group_id: &str, address: &str, cycle: u32) -> Option<&Contribution> {
        self.contributions
            .get(group_id)
            .and_then(|by_addr| by_addr.get(address))
            .and_then(|by_cycle| by_cycle.get(&cycle))
    }

    pub fn has_paid(&self, group_id: &str, address: &str, cycle: u32) -> bool {
        self.contribution(group_id, address, cycle)
            .map_or(false, |c| c.is_paid)
    }

    pub fn record_contribution(&mut self, contribution: Contribution) {
        self.contributions
            .entry(contribution.group_id.clone())
            .or_default()
            .entry(contribution.address.clone())
            .or_default()
            .insert(contribution.cycle, contribution);
    }

    /// Paid contributions for one cycle of a group
    pub fn paid_contributions_for_cycle(&self, group_id: &str, cycle: u32) -> Vec<&Contribution> {
        self.contributions
            .get(group_id)
            .map(|by_addr| {
                by_addr
                    .values()
                    .filter_map(|by_cycle| by_cycle.get(&cycle))
                    .filter(|c| c.is_paid)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All paid contributions of a group, ordered by (address, cycle)
    pub fn paid_contributions(&self, group_id: &str) -> Vec<&Contribution> {
        self.contributions
            .get(group_id)
            .map(|by_addr| {
                by_addr
                    .values()
                    .flat_map(|by_cycle| by_cycle.values())
                    .filter(|c| c.is_paid)
                    .collect()
            })
            .unwrap_or_default()
    }

    // --- account balances ---

    pub fn balance_of(&self, address: &str) -> u64 {
        self.accounts.get(address).copied().unwrap_or(0)
    }

    /// Credit an account, rejecting on overflow
    pub fn credit(&mut self, address: &str, amount: u64) -> AppResult<u64> {
        let updated = self
            .balance_of(address)
            .checked_add(amount)
            .ok_or(LedgerError::TransferFailed)?;
        self.accounts.insert(address.to_string(), updated);
        Ok(updated)
    }

    /// Debit an account, rejecting when the balance cannot cover it
    pub fn debit(&mut self, address: &str, amount: u64) -> AppResult<u64> {
        let updated = self
            .balance_of(address)
            .checked_sub(amount)
            .ok_or(LedgerError::NoBalance)?;
        self.accounts.insert(address.to_string(), updated);
        Ok(updated)
    }

    // --- public registry ---

    pub fn public_group_count(&self) -> u64 {
        self.public_index.len() as u64
    }

    pub fn public_group_id_at(&self, index: u64) -> Option<&str> {
        self.public_index.get(index as usize).map(String::as_str)
    }

    pub fn public_group_ids(&self) -> &[String] {
        &self.public_index
    }

    /// Append a newly created public group to the discovery index
    pub fn push_public_group(&mut self, group_id: String) {
        self.public_index.push(group_id);
    }
}
