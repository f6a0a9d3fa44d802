use serde::{Deserialize, Serialize};

use crate::error::{AppResult, LedgerError};

/// How a group distributes its pooled savings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMode {
    /// One member receives the pooled lump sum per cycle, in turn
    RotatingPayout,
    /// Members accumulate savings and withdraw principal at the end
    CollectivePool,
    /// Collective pool variant; principal-only until a yield source exists
    InterestBearing,
}

impl GroupMode {
    /// Convert from the wire-level mode number
    pub fn from_u8(value: u8) -> AppResult<Self> {
        match value {
            1 => Ok(GroupMode::RotatingPayout),
            2 => Ok(GroupMode::CollectivePool),
            3 => Ok(GroupMode::InterestBearing),
            _ => Err(LedgerError::InvalidMode),
        }
    }

    /// Wire-level mode number
    pub fn as_u8(&self) -> u8 {
        match self {
            GroupMode::RotatingPayout => 1,
            GroupMode::CollectivePool => 2,
            GroupMode::InterestBearing => 3,
        }
    }

    /// Display label used by client surfaces
    pub fn label(&self) -> &'static str {
        match self {
            GroupMode::RotatingPayout => "Traditional ROSCA",
            GroupMode::CollectivePool => "Collective Savings",
            GroupMode::InterestBearing => "Interest-Bearing",
        }
    }

    /// Modes whose cycles end in a withdrawal window rather than payouts
    pub fn is_pooled(&self) -> bool {
        matches!(self, GroupMode::CollectivePool | GroupMode::InterestBearing)
    }
}

/// Public groups are discoverable and joinable; private groups are
/// invitation-only via the creator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Private,
    Public,
}

impl GroupKind {
    /// Convert from the wire-level type number
    pub fn from_u8(value: u8) -> AppResult<Self> {
        match value {
            1 => Ok(GroupKind::Private),
            2 => Ok(GroupKind::Public),
            _ => Err(LedgerError::InvalidGroupType),
        }
    }

    /// Wire-level type number
    pub fn as_u8(&self) -> u8 {
        match self {
            GroupKind::Private => 1,
            GroupKind::Public => 2,
        }
    }
}

/// Lifecycle status of a savings group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    /// Accepting members, cycling not yet begun
    Enrollment,
    /// Cycles in progress
    Active,
    /// All cycles finished and settled
    Completed,
    /// Administratively frozen by the creator
    Paused,
    /// All cycles complete; members may withdraw principal
    WithdrawalOpen,
}

impl GroupStatus {
    /// Wire-level status number
    pub fn as_u8(&self) -> u8 {
        match self {
            GroupStatus::Enrollment => 0,
            GroupStatus::Active => 1,
            GroupStatus::Completed => 2,
            GroupStatus::Paused => 3,
            GroupStatus::WithdrawalOpen => 4,
        }
    }

    /// Status string used by client surfaces
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Enrollment => "enrollment",
            GroupStatus::Active => "active",
            GroupStatus::Completed => "completed",
            GroupStatus::Paused => "paused",
            GroupStatus::WithdrawalOpen => "withdrawal_open",
        }
    }
}

/// Creation-time parameters shared by public and private groups.
///
/// Amounts are in the smallest currency unit; durations are block counts.
#[derive(Debug, Clone)]
pub struct CreateGroupParams {
    pub group_id: String,
    pub name: String,
    pub description: Option<String>,
    pub deposit_per_member: u64,
    pub cycle_duration_blocks: u64,
    pub max_members: u32,
    /// Wire-level mode number; validated against [`GroupMode`]
    pub mode: u8,
}

/// Group model representing one cooperative savings pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: String,
    pub name: String,
    pub description: Option<String>,
    pub creator: String,
    pub deposit_per_member: u64,
    pub cycle_duration_blocks: u64,
    pub max_members: u32,
    pub mode: GroupMode,
    pub kind: GroupKind,
    pub status: GroupStatus,
    pub members_count: u32,
    /// 0 until cycling starts; 1-based afterwards
    pub current_cycle: u32,
    pub cycle_start_block: u64,
    pub total_pool_balance: u64,
    pub enrollment_period_blocks: u64,
    /// None once enrollment has closed, and for private groups
    pub enrollment_end_block: Option<u64>,
    pub auto_start_when_full: bool,
    pub is_public_listed: bool,
    pub created_at_block: u64,
    pub pending_mode_change: Option<GroupMode>,
    pub mode_change_votes_for: u32,
    pub mode_change_votes_against: u32,
}

impl Group {
    /// Total number of cycles the group runs: one per member slot
    pub fn total_cycles(&self) -> u32 {
        self.max_members
    }

    /// Block at which the current cycle's window ends
    pub fn cycle_end_block(&self) -> u64 {
        self.cycle_start_block.saturating_add(self.cycle_duration_blocks)
    }

    /// Whether every member slot is taken
    pub fn is_full(&self) -> bool {
        self.members_count >= self.max_members
    }

    /// Whether new joins are admitted at the given block height
    pub fn enrollment_open_at(&self, block_height: u64) -> bool {
        match self.status {
            GroupStatus::Enrollment => self
                .enrollment_end_block
                .map_or(true, |end| block_height <= end),
            // Public groups may reopen enrollment while a cycle is mid-flight
            GroupStatus::Active => self
                .enrollment_end_block
                .map_or(false, |end| block_height <= end),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip() {
        for value in 1u8..=3 {
            let mode = GroupMode::from_u8(value).unwrap();
            assert_eq!(mode.as_u8(), value);
        }
        assert_eq!(GroupMode::from_u8(0), Err(LedgerError::InvalidMode));
        assert_eq!(GroupMode::from_u8(4), Err(LedgerError::InvalidMode));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(GroupStatus::Enrollment.as_str(), "enrollment");
        assert_eq!(GroupStatus::WithdrawalOpen.as_str(), "withdrawal_open");
        assert_eq!(GroupStatus::WithdrawalOpen.as_u8(), 4);
    }

    #[test]
    fn test_pooled_modes() {
        assert!(!GroupMode::RotatingPayout.is_pooled());
        assert!(GroupMode::CollectivePool.is_pooled());
        assert!(GroupMode::InterestBearing.is_pooled());
    }
}
