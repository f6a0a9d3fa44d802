use serde::{Deserialize, Serialize};

/// Member model representing one participant's relationship to a group.
///
/// Created on a successful join or add; mutated on deposit, payout claim,
/// withdrawal and vote; never deleted, so it doubles as historical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub group_id: String,
    pub address: String,
    pub name: String,
    /// Fixed turn order for the rotating payout, unique within the group
    pub payout_position: u32,
    pub has_received_payout: bool,
    pub joined_at_block: u64,
    pub total_contributed: u64,
    pub has_withdrawn: bool,
    pub voted_on_mode_change: bool,
    pub vote_for_mode_change: bool,
}

impl Member {
    /// Create a fresh member record at join time
    pub fn new(
        group_id: String,
        address: String,
        name: String,
        payout_position: u32,
        joined_at_block: u64,
    ) -> Self {
        Self {
            group_id,
            address,
            name,
            payout_position,
            has_received_payout: false,
            joined_at_block,
            total_contributed: 0,
            has_withdrawn: false,
            voted_on_mode_change: false,
            vote_for_mode_change: false,
        }
    }
}
