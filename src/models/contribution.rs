use serde::{Deserialize, Serialize};

/// Contribution model: one member's deposit record for one cycle.
///
/// At most one paid contribution exists per (group, member, cycle); once
/// `is_paid` is set the record is immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub group_id: String,
    pub address: String,
    pub cycle: u32,
    pub amount: u64,
    pub paid_at_block: u64,
    pub is_paid: bool,
}

impl Contribution {
    /// Record a paid deposit for a cycle
    pub fn paid(
        group_id: String,
        address: String,
        cycle: u32,
        amount: u64,
        paid_at_block: u64,
    ) -> Self {
        Self {
            group_id,
            address,
            cycle,
            amount,
            paid_at_block,
            is_paid: true,
        }
    }
}
