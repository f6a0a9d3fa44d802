use coopsave_ledger::config::ProtocolLimits;
use coopsave_ledger::models::*;
use coopsave_ledger::services::AuditTrailService;
use coopsave_ledger::store::LedgerStore;
use coopsave_ledger::AppState;
use std::sync::Arc;

/// Well-known test addresses
pub const ALICE: &str = "ST1ALICE";
pub const BOB: &str = "ST2BOB";
pub const CAROL: &str = "ST3CAROL";
pub const DAVE: &str = "ST4DAVE";

/// In-memory ledger wired exactly as the service binary wires it
pub struct TestLedger {
    pub store: Arc<LedgerStore>,
    pub app: AppState,
}

impl TestLedger {
    /// Create a fresh in-memory ledger with default protocol limits
    pub fn new() -> Self {
        Self::with_limits(ProtocolLimits::default())
    }

    /// Create a fresh in-memory ledger with custom protocol limits
    pub fn with_limits(limits: ProtocolLimits) -> Self {
        let store = Arc::new(LedgerStore::in_memory());
        let app = AppState::new(store.clone(), limits, AuditTrailService::disabled());
        Self { store, app }
    }

    /// Advance the logical block clock
    pub async fn advance_blocks(&self, blocks: u64) -> u64 {
        self.store.advance_blocks(blocks).await
    }

    /// Fund an address on the internal balance sheet
    pub async fn fund(&self, address: &str, amount: u64) {
        self.app
            .contribution_service
            .fund_account(address, amount)
            .await
            .expect("Failed to fund test account");
    }
}

/// Standard creation parameters for a two-member rotating group
pub fn rosca_params(group_id: &str) -> CreateGroupParams {
    CreateGroupParams {
        group_id: group_id.to_string(),
        name: "Test Savings Circle".to_string(),
        description: Some("A test savings circle".to_string()),
        deposit_per_member: 100,
        cycle_duration_blocks: 10,
        max_members: 2,
        mode: 1,
    }
}

/// Standard creation parameters for a two-member collective group
pub fn collective_params(group_id: &str) -> CreateGroupParams {
    CreateGroupParams {
        mode: 2,
        ..rosca_params(group_id)
    }
}

/// Test data fixtures: a funded, started two-member public rotating group
pub struct TestFixtures {
    pub group: Group,
}

impl TestFixtures {
    /// Create the fixture group: ALICE creates and joins at position 1,
    /// BOB joins at position 2, enrollment closes and cycle 1 starts.
    pub async fn create(ledger: &TestLedger, group_id: &str) -> Self {
        ledger.fund(ALICE, 1_000).await;
        ledger.fund(BOB, 1_000).await;

        ledger
            .app
            .group_service
            .create_public_group(ALICE, rosca_params(group_id), 100, false)
            .await
            .expect("Failed to create fixture group");

        ledger
            .app
            .group_service
            .join_public_group(group_id, ALICE, "Alice")
            .await
            .expect("Failed to join as Alice");
        ledger
            .app
            .group_service
            .join_public_group(group_id, BOB, "Bob")
            .await
            .expect("Failed to join as Bob");

        let group = ledger
            .app
            .group_service
            .close_enrollment_and_start(group_id, ALICE)
            .await
            .expect("Failed to start fixture group");

        Self { group }
    }
}

/// Assert that two groups are equal ignoring cycle-clock fields
pub fn assert_groups_equal(group1: &Group, group2: &Group) {
    assert_eq!(group1.group_id, group2.group_id);
    assert_eq!(group1.name, group2.name);
    assert_eq!(group1.creator, group2.creator);
    assert_eq!(group1.deposit_per_member, group2.deposit_per_member);
    assert_eq!(group1.max_members, group2.max_members);
    assert_eq!(group1.mode, group2.mode);
    assert_eq!(group1.kind, group2.kind);
}

/// Assert that two members are equal ignoring join block
pub fn assert_members_equal(member1: &Member, member2: &Member) {
    assert_eq!(member1.group_id, member2.group_id);
    assert_eq!(member1.address, member2.address);
    assert_eq!(member1.name, member2.name);
    assert_eq!(member1.payout_position, member2.payout_position);
}
