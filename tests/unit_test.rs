mod helpers;

use coopsave_ledger::error::{ErrorKind, LedgerError};
use coopsave_ledger::models::*;
use coopsave_ledger::state_digest;

/// Unit tests for group mode conversions
#[test]
fn test_group_mode_conversion() {
    assert_eq!(GroupMode::from_u8(1).unwrap(), GroupMode::RotatingPayout);
    assert_eq!(GroupMode::from_u8(2).unwrap(), GroupMode::CollectivePool);
    assert_eq!(GroupMode::from_u8(3).unwrap(), GroupMode::InterestBearing);
    assert_eq!(GroupMode::from_u8(0), Err(LedgerError::InvalidMode));

    assert_eq!(GroupMode::RotatingPayout.as_u8(), 1);
    assert_eq!(GroupMode::RotatingPayout.label(), "Traditional ROSCA");
    assert_eq!(GroupMode::CollectivePool.label(), "Collective Savings");
}

/// Unit tests for group kind conversions
#[test]
fn test_group_kind_conversion() {
    assert_eq!(GroupKind::from_u8(1).unwrap(), GroupKind::Private);
    assert_eq!(GroupKind::from_u8(2).unwrap(), GroupKind::Public);
    assert_eq!(GroupKind::from_u8(3), Err(LedgerError::InvalidGroupType));
    assert_eq!(GroupKind::Public.as_u8(), 2);
}

/// Unit tests for group status labels
#[test]
fn test_group_status_labels() {
    assert_eq!(GroupStatus::Enrollment.as_u8(), 0);
    assert_eq!(GroupStatus::Active.as_u8(), 1);
    assert_eq!(GroupStatus::Completed.as_u8(), 2);
    assert_eq!(GroupStatus::Paused.as_u8(), 3);
    assert_eq!(GroupStatus::WithdrawalOpen.as_u8(), 4);
    assert_eq!(GroupStatus::Active.as_str(), "active");
    assert_eq!(GroupStatus::WithdrawalOpen.as_str(), "withdrawal_open");
}

/// Error codes must match the original contract's error table
#[test]
fn test_error_codes_are_stable() {
    assert_eq!(LedgerError::Unauthorized.code(), 300);
    assert_eq!(
        LedgerError::NotYourTurn {
            position: 2,
            current_cycle: 1
        }
        .code(),
        301
    );
    assert_eq!(LedgerError::TransferFailed.code(), 302);
    assert_eq!(LedgerError::NoBalance.code(), 303);
    assert_eq!(LedgerError::EmptyName.code(), 304);
    assert_eq!(LedgerError::MaxMembers { max_members: 5 }.code(), 305);
    assert_eq!(LedgerError::GroupNotFound("g".to_string()).code(), 306);
    assert_eq!(LedgerError::AlreadyMember.code(), 307);
    assert_eq!(LedgerError::NotMember.code(), 308);
    assert_eq!(LedgerError::AlreadyPaid { cycle: 1 }.code(), 309);
    assert_eq!(LedgerError::NotTimeYet.code(), 310);
    assert_eq!(LedgerError::GracePeriodEnded.code(), 311);
    assert_eq!(LedgerError::InsufficientContributions.code(), 312);
    assert_eq!(
        LedgerError::InvalidPayoutPosition {
            position: 9,
            max_members: 5
        }
        .code(),
        313
    );
    assert_eq!(LedgerError::AlreadyReceivedPayout.code(), 314);
    assert_eq!(LedgerError::GroupCompleted.code(), 315);
    assert_eq!(LedgerError::InvalidMode.code(), 316);
    assert_eq!(LedgerError::ModeChangePending.code(), 317);
    assert_eq!(LedgerError::AlreadyVoted.code(), 318);
    assert_eq!(LedgerError::NotAllCyclesComplete.code(), 319);
    assert_eq!(LedgerError::WithdrawalNotAvailable.code(), 320);
    assert_eq!(LedgerError::AlreadyWithdrawn.code(), 321);
    assert_eq!(LedgerError::CycleInProgress.code(), 322);
    assert_eq!(LedgerError::EnrollmentClosed.code(), 323);
    assert_eq!(LedgerError::InvalidGroupType.code(), 324);
    assert_eq!(LedgerError::GroupNotPublic.code(), 325);
}

/// Each error maps into its taxonomy class
#[test]
fn test_error_kinds() {
    assert_eq!(LedgerError::Unauthorized.kind(), ErrorKind::Authorization);
    assert_eq!(LedgerError::AlreadyMember.kind(), ErrorKind::Membership);
    assert_eq!(LedgerError::EnrollmentClosed.kind(), ErrorKind::Timing);
    assert_eq!(LedgerError::GracePeriodEnded.kind(), ErrorKind::Timing);
    assert_eq!(LedgerError::NoBalance.kind(), ErrorKind::Funds);
    assert_eq!(LedgerError::AlreadyPaid { cycle: 3 }.kind(), ErrorKind::Funds);
    assert_eq!(
        LedgerError::MaxMembers { max_members: 2 }.kind(),
        ErrorKind::Configuration
    );
    assert_eq!(
        LedgerError::GroupNotFound("g".to_string()).kind(),
        ErrorKind::Lookup
    );
    assert_eq!(LedgerError::AlreadyVoted.kind(), ErrorKind::Governance);

    assert!(LedgerError::GroupNotFound("g".to_string()).is_not_found());
    assert!(LedgerError::EnrollmentClosed.is_retryable_later());
    assert!(!LedgerError::Unauthorized.is_retryable_later());
}

/// Unit tests for error display
#[test]
fn test_error_display() {
    let err = LedgerError::NotYourTurn {
        position: 3,
        current_cycle: 1,
    };
    let rendered = format!("{}", err);
    assert!(rendered.contains("position 3"));
    assert!(rendered.contains("cycle 1"));

    assert!(format!("{}", LedgerError::GroupNotFound("circle-9".to_string())).contains("circle-9"));
}

/// Unit tests for the contribution digest
#[test]
fn test_contribution_digest_round_trip() {
    let contributions: Vec<Contribution> = (0..4)
        .map(|i| {
            Contribution::paid(
                "g-1".to_string(),
                format!("member-{}", i),
                1,
                100,
                10 + i as u64,
            )
        })
        .collect();
    let refs: Vec<&Contribution> = contributions.iter().collect();

    let (root, proofs) = state_digest::contribution_proofs(&refs);
    assert_eq!(root.len(), 32);
    assert_eq!(proofs.len(), 4);
    for proof in &proofs {
        assert!(state_digest::verify_proof(proof, &root));
    }

    // Tampered root must not verify
    let mut wrong_root = root.clone();
    wrong_root[0] ^= 0xff;
    assert!(!state_digest::verify_proof(&proofs[0], &wrong_root));
}

/// Member records start with a clean slate
#[test]
fn test_member_initial_state() {
    let member = Member::new(
        "g-1".to_string(),
        helpers::ALICE.to_string(),
        "Alice".to_string(),
        1,
        42,
    );
    assert_eq!(member.payout_position, 1);
    assert_eq!(member.total_contributed, 0);
    assert!(!member.has_received_payout);
    assert!(!member.has_withdrawn);
    assert!(!member.voted_on_mode_change);
    assert_eq!(member.joined_at_block, 42);
}
