use thiserror::Error;

/// Broad failure classes the embedding application can branch on when
/// mapping a rejection to a recovery action (retry, wait, browse elsewhere).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller lacks the required role (creator-only operations)
    Authorization,
    /// Caller is not, or already is, a member
    Membership,
    /// Action attempted outside its valid window
    Timing,
    /// Insufficient balance, transfer failure, or a funds flag already set
    Funds,
    /// Invalid creation parameters or group configuration
    Configuration,
    /// Referenced group does not exist
    Lookup,
    /// Mode-change vote state conflicts
    Governance,
}

/// Ledger-level error types.
///
/// Each variant carries the numeric code the original savings contract
/// returned for the same rule violation, so embedders migrating off-chain
/// keep a stable machine-readable surface. Codes 326..=331 cover rules the
/// contract enforced without a dedicated public code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller is not the group creator
    #[error("unauthorized: only the group creator can perform this action")]
    Unauthorized,

    /// Payout claimed out of turn
    #[error("not your turn: payout position {position} does not match current cycle {current_cycle}")]
    NotYourTurn { position: u32, current_cycle: u32 },

    /// A balance movement could not be applied
    #[error("transfer failed")]
    TransferFailed,

    /// Caller's account cannot cover the amount
    #[error("insufficient balance")]
    NoBalance,

    /// Group or member name is empty
    #[error("empty name")]
    EmptyName,

    /// Group is already at capacity
    #[error("group is full: maximum {max_members} members allowed")]
    MaxMembers { max_members: u32 },

    /// No group under the given id
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// Caller already joined this group
    #[error("already a member of this group")]
    AlreadyMember,

    /// Caller never joined this group
    #[error("not a member of this group")]
    NotMember,

    /// A paid contribution already exists for this cycle
    #[error("already deposited for cycle {cycle}")]
    AlreadyPaid { cycle: u32 },

    /// The group's cycling has not begun
    #[error("not time yet: the cycle has not started")]
    NotTimeYet,

    /// The claim window for the cycle has closed
    #[error("grace period for this cycle has ended")]
    GracePeriodEnded,

    /// The cycle pool is not fully funded
    #[error("insufficient contributions in the pool for this cycle")]
    InsufficientContributions,

    /// Payout position outside [1, max_members] or already taken
    #[error("invalid payout position {position}: must be unique and within 1..={max_members}")]
    InvalidPayoutPosition { position: u32, max_members: u32 },

    /// Member already received their rotating payout
    #[error("payout already received")]
    AlreadyReceivedPayout,

    /// Group has finished all of its cycles
    #[error("group has completed all cycles")]
    GroupCompleted,

    /// Mode value is not a recognized group mode, or is invalid here
    #[error("invalid group mode")]
    InvalidMode,

    /// A mode-change vote is already open
    #[error("a mode change vote is already pending")]
    ModeChangePending,

    /// Caller already voted on the open proposal
    #[error("already voted on this mode change")]
    AlreadyVoted,

    /// Withdrawal requires every cycle to have completed
    #[error("not all cycles are complete")]
    NotAllCyclesComplete,

    /// The withdrawal window is not open
    #[error("withdrawal is not available")]
    WithdrawalNotAvailable,

    /// Member already withdrew their savings
    #[error("savings already withdrawn")]
    AlreadyWithdrawn,

    /// Operation disallowed while a cycle is running
    #[error("a cycle is in progress")]
    CycleInProgress,

    /// The enrollment window has passed
    #[error("enrollment period has closed")]
    EnrollmentClosed,

    /// Operation not allowed for this group type (public vs private)
    #[error("operation not allowed for this group type")]
    InvalidGroupType,

    /// Private groups cannot be joined without an invitation
    #[error("group is not public")]
    GroupNotPublic,

    /// Group is administratively paused
    #[error("group is paused")]
    GroupPaused,

    /// Name or description exceeds the configured bound
    #[error("name or description too long: at most {max} characters")]
    NameTooLong { max: usize },

    /// Zero deposit amount, cycle duration, or enrollment period
    #[error("invalid amount: must be greater than zero")]
    InvalidAmount,

    /// max_members outside the permitted range
    #[error("invalid member limit {requested}: must be within 2..={cap}")]
    InvalidMemberLimit { requested: u32, cap: u32 },

    /// A group already exists under the given id
    #[error("group id already taken: {0}")]
    GroupIdTaken(String),

    /// Vote cast with no proposal open
    #[error("no mode change is pending")]
    NoPendingModeChange,
}

/// Result type alias for ledger operations
pub type AppResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// Numeric code matching the original contract's error table
    pub fn code(&self) -> u32 {
        match self {
            LedgerError::Unauthorized => 300,
            LedgerError::NotYourTurn { .. } => 301,
            LedgerError::TransferFailed => 302,
            LedgerError::NoBalance => 303,
            LedgerError::EmptyName => 304,
            LedgerError::MaxMembers { .. } => 305,
            LedgerError::GroupNotFound(_) => 306,
            LedgerError::AlreadyMember => 307,
            LedgerError::NotMember => 308,
            LedgerError::AlreadyPaid { .. } => 309,
            LedgerError::NotTimeYet => 310,
            LedgerError::GracePeriodEnded => 311,
            LedgerError::InsufficientContributions => 312,
            LedgerError::InvalidPayoutPosition { .. } => 313,
            LedgerError::AlreadyReceivedPayout => 314,
            LedgerError::GroupCompleted => 315,
            LedgerError::InvalidMode => 316,
            LedgerError::ModeChangePending => 317,
            LedgerError::AlreadyVoted => 318,
            LedgerError::NotAllCyclesComplete => 319,
            LedgerError::WithdrawalNotAvailable => 320,
            LedgerError::AlreadyWithdrawn => 321,
            LedgerError::CycleInProgress => 322,
            LedgerError::EnrollmentClosed => 323,
            LedgerError::InvalidGroupType => 324,
            LedgerError::GroupNotPublic => 325,
            LedgerError::GroupPaused => 326,
            LedgerError::NameTooLong { .. } => 327,
            LedgerError::InvalidAmount => 328,
            LedgerError::InvalidMemberLimit { .. } => 329,
            LedgerError::GroupIdTaken(_) => 330,
            LedgerError::NoPendingModeChange => 331,
        }
    }

    /// Failure class for recovery-action mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Unauthorized => ErrorKind::Authorization,

            LedgerError::AlreadyMember | LedgerError::NotMember => ErrorKind::Membership,

            LedgerError::NotYourTurn { .. }
            | LedgerError::NotTimeYet
            | LedgerError::GracePeriodEnded
            | LedgerError::CycleInProgress
            | LedgerError::EnrollmentClosed
            | LedgerError::NotAllCyclesComplete
            | LedgerError::WithdrawalNotAvailable
            | LedgerError::GroupCompleted
            | LedgerError::GroupPaused => ErrorKind::Timing,

            LedgerError::TransferFailed
            | LedgerError::NoBalance
            | LedgerError::AlreadyPaid { .. }
            | LedgerError::InsufficientContributions
            | LedgerError::AlreadyReceivedPayout
            | LedgerError::AlreadyWithdrawn => ErrorKind::Funds,

            LedgerError::EmptyName
            | LedgerError::NameTooLong { .. }
            | LedgerError::MaxMembers { .. }
            | LedgerError::InvalidPayoutPosition { .. }
            | LedgerError::InvalidMode
            | LedgerError::InvalidGroupType
            | LedgerError::GroupNotPublic
            | LedgerError::InvalidAmount
            | LedgerError::InvalidMemberLimit { .. }
            | LedgerError::GroupIdTaken(_) => ErrorKind::Configuration,

            LedgerError::GroupNotFound(_) => ErrorKind::Lookup,

            LedgerError::ModeChangePending
            | LedgerError::AlreadyVoted
            | LedgerError::NoPendingModeChange => ErrorKind::Governance,
        }
    }

    /// Check if error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::GroupNotFound(_))
    }

    /// Check if waiting and retrying later could succeed
    pub fn is_retryable_later(&self) -> bool {
        self.kind() == ErrorKind::Timing
    }
}
