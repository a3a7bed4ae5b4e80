use anchor_lang::prelude::*;

#[error_code]
pub enum StakePoolError {
    #[msg("Insufficient balance for this operation")]
    InsufficientFunds,

    #[msg("User already holds an entry in this pool")]
    AlreadyJoined,

    #[msg("Wager is not open")]
    WagerNotOpen,

    #[msg("Wager deadline has passed")]
    WagerExpired,

    #[msg("Wager deadline has not passed yet")]
    WagerNotReady,

    #[msg("Wager is not resolved")]
    WagerNotResolved,

    #[msg("Already settled")]
    AlreadySettled,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Stake is below the minimum")]
    BelowMinStake,

    #[msg("Side label is empty, too long, or duplicated")]
    InvalidSideLabel,

    #[msg("Wager deadline is too soon")]
    DeadlineTooSoon,

    #[msg("Wager is not stale enough to refund")]
    WagerNotStale,

    #[msg("Invalid fee basis points (must be <= 10000)")]
    InvalidFeeBps,

    #[msg("Invalid config parameter")]
    InvalidConfigParam,

    #[msg("Amount is outside the user's verified transfer limits; verification required")]
    VerificationRequired,

    #[msg("Invalid KYC transfer limits")]
    InvalidKycLimits,

    #[msg("Question count is outside the configured bounds")]
    QuestionCountOutOfRange,

    #[msg("Participant count is outside the configured bounds")]
    ParticipantCountOutOfRange,

    #[msg("Entry fee per question is outside the configured bounds")]
    EntryFeeOutOfRange,

    #[msg("Invalid top-N winner count")]
    InvalidTopN,

    #[msg("Quiz title is empty or exceeds maximum length")]
    TitleTooLong,

    #[msg("Quiz duration must be greater than zero")]
    InvalidDuration,

    #[msg("Question prompt is empty or exceeds maximum length")]
    InvalidPrompt,

    #[msg("Question must have between 2 and 4 options of bounded length")]
    InvalidOptions,

    #[msg("Quiz is not in draft")]
    QuizNotDraft,

    #[msg("Quiz still has questions missing")]
    QuizIncomplete,

    #[msg("Quiz is not open")]
    QuizNotOpen,

    #[msg("Quiz is not in progress")]
    QuizNotInProgress,

    #[msg("Quiz has ended")]
    QuizEnded,

    #[msg("Quiz has reached its participant limit")]
    QuizFull,

    #[msg("Quiz cannot be settled yet")]
    QuizNotSettleable,

    #[msg("Quiz cannot be cancelled in its current state")]
    QuizNotCancellable,

    #[msg("Quiz cannot be closed yet")]
    QuizNotCloseable,

    #[msg("Quiz has no completed participants")]
    NoCompletedParticipants,

    #[msg("Participant has not started the quiz")]
    ParticipantNotStarted,

    #[msg("Participant has already completed the quiz")]
    ParticipantAlreadyCompleted,

    #[msg("Score exceeds the number of questions")]
    InvalidScore,

    #[msg("Supplied participants do not match the completed set")]
    ParticipantMismatch,

    #[msg("Supplied entry does not belong to this wager")]
    EntryMismatch,

    #[msg("Balance account does not belong to the expected user")]
    BalanceOwnerMismatch,

    #[msg("Remaining accounts must come in pairs")]
    MalformedRemainingAccounts,

    #[msg("Payouts would exceed the distributable pool")]
    PoolExhausted,

    #[msg("Amount exceeds accrued platform fees")]
    InsufficientAccruedFees,

    #[msg("Insufficient vault balance for rent exemption")]
    InsufficientRentBalance,

    #[msg("Platform is paused")]
    PlatformPaused,

    #[msg("Signer is not allowed to perform this action")]
    Unauthorized,

    #[msg("Reference or reason text exceeds maximum length")]
    ReferenceTooLong,

    #[msg("Arithmetic overflow")]
    MathOverflow,
}
