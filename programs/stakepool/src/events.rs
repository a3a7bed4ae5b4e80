use anchor_lang::prelude::*;
use crate::ledger::{TransactionKind, TransactionMetadata};
use crate::state::{PayoutPolicy, Side, VerificationTier, WagerOutcome};

/// Append-only audit record, one per balance mutation. Replaying a user's
/// records in `sequence` order reproduces their balance.
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerTransaction {
    pub user: Pubkey,
    pub kind: TransactionKind,
    pub amount: i64,
    pub balance_after: u64,
    pub sequence: u64,
    pub reference: Pubkey,
    pub metadata: TransactionMetadata,
    pub timestamp: i64,
}

#[event]
pub struct ProtocolInitialized {
    pub authority: Pubkey,
    pub treasury: Pubkey,
    pub wager_fee_bps: u16,
    pub quiz_fee_bps: u16,
}

#[event]
pub struct ConfigUpdated {
    pub authority: Pubkey,
    pub wager_fee_bps: u16,
    pub quiz_fee_bps: u16,
}

#[event]
pub struct KycProfileUpdated {
    pub user: Pubkey,
    pub tier: VerificationTier,
    pub min_transfer: u64,
    pub max_transfer: u64,
}

#[event]
pub struct FundsDeposited {
    pub user: Pubkey,
    pub amount: u64,
    pub provider_reference: String,
}

#[event]
pub struct FundsWithdrawn {
    pub user: Pubkey,
    pub amount: u64,
    pub provider_reference: String,
}

#[event]
pub struct PlatformFeesWithdrawn {
    pub treasury: Pubkey,
    pub amount: u64,
    pub remaining: u64,
}

#[event]
pub struct WagerCreated {
    pub wager: Pubkey,
    pub creator: Pubkey,
    pub wager_id: u64,
    pub side_a_label: String,
    pub side_b_label: String,
    pub stake_lamports: u64,
    pub deadline: i64,
    pub fee_bps: u16,
}

#[event]
pub struct WagerJoined {
    pub wager: Pubkey,
    pub user: Pubkey,
    pub side: Side,
    pub amount: u64,
    pub side_a_total: u64,
    pub side_b_total: u64,
}

#[event]
pub struct WagerResolved {
    pub wager: Pubkey,
    pub outcome: WagerOutcome,
    pub forced: bool,
}

#[event]
pub struct WagerSettled {
    pub wager: Pubkey,
    pub policy: PayoutPolicy,
    pub total_pool: u64,
    pub platform_fee: u64,
    pub distributable: u64,
}

#[event]
pub struct WagerRefunded {
    pub wager: Pubkey,
    pub total_pool: u64,
    pub entry_count: u32,
}

#[event]
pub struct WagerPayoutsCompleted {
    pub wager: Pubkey,
    pub paid_out: u64,
    pub residual: u64,
}

#[event]
pub struct QuizCreated {
    pub quiz: Pubkey,
    pub creator: Pubkey,
    pub quiz_id: u64,
    pub base_cost: u64,
    pub platform_fee: u64,
    pub total_cost: u64,
}

#[event]
pub struct QuizQuestionAdded {
    pub quiz: Pubkey,
    pub index: u16,
}

#[event]
pub struct QuizPublished {
    pub quiz: Pubkey,
}

#[event]
pub struct QuizStarted {
    pub quiz: Pubkey,
    pub ends_at: i64,
}

#[event]
pub struct QuizParticipantJoined {
    pub quiz: Pubkey,
    pub user: Pubkey,
    pub invited: bool,
}

#[event]
pub struct QuizParticipantInvited {
    pub quiz: Pubkey,
    pub user: Pubkey,
}

#[event]
pub struct QuizParticipantCompleted {
    pub quiz: Pubkey,
    pub user: Pubkey,
    pub score: u32,
}

#[event]
pub struct QuizClosed {
    pub quiz: Pubkey,
    pub completed_count: u16,
}

#[event]
pub struct QuizSettled {
    pub quiz: Pubkey,
    pub policy: PayoutPolicy,
    pub prize_pool: u64,
    pub distributed: u64,
    pub winner_count: u32,
    pub returned_to_creator: u64,
}

#[event]
pub struct QuizCancelled {
    pub quiz: Pubkey,
    pub refunded: u64,
    pub reason: String,
}

#[event]
pub struct PlatformPauseToggled {
    pub authority: Pubkey,
    pub paused: bool,
    pub timestamp: i64,
}

#[event]
pub struct AuthorityTransferred {
    pub old_authority: Pubkey,
    pub new_authority: Pubkey,
    pub timestamp: i64,
}
