use anchor_lang::prelude::*;
use crate::errors::StakePoolError;
use crate::math::PoolTerms;

/// Hard ceiling on quiz size. Settlement takes every completed participant
/// plus its balance account in one transaction: a full quiz is 48 remaining
/// accounts on top of the named ones, more than a legacy transaction can
/// carry, so large settlements must be sent as a versioned transaction with
/// an address lookup table. The total stays under the 64 account-lock limit.
pub const MAX_QUIZ_PARTICIPANTS_CAP: u16 = 24;

/// Open wagers left unresolved this long past their deadline can be refunded by anyone.
pub const STALE_GRACE_PERIOD: i64 = 30 * 24 * 3600; // 30 days

#[account]
pub struct Config {
    pub authority: Pubkey,
    pub treasury: Pubkey,
    pub kyc_authority: Pubkey,
    pub grader: Pubkey,
    pub wager_fee_bps: u16,
    pub quiz_fee_bps: u16,
    pub min_stake_lamports: u64,
    pub min_wager_duration_seconds: i64,
    pub max_quiz_questions: u16,
    pub max_quiz_participants: u16,
    pub min_entry_fee_per_question: u64,
    pub max_entry_fee_per_question: u64,
    pub unverified_max_transfer: u64,
    pub accrued_fees: u64,
    pub wager_count: u64,
    pub quiz_count: u64,
    pub paused: bool,
    pub bump: u8,
    pub vault_bump: u8,
}

impl Config {
    pub const SIZE: usize = 8    // discriminator
        + 32 * 4                  // authority, treasury, kyc_authority, grader
        + 2 + 2                   // wager_fee_bps, quiz_fee_bps
        + 8                       // min_stake_lamports
        + 8                       // min_wager_duration_seconds
        + 2 + 2                   // max_quiz_questions, max_quiz_participants
        + 8 + 8                   // entry fee bounds
        + 8                       // unverified_max_transfer
        + 8                       // accrued_fees
        + 8 + 8                   // wager_count, quiz_count
        + 1                       // paused
        + 1 + 1;                  // bump, vault_bump

    pub fn validate(&self) -> Result<()> {
        require!(
            self.wager_fee_bps as u128 <= crate::math::BPS_DENOMINATOR
                && self.quiz_fee_bps as u128 <= crate::math::BPS_DENOMINATOR,
            StakePoolError::InvalidFeeBps
        );
        require!(self.min_stake_lamports > 0, StakePoolError::InvalidConfigParam);
        require!(self.min_wager_duration_seconds > 0, StakePoolError::InvalidConfigParam);
        require!(self.max_quiz_questions > 0, StakePoolError::InvalidConfigParam);
        require!(
            self.max_quiz_participants > 0 && self.max_quiz_participants <= MAX_QUIZ_PARTICIPANTS_CAP,
            StakePoolError::InvalidConfigParam
        );
        require!(
            self.min_entry_fee_per_question > 0
                && self.min_entry_fee_per_question <= self.max_entry_fee_per_question,
            StakePoolError::InvalidConfigParam
        );
        Ok(())
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Installs `new_authority`, returning the one it replaces.
    pub fn hand_over_authority(&mut self, new_authority: Pubkey) -> Result<Pubkey> {
        require_keys_neq!(new_authority, Pubkey::default(), StakePoolError::InvalidConfigParam);
        require_keys_neq!(new_authority, self.authority, StakePoolError::InvalidConfigParam);
        Ok(std::mem::replace(&mut self.authority, new_authority))
    }

    pub fn accrue_fee(&mut self, amount: u64) -> Result<()> {
        self.accrued_fees = self.accrued_fees
            .checked_add(amount)
            .ok_or(StakePoolError::MathOverflow)?;
        Ok(())
    }
}

/// Program-owned account holding the lamports behind every ledger balance,
/// open pool, quiz reservation and accrued fee.
#[account]
pub struct Vault {
    pub total_deposited: u64,
    pub total_withdrawn: u64,
    pub bump: u8,
}

impl Vault {
    pub const SIZE: usize = 8 + 8 + 8 + 1;
}

/// Per-user ledger head. Mutated only through `reserve` / `release` in `ledger.rs`.
#[account]
pub struct UserBalance {
    pub owner: Pubkey,
    pub balance: u64,
    pub total_credited: u64,
    pub total_debited: u64,
    pub tx_count: u64,
    pub bump: u8,
}

impl UserBalance {
    pub const SIZE: usize = 8 + 32 + 8 + 8 + 8 + 8 + 1;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerificationTier {
    Unverified,
    Basic,
    Full,
}

#[account]
#[derive(Debug)]
pub struct KycProfile {
    pub user: Pubkey,
    pub tier: VerificationTier,
    pub min_transfer: u64,
    pub max_transfer: u64,
    pub updated_at: i64,
    pub bump: u8,
}

impl KycProfile {
    pub const SIZE: usize = 8 + 32 + 1 + 8 + 8 + 8 + 1;
}

// ---------------------------------------------------------------------------
// Wagers
// ---------------------------------------------------------------------------

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WagerOutcome {
    SideA,
    SideB,
    Push,
}

impl WagerOutcome {
    pub fn winning_side(&self) -> Option<Side> {
        match self {
            WagerOutcome::SideA => Some(Side::A),
            WagerOutcome::SideB => Some(Side::B),
            WagerOutcome::Push => None,
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WagerStatus {
    Open,
    Resolved,
    Settled,
    Refunded,
}

#[account]
pub struct Wager {
    pub wager_id: u64,
    pub creator: Pubkey,
    pub side_a_label: String,
    pub side_b_label: String,
    pub stake_lamports: u64,
    pub deadline: i64,
    pub status: WagerStatus,
    pub outcome: Option<WagerOutcome>,
    pub fee_bps: u16,

    // Aggregates, updated in the same instruction as the entry write
    pub side_a_total: u64,
    pub side_b_total: u64,
    pub side_a_count: u32,
    pub side_b_count: u32,

    // Payout progress
    pub processed_entries: u32,
    pub paid_out: u64,
    pub residual: u64,
    pub payouts_complete: bool,

    pub created_at: i64,
    pub resolved_at: i64,
    pub bump: u8,
}

impl Wager {
    pub const MAX_LABEL_LEN: usize = 64;
    pub const SIZE: usize = 8    // discriminator
        + 8                       // wager_id
        + 32                      // creator
        + 4 + Self::MAX_LABEL_LEN // side_a_label
        + 4 + Self::MAX_LABEL_LEN // side_b_label
        + 8                       // stake_lamports
        + 8                       // deadline
        + 1                       // status
        + 1 + 1                   // outcome (Option<WagerOutcome>)
        + 2                       // fee_bps
        + 8 + 8                   // side totals
        + 4 + 4                   // side counts
        + 4                       // processed_entries
        + 8                       // paid_out
        + 8                       // residual
        + 1                       // payouts_complete
        + 8                       // created_at
        + 8                       // resolved_at
        + 1;                      // bump

    pub fn entry_count(&self) -> u32 {
        self.side_a_count.saturating_add(self.side_b_count)
    }

    pub fn total_pool(&self) -> Result<u64> {
        Ok(self.side_a_total
            .checked_add(self.side_b_total)
            .ok_or(StakePoolError::MathOverflow)?)
    }

    pub fn ensure_joinable(&self, now: i64) -> Result<()> {
        require!(self.status == WagerStatus::Open, StakePoolError::WagerNotOpen);
        require!(now < self.deadline, StakePoolError::WagerExpired);
        Ok(())
    }

    pub fn record_entry(&mut self, side: Side, amount: u64) -> Result<()> {
        match side {
            Side::A => {
                self.side_a_total = self.side_a_total.checked_add(amount).ok_or(StakePoolError::MathOverflow)?;
                self.side_a_count = self.side_a_count.checked_add(1).ok_or(StakePoolError::MathOverflow)?;
            }
            Side::B => {
                self.side_b_total = self.side_b_total.checked_add(amount).ok_or(StakePoolError::MathOverflow)?;
                self.side_b_count = self.side_b_count.checked_add(1).ok_or(StakePoolError::MathOverflow)?;
            }
        }
        Ok(())
    }

    pub fn resolve(&mut self, outcome: WagerOutcome, now: i64, force: bool) -> Result<()> {
        require!(self.status == WagerStatus::Open, StakePoolError::WagerNotOpen);
        require!(force || now >= self.deadline, StakePoolError::WagerNotReady);
        self.status = WagerStatus::Resolved;
        self.outcome = Some(outcome);
        self.resolved_at = now;
        Ok(())
    }

    /// The single `Resolved -> Settled` transition. Whoever performs it owns the payouts.
    pub fn begin_settlement(&mut self) -> Result<WagerOutcome> {
        require!(self.status != WagerStatus::Settled, StakePoolError::AlreadySettled);
        require!(self.status == WagerStatus::Resolved, StakePoolError::WagerNotResolved);
        let outcome = self.outcome.ok_or(StakePoolError::WagerNotResolved)?;
        self.status = WagerStatus::Settled;
        Ok(outcome)
    }

    pub fn begin_refund(&mut self) -> Result<()> {
        require!(self.status == WagerStatus::Open, StakePoolError::WagerNotOpen);
        self.status = WagerStatus::Refunded;
        self.outcome = None;
        Ok(())
    }

    pub fn is_stale(&self, now: i64) -> bool {
        now > self.deadline.saturating_add(STALE_GRACE_PERIOD)
    }

    /// Pricing for payouts, rebuilt from the side aggregates so every batch of
    /// a settled wager sees identical terms.
    pub fn payout_terms(&self) -> Result<PoolTerms> {
        match (self.status, self.outcome) {
            (WagerStatus::Settled, Some(outcome)) => {
                PoolTerms::pari_mutuel(self.side_a_total, self.side_b_total, outcome, self.fee_bps)
            }
            (WagerStatus::Refunded, _) => Ok(PoolTerms::refund(self.total_pool()?)),
            _ => err!(StakePoolError::WagerNotResolved),
        }
    }

    /// Books one processed entry. Returns true once every entry has been processed.
    pub fn record_payout(&mut self, amount: u64) -> Result<bool> {
        self.processed_entries = self.processed_entries
            .checked_add(1)
            .ok_or(StakePoolError::MathOverflow)?;
        self.paid_out = self.paid_out
            .checked_add(amount)
            .ok_or(StakePoolError::MathOverflow)?;
        Ok(self.processed_entries == self.entry_count())
    }
}

#[account]
pub struct WagerEntry {
    pub wager: Pubkey,
    pub user: Pubkey,
    pub side: Side,
    pub amount: u64,
    pub joined_at: i64,
    pub paid: bool,
    pub payout: u64,
    pub bump: u8,
}

impl WagerEntry {
    pub const SIZE: usize = 8 + 32 + 32 + 1 + 8 + 8 + 1 + 8 + 1;

    /// The entry PDA is per (wager, user); a populated one means a second join.
    pub fn ensure_vacant(&self) -> Result<()> {
        require!(self.user == Pubkey::default(), StakePoolError::AlreadyJoined);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Quizzes
// ---------------------------------------------------------------------------

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizStatus {
    Draft,
    Open,
    InProgress,
    Completed,
    Settled,
    Cancelled,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettlementMethod {
    Proportional,
    TopN,
}

#[account]
pub struct Quiz {
    pub quiz_id: u64,
    pub creator: Pubkey,
    pub title: String,
    pub entry_fee_per_question: u64,
    pub total_questions: u16,
    pub max_participants: u16,
    pub questions_added: u16,

    pub base_cost: u64,
    pub platform_fee: u64,
    pub total_cost: u64,

    pub settlement_method: SettlementMethod,
    pub top_n: u16,
    pub duration_seconds: i64,
    pub started_at: i64,
    pub ends_at: i64,

    pub status: QuizStatus,
    pub participant_count: u16,
    pub completed_count: u16,
    pub total_score: u64,
    pub residual: u64,

    pub created_at: i64,
    pub bump: u8,
}

impl Quiz {
    pub const MAX_TITLE_LEN: usize = 128;
    pub const SIZE: usize = 8    // discriminator
        + 8                       // quiz_id
        + 32                      // creator
        + 4 + Self::MAX_TITLE_LEN // title
        + 8                       // entry_fee_per_question
        + 2 + 2 + 2               // total_questions, max_participants, questions_added
        + 8 + 8 + 8               // base_cost, platform_fee, total_cost
        + 1                       // settlement_method
        + 2                       // top_n
        + 8 + 8 + 8               // duration_seconds, started_at, ends_at
        + 1                       // status
        + 2 + 2                   // participant_count, completed_count
        + 8                       // total_score
        + 8                       // residual
        + 8                       // created_at
        + 1;                      // bump

    pub fn publish(&mut self) -> Result<()> {
        require!(self.status == QuizStatus::Draft, StakePoolError::QuizNotDraft);
        require!(self.questions_added == self.total_questions, StakePoolError::QuizIncomplete);
        self.status = QuizStatus::Open;
        Ok(())
    }

    pub fn start(&mut self, now: i64) -> Result<()> {
        require!(self.status == QuizStatus::Open, StakePoolError::QuizNotOpen);
        self.status = QuizStatus::InProgress;
        self.started_at = now;
        self.ends_at = now
            .checked_add(self.duration_seconds)
            .ok_or(StakePoolError::MathOverflow)?;
        Ok(())
    }

    pub fn ensure_joinable(&self, now: i64) -> Result<()> {
        match self.status {
            QuizStatus::Open => {}
            QuizStatus::InProgress => require!(now < self.ends_at, StakePoolError::QuizEnded),
            _ => return err!(StakePoolError::QuizNotOpen),
        }
        Ok(())
    }

    /// Claims a participant slot.
    pub fn add_participant(&mut self) -> Result<()> {
        require!(self.participant_count < self.max_participants, StakePoolError::QuizFull);
        self.participant_count += 1;
        Ok(())
    }

    pub fn record_completion(&mut self, score: u32) -> Result<()> {
        require!(self.status == QuizStatus::InProgress, StakePoolError::QuizNotInProgress);
        require!(score <= self.total_questions as u32, StakePoolError::InvalidScore);
        self.completed_count = self.completed_count
            .checked_add(1)
            .ok_or(StakePoolError::MathOverflow)?;
        self.total_score = self.total_score
            .checked_add(score as u64)
            .ok_or(StakePoolError::MathOverflow)?;
        Ok(())
    }

    pub fn end_play(&mut self, now: i64, privileged: bool) -> Result<()> {
        require!(self.status == QuizStatus::InProgress, StakePoolError::QuizNotInProgress);
        require!(privileged || now >= self.ends_at, StakePoolError::QuizNotCloseable);
        self.status = QuizStatus::Completed;
        Ok(())
    }

    /// The single transition into `Settled`.
    pub fn begin_settlement(&mut self, now: i64, forced: bool) -> Result<()> {
        let ready = match self.status {
            QuizStatus::Settled => return err!(StakePoolError::AlreadySettled),
            QuizStatus::Completed => true,
            QuizStatus::InProgress => forced || now >= self.ends_at,
            _ => false,
        };
        require!(ready, StakePoolError::QuizNotSettleable);
        require!(self.completed_count > 0, StakePoolError::NoCompletedParticipants);
        self.status = QuizStatus::Settled;
        Ok(())
    }

    /// Creators may only pull out before play starts, or once the quiz has
    /// expired without a single completion.
    pub fn cancel(&mut self, now: i64, privileged: bool) -> Result<()> {
        let expired_unplayed = self.completed_count == 0 && self.ends_at > 0 && now >= self.ends_at;
        let allowed = match self.status {
            QuizStatus::Draft | QuizStatus::Open => true,
            QuizStatus::InProgress | QuizStatus::Completed => privileged || expired_unplayed,
            QuizStatus::Settled | QuizStatus::Cancelled => false,
        };
        require!(allowed, StakePoolError::QuizNotCancellable);
        self.status = QuizStatus::Cancelled;
        Ok(())
    }
}

#[account]
pub struct QuizQuestion {
    pub quiz: Pubkey,
    pub index: u16,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_commitment: [u8; 32],
    pub bump: u8,
}

impl QuizQuestion {
    pub const MAX_PROMPT_LEN: usize = 256;
    pub const MIN_OPTIONS: usize = 2;
    pub const MAX_OPTIONS: usize = 4;
    pub const MAX_OPTION_LEN: usize = 64;
    pub const SIZE: usize = 8
        + 32
        + 2
        + 4 + Self::MAX_PROMPT_LEN
        + 4 + Self::MAX_OPTIONS * (4 + Self::MAX_OPTION_LEN)
        + 32
        + 1;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticipantStatus {
    Invited,
    Started,
    Completed,
}

#[account]
pub struct QuizParticipant {
    pub quiz: Pubkey,
    pub user: Pubkey,
    pub score: u32,
    pub rank: u16,
    pub winnings: u64,
    pub status: ParticipantStatus,
    pub joined_at: i64,
    pub completed_at: i64,
    pub bump: u8,
}

impl QuizParticipant {
    pub const SIZE: usize = 8 + 32 + 32 + 4 + 2 + 8 + 1 + 8 + 8 + 1;

    pub fn ensure_vacant(&self) -> Result<()> {
        require!(self.user == Pubkey::default(), StakePoolError::AlreadyJoined);
        Ok(())
    }

    /// Moves the participant to `Started`. Returns true for a fresh record
    /// (no invitation), which still needs a quiz slot.
    pub fn start_playing(&mut self, quiz: Pubkey, user: Pubkey, now: i64) -> Result<bool> {
        let fresh = self.user == Pubkey::default();
        if fresh {
            self.quiz = quiz;
            self.user = user;
            self.score = 0;
            self.rank = 0;
            self.winnings = 0;
            self.completed_at = 0;
        } else {
            require!(self.status == ParticipantStatus::Invited, StakePoolError::AlreadyJoined);
        }
        self.status = ParticipantStatus::Started;
        self.joined_at = now;
        Ok(fresh)
    }

    pub fn complete(&mut self, score: u32, now: i64) -> Result<()> {
        match self.status {
            ParticipantStatus::Started => {}
            ParticipantStatus::Completed => return err!(StakePoolError::ParticipantAlreadyCompleted),
            ParticipantStatus::Invited => return err!(StakePoolError::ParticipantNotStarted),
        }
        self.status = ParticipantStatus::Completed;
        self.score = score;
        self.completed_at = now;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Settlement record
// ---------------------------------------------------------------------------

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettlementKind {
    Wager,
    Quiz,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayoutPolicy {
    /// Winners split the pool in proportion to their stake.
    ProRataStake,
    /// Nobody can win (push or empty winning side); every stake goes back.
    RefundStakes,
    ProportionalScore,
    TopRanked,
    /// No completed participant scored; the prize pool goes back to the creator.
    ReturnToCreator,
}

#[account]
pub struct Settlement {
    pub subject: Pubkey,
    pub kind: SettlementKind,
    pub policy: PayoutPolicy,
    pub total_pool: u64,
    pub platform_fee: u64,
    pub distributable: u64,
    pub winning_total: u64,
    pub winner_count: u32,
    pub settled_at: i64,
    pub bump: u8,
}

impl Settlement {
    pub const SIZE: usize = 8 + 32 + 1 + 1 + 8 + 8 + 8 + 8 + 4 + 8 + 1;

    pub fn is_written(&self) -> bool {
        self.subject != Pubkey::default()
    }
}
