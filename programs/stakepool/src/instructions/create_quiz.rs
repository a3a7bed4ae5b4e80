use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::QuizCreated;
use crate::ledger::{check_transfer_limits, load_kyc_profile, TransactionKind, TransactionMetadata};
use crate::math::quiz_cost;

#[derive(Accounts)]
pub struct CreateQuiz<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = creator,
        space = Quiz::SIZE,
        seeds = [b"quiz", config.quiz_count.to_le_bytes().as_ref()],
        bump,
    )]
    pub quiz: Account<'info, Quiz>,

    #[account(
        mut,
        seeds = [b"balance", creator.key().as_ref()],
        bump = creator_balance.bump,
        constraint = creator_balance.owner == creator.key() @ StakePoolError::BalanceOwnerMismatch,
    )]
    pub creator_balance: Account<'info, UserBalance>,

    /// CHECK: fixed to the `["kyc", creator]` address; may be empty for
    /// users who were never verified. Read via `load_kyc_profile`.
    #[account(
        seeds = [b"kyc", creator.key().as_ref()],
        bump,
    )]
    pub kyc_profile: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Creates a draft quiz and reserves its full cost from the creator's balance.
/// Participants play for free; the creator funds the prize pool up front.
#[allow(clippy::too_many_arguments)]
pub fn handler(
    ctx: Context<CreateQuiz>,
    title: String,
    entry_fee_per_question: u64,
    total_questions: u16,
    max_participants: u16,
    settlement_method: SettlementMethod,
    top_n: u16,
    duration_seconds: i64,
) -> Result<()> {
    let config = &ctx.accounts.config;
    require!(!config.paused, StakePoolError::PlatformPaused);

    require!(
        !title.is_empty() && title.len() <= Quiz::MAX_TITLE_LEN,
        StakePoolError::TitleTooLong
    );
    require!(
        total_questions >= 1 && total_questions <= config.max_quiz_questions,
        StakePoolError::QuestionCountOutOfRange
    );
    require!(
        max_participants >= 1 && max_participants <= config.max_quiz_participants,
        StakePoolError::ParticipantCountOutOfRange
    );
    require!(
        entry_fee_per_question >= config.min_entry_fee_per_question
            && entry_fee_per_question <= config.max_entry_fee_per_question,
        StakePoolError::EntryFeeOutOfRange
    );
    if settlement_method == SettlementMethod::TopN {
        require!(
            top_n >= 1 && top_n <= max_participants,
            StakePoolError::InvalidTopN
        );
    }
    require!(duration_seconds > 0, StakePoolError::InvalidDuration);

    let cost = quiz_cost(
        entry_fee_per_question,
        total_questions,
        max_participants,
        config.quiz_fee_bps,
    )?;
    let kyc_profile = load_kyc_profile(&ctx.accounts.kyc_profile)?;
    check_transfer_limits(kyc_profile.as_ref(), config, cost.total_cost)?;

    let quiz_id = config.quiz_count;
    let quiz_key = ctx.accounts.quiz.key();
    let creator_key = ctx.accounts.creator.key();
    let now = Clock::get()?.unix_timestamp;

    let tx = ctx.accounts.creator_balance.reserve(
        cost.total_cost,
        TransactionKind::QuizEntry,
        quiz_key,
        TransactionMetadata::Quiz { quiz: quiz_key },
        now,
    )?;

    let quiz = &mut ctx.accounts.quiz;
    quiz.quiz_id = quiz_id;
    quiz.creator = creator_key;
    quiz.title = title;
    quiz.entry_fee_per_question = entry_fee_per_question;
    quiz.total_questions = total_questions;
    quiz.max_participants = max_participants;
    quiz.questions_added = 0;
    quiz.base_cost = cost.base_cost;
    quiz.platform_fee = cost.platform_fee;
    quiz.total_cost = cost.total_cost;
    quiz.settlement_method = settlement_method;
    quiz.top_n = if settlement_method == SettlementMethod::TopN { top_n } else { 0 };
    quiz.duration_seconds = duration_seconds;
    quiz.started_at = 0;
    quiz.ends_at = 0;
    quiz.status = QuizStatus::Draft;
    quiz.participant_count = 0;
    quiz.completed_count = 0;
    quiz.total_score = 0;
    quiz.residual = 0;
    quiz.created_at = now;
    quiz.bump = ctx.bumps.quiz;

    let config = &mut ctx.accounts.config;
    config.quiz_count = config.quiz_count
        .checked_add(1)
        .ok_or(StakePoolError::MathOverflow)?;

    emit!(tx);
    emit!(QuizCreated {
        quiz: quiz_key,
        creator: creator_key,
        quiz_id,
        base_cost: cost.base_cost,
        platform_fee: cost.platform_fee,
        total_cost: cost.total_cost,
    });

    Ok(())
}
