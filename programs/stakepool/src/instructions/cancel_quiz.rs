use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::QuizCancelled;
use crate::ledger::{note_metadata, TransactionKind};

#[derive(Accounts)]
pub struct CancelQuiz<'info> {
    pub caller: Signer<'info>,

    #[account(
        seeds = [b"config"],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [b"quiz", quiz.quiz_id.to_le_bytes().as_ref()],
        bump = quiz.bump,
    )]
    pub quiz: Account<'info, Quiz>,

    #[account(
        mut,
        seeds = [b"balance", quiz.creator.as_ref()],
        bump = creator_balance.bump,
    )]
    pub creator_balance: Account<'info, UserBalance>,
}

/// Undoes the reservation made at creation: the full cost, fee included,
/// goes back to the creator.
pub fn handler(ctx: Context<CancelQuiz>, reason: String) -> Result<()> {
    let caller = ctx.accounts.caller.key();
    let privileged = caller == ctx.accounts.config.authority;
    require!(
        privileged || caller == ctx.accounts.quiz.creator,
        StakePoolError::Unauthorized
    );
    let metadata = note_metadata(reason.clone())?;

    let now = Clock::get()?.unix_timestamp;
    let quiz_key = ctx.accounts.quiz.key();
    let quiz = &mut ctx.accounts.quiz;
    quiz.cancel(now, privileged)?;
    let refunded = quiz.total_cost;

    let tx = ctx.accounts.creator_balance.release(
        refunded,
        TransactionKind::QuizRefund,
        quiz_key,
        metadata,
        now,
    )?;

    emit!(tx);
    emit!(QuizCancelled {
        quiz: quiz_key,
        refunded,
        reason,
    });

    Ok(())
}
