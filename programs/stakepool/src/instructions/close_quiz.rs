use anchor_lang::prelude::*;
use crate::state::*;
use crate::events::QuizClosed;

#[derive(Accounts)]
pub struct CloseQuiz<'info> {
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
}

/// Stops play. Anyone can close once time is up; the creator and the
/// authority can close early.
pub fn handler(ctx: Context<CloseQuiz>) -> Result<()> {
    let caller = ctx.accounts.caller.key();
    let privileged = caller == ctx.accounts.quiz.creator || caller == ctx.accounts.config.authority;
    let now = Clock::get()?.unix_timestamp;

    let quiz = &mut ctx.accounts.quiz;
    quiz.end_play(now, privileged)?;

    emit!(QuizClosed {
        quiz: quiz.key(),
        completed_count: quiz.completed_count,
    });

    Ok(())
}
