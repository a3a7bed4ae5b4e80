use anchor_lang::prelude::*;
use crate::state::Quiz;
use crate::errors::StakePoolError;
use crate::events::QuizStarted;

#[derive(Accounts)]
pub struct StartQuiz<'info> {
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [b"quiz", quiz.quiz_id.to_le_bytes().as_ref()],
        bump = quiz.bump,
        has_one = creator @ StakePoolError::Unauthorized,
    )]
    pub quiz: Account<'info, Quiz>,
}

pub fn handler(ctx: Context<StartQuiz>) -> Result<()> {
    let quiz = &mut ctx.accounts.quiz;
    quiz.start(Clock::get()?.unix_timestamp)?;

    emit!(QuizStarted {
        quiz: quiz.key(),
        ends_at: quiz.ends_at,
    });

    Ok(())
}
