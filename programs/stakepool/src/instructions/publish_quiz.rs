use anchor_lang::prelude::*;
use crate::state::Quiz;
use crate::errors::StakePoolError;
use crate::events::QuizPublished;

#[derive(Accounts)]
pub struct PublishQuiz<'info> {
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [b"quiz", quiz.quiz_id.to_le_bytes().as_ref()],
        bump = quiz.bump,
        has_one = creator @ StakePoolError::Unauthorized,
    )]
    pub quiz: Account<'info, Quiz>,
}

pub fn handler(ctx: Context<PublishQuiz>) -> Result<()> {
    let quiz = &mut ctx.accounts.quiz;
    quiz.publish()?;

    emit!(QuizPublished {
        quiz: quiz.key(),
    });

    Ok(())
}
