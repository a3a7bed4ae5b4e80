use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::QuizParticipantCompleted;

#[derive(Accounts)]
pub struct CompleteQuizParticipant<'info> {
    #[account(
        constraint = grader.key() == config.grader @ StakePoolError::Unauthorized,
    )]
    pub grader: Signer<'info>,

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
        seeds = [b"participant", quiz.key().as_ref(), participant.user.as_ref()],
        bump = participant.bump,
        constraint = participant.quiz == quiz.key() @ StakePoolError::ParticipantMismatch,
    )]
    pub participant: Account<'info, QuizParticipant>,
}

/// Records a graded score. Answers are checked off-chain against the
/// committed answer hashes; the grader key vouches for the result.
pub fn handler(ctx: Context<CompleteQuizParticipant>, score: u32) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let quiz = &mut ctx.accounts.quiz;
    quiz.record_completion(score)?;

    let participant = &mut ctx.accounts.participant;
    participant.complete(score, now)?;

    emit!(QuizParticipantCompleted {
        quiz: quiz.key(),
        user: participant.user,
        score,
    });

    Ok(())
}
