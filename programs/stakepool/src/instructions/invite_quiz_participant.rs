use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::QuizParticipantInvited;

#[derive(Accounts)]
#[instruction(user: Pubkey)]
pub struct InviteQuizParticipant<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [b"quiz", quiz.quiz_id.to_le_bytes().as_ref()],
        bump = quiz.bump,
        has_one = creator @ StakePoolError::Unauthorized,
    )]
    pub quiz: Account<'info, Quiz>,

    #[account(
        init_if_needed,
        payer = creator,
        space = QuizParticipant::SIZE,
        seeds = [b"participant", quiz.key().as_ref(), user.as_ref()],
        bump,
    )]
    pub participant: Account<'info, QuizParticipant>,

    pub system_program: Program<'info, System>,
}

/// Reserves a slot for `user`. Invitations can go out while the quiz is
/// still a draft; the invitee must call `join_quiz` to play.
pub fn handler(ctx: Context<InviteQuizParticipant>, user: Pubkey) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let quiz = &mut ctx.accounts.quiz;
    require_keys_neq!(user, quiz.creator, StakePoolError::Unauthorized);
    if quiz.status != QuizStatus::Draft {
        quiz.ensure_joinable(now)?;
    }
    ctx.accounts.participant.ensure_vacant()?;
    quiz.add_participant()?;

    let quiz_key = quiz.key();
    let participant = &mut ctx.accounts.participant;
    participant.quiz = quiz_key;
    participant.user = user;
    participant.score = 0;
    participant.rank = 0;
    participant.winnings = 0;
    participant.status = ParticipantStatus::Invited;
    participant.joined_at = 0;
    participant.completed_at = 0;
    participant.bump = ctx.bumps.participant;

    emit!(QuizParticipantInvited {
        quiz: quiz_key,
        user,
    });

    Ok(())
}
