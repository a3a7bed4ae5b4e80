use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::QuizParticipantJoined;

#[derive(Accounts)]
pub struct JoinQuiz<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [b"quiz", quiz.quiz_id.to_le_bytes().as_ref()],
        bump = quiz.bump,
    )]
    pub quiz: Account<'info, Quiz>,

    #[account(
        init_if_needed,
        payer = user,
        space = QuizParticipant::SIZE,
        seeds = [b"participant", quiz.key().as_ref(), user.key().as_ref()],
        bump,
    )]
    pub participant: Account<'info, QuizParticipant>,

    /// Winnings are credited here at settlement, so it must exist by then.
    #[account(
        init_if_needed,
        payer = user,
        space = UserBalance::SIZE,
        seeds = [b"balance", user.key().as_ref()],
        bump,
    )]
    pub user_balance: Account<'info, UserBalance>,

    #[account(
        seeds = [b"config"],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    pub system_program: Program<'info, System>,
}

/// Joining is free. Invited users take up their reserved slot; everyone else
/// claims a new one if the quiz has room.
pub fn handler(ctx: Context<JoinQuiz>) -> Result<()> {
    require!(!ctx.accounts.config.paused, StakePoolError::PlatformPaused);
    let now = Clock::get()?.unix_timestamp;
    let user_key = ctx.accounts.user.key();
    let quiz_key = ctx.accounts.quiz.key();
    ctx.accounts.quiz.ensure_joinable(now)?;
    // The creator's balance is credited separately at settlement.
    require_keys_neq!(user_key, ctx.accounts.quiz.creator, StakePoolError::Unauthorized);

    let fresh = ctx.accounts.participant.start_playing(quiz_key, user_key, now)?;
    if fresh {
        ctx.accounts.quiz.add_participant()?;
        ctx.accounts.participant.bump = ctx.bumps.participant;
    }

    let balance = &mut ctx.accounts.user_balance;
    if balance.owner == Pubkey::default() {
        balance.owner = user_key;
        balance.bump = ctx.bumps.user_balance;
    }

    emit!(QuizParticipantJoined {
        quiz: quiz_key,
        user: user_key,
        invited: !fresh,
    });

    Ok(())
}
