use anchor_lang::prelude::*;
use crate::state::Config;
use crate::errors::StakePoolError;
use crate::events::ConfigUpdated;

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        has_one = authority @ StakePoolError::Unauthorized,
    )]
    pub config: Account<'info, Config>,
}

#[allow(clippy::too_many_arguments)]
pub fn handler(
    ctx: Context<UpdateConfig>,
    treasury: Option<Pubkey>,
    kyc_authority: Option<Pubkey>,
    grader: Option<Pubkey>,
    wager_fee_bps: Option<u16>,
    quiz_fee_bps: Option<u16>,
    min_stake_lamports: Option<u64>,
    min_wager_duration_seconds: Option<i64>,
    max_quiz_questions: Option<u16>,
    max_quiz_participants: Option<u16>,
    min_entry_fee_per_question: Option<u64>,
    max_entry_fee_per_question: Option<u64>,
    unverified_max_transfer: Option<u64>,
) -> Result<()> {
    let config = &mut ctx.accounts.config;

    if let Some(t) = treasury {
        config.treasury = t;
    }
    if let Some(k) = kyc_authority {
        config.kyc_authority = k;
    }
    if let Some(g) = grader {
        config.grader = g;
    }
    if let Some(bps) = wager_fee_bps {
        config.wager_fee_bps = bps;
    }
    if let Some(bps) = quiz_fee_bps {
        config.quiz_fee_bps = bps;
    }
    if let Some(m) = min_stake_lamports {
        config.min_stake_lamports = m;
    }
    if let Some(d) = min_wager_duration_seconds {
        config.min_wager_duration_seconds = d;
    }
    if let Some(q) = max_quiz_questions {
        config.max_quiz_questions = q;
    }
    if let Some(p) = max_quiz_participants {
        config.max_quiz_participants = p;
    }
    if let Some(f) = min_entry_fee_per_question {
        config.min_entry_fee_per_question = f;
    }
    if let Some(f) = max_entry_fee_per_question {
        config.max_entry_fee_per_question = f;
    }
    if let Some(c) = unverified_max_transfer {
        config.unverified_max_transfer = c;
    }
    // Open wagers and quizzes keep the fee they were priced with.
    config.validate()?;

    emit!(ConfigUpdated {
        authority: config.authority,
        wager_fee_bps: config.wager_fee_bps,
        quiz_fee_bps: config.quiz_fee_bps,
    });

    Ok(())
}
