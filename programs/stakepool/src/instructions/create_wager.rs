use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::WagerCreated;

#[derive(Accounts)]
pub struct CreateWager<'info> {
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
        space = Wager::SIZE,
        seeds = [b"wager", config.wager_count.to_le_bytes().as_ref()],
        bump,
    )]
    pub wager: Account<'info, Wager>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<CreateWager>,
    side_a_label: String,
    side_b_label: String,
    stake_lamports: u64,
    deadline: i64,
) -> Result<()> {
    let config = &ctx.accounts.config;
    require!(!config.paused, StakePoolError::PlatformPaused);

    let valid_label = |label: &str| !label.is_empty() && label.len() <= Wager::MAX_LABEL_LEN;
    require!(
        valid_label(&side_a_label) && valid_label(&side_b_label) && side_a_label != side_b_label,
        StakePoolError::InvalidSideLabel
    );
    require!(stake_lamports >= config.min_stake_lamports, StakePoolError::BelowMinStake);

    let clock = Clock::get()?;
    let earliest = clock.unix_timestamp
        .checked_add(config.min_wager_duration_seconds)
        .ok_or(StakePoolError::MathOverflow)?;
    require!(deadline >= earliest, StakePoolError::DeadlineTooSoon);

    let wager_id = config.wager_count;
    let fee_bps = config.wager_fee_bps;

    let wager = &mut ctx.accounts.wager;
    wager.wager_id = wager_id;
    wager.creator = ctx.accounts.creator.key();
    wager.side_a_label = side_a_label.clone();
    wager.side_b_label = side_b_label.clone();
    wager.stake_lamports = stake_lamports;
    wager.deadline = deadline;
    wager.status = WagerStatus::Open;
    wager.outcome = None;
    wager.fee_bps = fee_bps;
    wager.side_a_total = 0;
    wager.side_b_total = 0;
    wager.side_a_count = 0;
    wager.side_b_count = 0;
    wager.processed_entries = 0;
    wager.paid_out = 0;
    wager.residual = 0;
    wager.payouts_complete = false;
    wager.created_at = clock.unix_timestamp;
    wager.resolved_at = 0;
    wager.bump = ctx.bumps.wager;

    let config = &mut ctx.accounts.config;
    config.wager_count = config.wager_count
        .checked_add(1)
        .ok_or(StakePoolError::MathOverflow)?;

    emit!(WagerCreated {
        wager: ctx.accounts.wager.key(),
        creator: ctx.accounts.creator.key(),
        wager_id,
        side_a_label,
        side_b_label,
        stake_lamports,
        deadline,
        fee_bps,
    });

    Ok(())
}
