use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::WagerJoined;
use crate::ledger::{check_transfer_limits, load_kyc_profile, TransactionKind, TransactionMetadata};

#[derive(Accounts)]
pub struct JoinWager<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [b"config"],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [b"wager", wager.wager_id.to_le_bytes().as_ref()],
        bump = wager.bump,
    )]
    pub wager: Account<'info, Wager>,

    #[account(
        init_if_needed,
        payer = user,
        space = WagerEntry::SIZE,
        seeds = [b"entry", wager.key().as_ref(), user.key().as_ref()],
        bump,
    )]
    pub entry: Account<'info, WagerEntry>,

    #[account(
        mut,
        seeds = [b"balance", user.key().as_ref()],
        bump = user_balance.bump,
        constraint = user_balance.owner == user.key() @ StakePoolError::BalanceOwnerMismatch,
    )]
    pub user_balance: Account<'info, UserBalance>,

    /// CHECK: fixed to the `["kyc", user]` address; may be empty for
    /// users who were never verified. Read via `load_kyc_profile`.
    #[account(
        seeds = [b"kyc", user.key().as_ref()],
        bump,
    )]
    pub kyc_profile: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Debits the fixed stake from the user's balance and records their side.
/// Every check runs before the debit, so a failed join leaves no trace.
pub fn handler(ctx: Context<JoinWager>, side: Side) -> Result<()> {
    let config = &ctx.accounts.config;
    require!(!config.paused, StakePoolError::PlatformPaused);

    let now = Clock::get()?.unix_timestamp;
    ctx.accounts.wager.ensure_joinable(now)?;
    ctx.accounts.entry.ensure_vacant()?;

    let amount = ctx.accounts.wager.stake_lamports;
    let kyc_profile = load_kyc_profile(&ctx.accounts.kyc_profile)?;
    check_transfer_limits(kyc_profile.as_ref(), config, amount)?;

    let wager_key = ctx.accounts.wager.key();
    let user_key = ctx.accounts.user.key();
    let tx = ctx.accounts.user_balance.reserve(
        amount,
        TransactionKind::WagerJoin,
        wager_key,
        TransactionMetadata::Wager { wager: wager_key, side },
        now,
    )?;

    let entry = &mut ctx.accounts.entry;
    entry.wager = wager_key;
    entry.user = user_key;
    entry.side = side;
    entry.amount = amount;
    entry.joined_at = now;
    entry.paid = false;
    entry.payout = 0;
    entry.bump = ctx.bumps.entry;

    let wager = &mut ctx.accounts.wager;
    wager.record_entry(side, amount)?;

    emit!(tx);
    emit!(WagerJoined {
        wager: wager_key,
        user: user_key,
        side,
        amount,
        side_a_total: wager.side_a_total,
        side_b_total: wager.side_b_total,
    });

    Ok(())
}
