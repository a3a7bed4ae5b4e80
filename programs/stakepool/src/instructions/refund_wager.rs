use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::WagerRefunded;
use crate::math::PoolTerms;
use super::distribute_wager_payouts::pay_entries;

#[derive(Accounts)]
pub struct RefundWager<'info> {
    pub caller: Signer<'info>,

    #[account(
        mut,
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
}

/// Abandons an open wager and returns every stake. Allowed for the authority,
/// for the creator while nobody has joined, and for anyone once the wager has
/// gone unresolved past the stale grace period.
///
/// remaining_accounts: [entry, user_balance] pairs, paid immediately.
pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, RefundWager<'info>>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let caller = ctx.accounts.caller.key();
    let wager = &ctx.accounts.wager;

    let privileged = caller == ctx.accounts.config.authority;
    let creator_unjoined = caller == wager.creator && wager.entry_count() == 0;
    if !privileged && !creator_unjoined {
        require!(wager.is_stale(now), StakePoolError::WagerNotStale);
    }

    let wager_key = wager.key();
    ctx.accounts.wager.begin_refund()?;
    let total_pool = ctx.accounts.wager.total_pool()?;

    emit!(WagerRefunded {
        wager: wager_key,
        total_pool,
        entry_count: ctx.accounts.wager.entry_count(),
    });

    pay_entries(
        &mut ctx.accounts.wager,
        wager_key,
        &mut ctx.accounts.config,
        &PoolTerms::refund(total_pool),
        ctx.remaining_accounts,
        now,
    )
}
