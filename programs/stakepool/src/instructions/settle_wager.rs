use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::WagerSettled;
use super::distribute_wager_payouts::pay_entries;

#[derive(Accounts)]
pub struct SettleWager<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

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

    #[account(
        init_if_needed,
        payer = payer,
        space = Settlement::SIZE,
        seeds = [b"settlement", wager.key().as_ref()],
        bump,
    )]
    pub settlement: Account<'info, Settlement>,

    pub system_program: Program<'info, System>,
}

/// Moves a resolved wager to `Settled`, takes the platform fee and writes the
/// settlement record. Entries supplied as [entry, user_balance] pairs are paid
/// in the same transaction; the rest go through `distribute_wager_payouts`.
pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, SettleWager<'info>>) -> Result<()> {
    let wager_key = ctx.accounts.wager.key();
    require!(!ctx.accounts.settlement.is_written(), StakePoolError::AlreadySettled);
    ctx.accounts.wager.begin_settlement()?;
    let terms = ctx.accounts.wager.payout_terms()?;
    let now = Clock::get()?.unix_timestamp;

    ctx.accounts.config.accrue_fee(terms.platform_fee)?;

    let wager = &ctx.accounts.wager;
    let winner_count = match terms.winning_side {
        Some(Side::A) => wager.side_a_count,
        Some(Side::B) => wager.side_b_count,
        None => wager.entry_count(),
    };

    let settlement = &mut ctx.accounts.settlement;
    settlement.subject = wager_key;
    settlement.kind = SettlementKind::Wager;
    settlement.policy = terms.policy;
    settlement.total_pool = terms.total_pool;
    settlement.platform_fee = terms.platform_fee;
    settlement.distributable = terms.distributable;
    settlement.winning_total = terms.winning_total;
    settlement.winner_count = winner_count;
    settlement.settled_at = now;
    settlement.bump = ctx.bumps.settlement;

    emit!(WagerSettled {
        wager: wager_key,
        policy: terms.policy,
        total_pool: terms.total_pool,
        platform_fee: terms.platform_fee,
        distributable: terms.distributable,
    });

    pay_entries(
        &mut ctx.accounts.wager,
        wager_key,
        &mut ctx.accounts.config,
        &terms,
        ctx.remaining_accounts,
        now,
    )
}
