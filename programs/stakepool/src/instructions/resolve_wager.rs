use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::WagerResolved;

#[derive(Accounts)]
pub struct ResolveWager<'info> {
    #[account(
        constraint = authority.key() == config.authority @ StakePoolError::Unauthorized,
    )]
    pub authority: Signer<'info>,

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
}

/// Records the real-world outcome. `force` lets the authority resolve before
/// the deadline (event decided early).
pub fn handler(ctx: Context<ResolveWager>, outcome: WagerOutcome, force: bool) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let wager = &mut ctx.accounts.wager;
    wager.resolve(outcome, now, force)?;

    emit!(WagerResolved {
        wager: wager.key(),
        outcome,
        forced: force && now < wager.deadline,
    });

    Ok(())
}
